//! `measure`: cumulative distances along a list of positions.

use anyhow::{bail, Result};

use hazardmap_lib::{DistanceMeasurer, LonLat};

use super::AppContext;
use crate::output::{print_json, OutputFormat};

pub fn handle_measure(ctx: &AppContext, positions: &[LonLat]) -> Result<()> {
    if positions.is_empty() {
        bail!("at least one position is required");
    }

    let mut measurer = DistanceMeasurer::new();
    for position in positions {
        measurer.toggle_vertex(*position, None);
    }
    let snapshot = measurer.snapshot();

    match ctx.format {
        OutputFormat::Json => print_json(&snapshot.to_geojson()),
        OutputFormat::Text => {
            for (index, point) in snapshot.points.iter().enumerate() {
                let label = if point.distance.is_empty() { "-" } else { point.distance.as_str() };
                println!("{:>3}  {}  {}", index + 1, point.position, label);
            }
            if snapshot.line.is_some() {
                println!("Total: {}", hazardmap_lib::measure::format_distance(measurer.total_km()));
            }
            Ok(())
        }
    }
}
