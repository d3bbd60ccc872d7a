//! `reverse`: interpret a number pair of unknown lat/lon order.

use anyhow::Result;

use hazardmap_lib::reverse_geocode;

use super::AppContext;
use crate::output::{print_json, OutputFormat};

pub fn handle_reverse(ctx: &AppContext, first: f64, second: f64) -> Result<()> {
    let results = reverse_geocode((first, second));
    match ctx.format {
        OutputFormat::Json => {
            let features = results.iter().map(|r| r.to_geojson()).collect::<Vec<_>>();
            print_json(&features)
        }
        OutputFormat::Text => {
            for result in &results {
                println!("{}  ({})", result.label, result.center);
            }
            Ok(())
        }
    }
}
