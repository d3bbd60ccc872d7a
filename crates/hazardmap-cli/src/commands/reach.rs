//! `reach`: dissolved reach polygon around shelters.

use std::str::FromStr;

use anyhow::{bail, Result};
use serde_json::json;
use tracing::info;

use hazardmap_lib::{LonLat, ReachAreaBuilder, REACH_MIN_ZOOM};

use super::AppContext;
use crate::output::{print_json, OutputFormat};

/// `minLon,minLat,maxLon,maxLat` viewport filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn contains(&self, position: LonLat) -> bool {
        (self.west..=self.east).contains(&position.lon)
            && (self.south..=self.north).contains(&position.lat)
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("invalid bbox \"{value}\": {err}"))?;
        let [west, south, east, north] = parts[..] else {
            return Err(format!("bbox needs 4 numbers, got {}", parts.len()));
        };
        if west > east || south > north {
            return Err(format!("bbox \"{value}\" has min greater than max"));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }
}

pub struct ReachArgs {
    pub radius_m: f64,
    pub bbox: Option<BoundingBox>,
    pub zoom: Option<f64>,
}

pub fn handle_reach(ctx: &AppContext, args: &ReachArgs) -> Result<()> {
    if !args.radius_m.is_finite() || args.radius_m < 0.0 {
        bail!("radius must be a non-negative number of metres");
    }

    if let Some(zoom) = args.zoom.filter(|z| *z < REACH_MIN_ZOOM) {
        return match ctx.format {
            OutputFormat::Json => print_json(&json!({ "hidden": true, "zoom": zoom })),
            OutputFormat::Text => {
                println!("Reach areas are hidden below zoom {}.", REACH_MIN_ZOOM);
                Ok(())
            }
        };
    }

    let dataset = ctx.load_dataset()?;
    let positions = dataset
        .shelters
        .iter()
        .map(|record| record.position)
        .filter(|position| args.bbox.map_or(true, |bbox| bbox.contains(*position)))
        .collect::<Vec<_>>();
    info!(shelters = positions.len(), radius_m = args.radius_m, "computing reach");

    let Some(polygon) = ReachAreaBuilder::new().compute_reach_at(&positions, args.radius_m) else {
        return match ctx.format {
            OutputFormat::Json => print_json(&json!({ "type": "FeatureCollection", "features": [] })),
            OutputFormat::Text => {
                println!("No shelters in the selected area.");
                Ok(())
            }
        };
    };

    match ctx.format {
        OutputFormat::Json => print_json(&polygon.to_geojson()),
        OutputFormat::Text => {
            if polygon.is_empty() {
                println!("Reach area cleared (radius 0).");
            } else {
                println!(
                    "Reach area: {} part(s) from {} shelter(s) within {} m",
                    polygon.part_count(),
                    positions.len(),
                    args.radius_m
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_parses_and_filters() {
        let bbox: BoundingBox = "139.7,35.6,139.8,35.7".parse().unwrap();
        assert!(bbox.contains(LonLat::new(139.75, 35.65)));
        assert!(!bbox.contains(LonLat::new(139.33, 35.66)));
    }

    #[test]
    fn bbox_rejects_bad_input() {
        assert!("139.7,35.6,139.8".parse::<BoundingBox>().is_err());
        assert!("139.8,35.6,139.7,35.7".parse::<BoundingBox>().is_err());
        assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    }
}
