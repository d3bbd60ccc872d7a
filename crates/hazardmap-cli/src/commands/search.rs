//! `search`: forward geocoding against the shelter index.

use anyhow::Result;
use serde_json::json;

use super::AppContext;
use crate::output::{print_json, OutputFormat};

pub fn handle_search(ctx: &AppContext, query: &str) -> Result<()> {
    let geocoder = ctx.geocoder()?;
    let results = geocoder.forward_geocode(query);

    match ctx.format {
        OutputFormat::Json => {
            let features = results.iter().map(|r| r.to_geojson()).collect::<Vec<_>>();
            print_json(&json!({ "type": "FeatureCollection", "features": features }))
        }
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No shelters matched \"{}\".", query);
                return Ok(());
            }
            for (rank, result) in results.iter().enumerate() {
                println!("{:>3}. {}  ({})", rank + 1, result.label, result.center);
            }
            Ok(())
        }
    }
}
