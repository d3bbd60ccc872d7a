//! `classify`: sample the live hazard raster under a position.

use anyhow::{Context, Result};
use serde_json::json;

use hazardmap_lib::{
    classifier_config_from_env, HazardCatalog, HttpTileSampler, LonLat, PixelClassifier,
};

use super::AppContext;
use crate::output::{print_json, OutputFormat};

pub struct ClassifyArgs {
    pub layer: String,
    pub position: LonLat,
    pub zoom: f64,
}

pub async fn handle_classify(ctx: &AppContext, args: &ClassifyArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let config = classifier_config_from_env();
    let sampler = HttpTileSampler::with_timeout(Some(config.timeout)).context("failed to build HTTP client")?;
    let classifier = PixelClassifier::with_config(
        HazardCatalog::builtin(),
        dataset.legends,
        sampler,
        config,
    );
    classifier.layers().require(&args.layer)?;

    let result = classifier
        .classify(args.position, &args.layer, args.zoom)
        .await;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "position": args.position,
            "layer": args.layer,
            "classification": result,
        })),
        OutputFormat::Text => {
            match result {
                Some(found) => println!("{}: {} ({})", found.layer_name, found.label, found.color),
                None => println!("No hazard category at {} on {}.", args.position, args.layer),
            }
            Ok(())
        }
    }
}
