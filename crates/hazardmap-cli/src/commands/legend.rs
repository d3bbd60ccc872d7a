//! `legend`: list the legend entries of a hazard layer.

use anyhow::{anyhow, Result};

use hazardmap_lib::HazardCatalog;

use super::AppContext;
use crate::output::{print_json, OutputFormat};

pub fn handle_legend(ctx: &AppContext, layer_id: &str) -> Result<()> {
    let catalog = HazardCatalog::builtin();
    let layer = catalog.require(layer_id)?;
    let dataset = ctx.load_dataset()?;
    let legend = dataset
        .legends
        .get(&layer.id)
        .ok_or_else(|| anyhow!("no legend configured for {}", layer.id))?;

    match ctx.format {
        OutputFormat::Json => print_json(legend),
        OutputFormat::Text => {
            println!("{} ({})", legend.name, legend.id);
            for entry in &legend.entries {
                println!("  {}  {}", entry.color, entry.label);
            }
            Ok(())
        }
    }
}
