//! `shelter`: popup details of the best-matching shelter.

use anyhow::{bail, Result};

use super::AppContext;
use crate::output::{print_json, render_shelter, OutputFormat};

pub fn handle_shelter(ctx: &AppContext, query: &str) -> Result<()> {
    let geocoder = ctx.geocoder()?;
    let Some(record) = geocoder.index().search(query).into_iter().next() else {
        bail!("no shelter matched \"{}\"", query);
    };
    let details = record.details();

    match ctx.format {
        OutputFormat::Json => print_json(&details),
        OutputFormat::Text => {
            println!("{}", render_shelter(&details));
            Ok(())
        }
    }
}
