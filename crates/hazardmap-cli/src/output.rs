//! Output formatting shared by the subcommands.

use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use hazardmap_lib::{AccessibilityFeature, ShelterDetails};

/// Format of command results on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Pretty-print `value` as JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// `write_json` to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, value)
}

/// Accessibility list as shown in the shelter popup, "なし" when empty.
pub fn accessibility_summary(features: &[AccessibilityFeature]) -> String {
    if features.is_empty() {
        return "なし".to_string();
    }
    features
        .iter()
        .map(|feature| feature.label())
        .collect::<Vec<_>>()
        .join("、")
}

/// Multi-line text block for a shelter.
pub fn render_shelter(details: &ShelterDetails) -> String {
    format!(
        "{}\n  住所: {}\n  位置: {}\n  バリアフリー: {}",
        details.name,
        details.address,
        details.position,
        accessibility_summary(&details.accessibility)
    )
}
