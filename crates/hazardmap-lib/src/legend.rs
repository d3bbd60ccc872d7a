//! Hazard legends and nearest-colour lookup.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use tracing::info;

use crate::error::{Error, Result};

/// Opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Decoded pixel with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in CIE L*a*b* space (ΔE 1976).
    pub fn distance(&self, other: &Rgb) -> f64 {
        let [l1, a1, b1] = self.to_lab();
        let [l2, a2, b2] = other.to_lab();
        ((l1 - l2).powi(2) + (a1 - a2).powi(2) + (b1 - b2).powi(2)).sqrt()
    }

    /// sRGB to CIE L*a*b* under the D65 white point.
    pub fn to_lab(&self) -> [f64; 3] {
        let r = srgb_to_linear(self.r);
        let g = srgb_to_linear(self.g);
        let b = srgb_to_linear(self.b);

        let x = (0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) / D65_WHITE[0];
        let y = (0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) / D65_WHITE[1];
        let z = (0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) / D65_WHITE[2];

        let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
        [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
    }
}

const D65_WHITE: [f64; 3] = [0.950_47, 1.0, 1.088_83];

fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor {
            value: value.to_string(),
        };
        let trimmed = value.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            let digits = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Rgb::new(r * 17, g * 17, b * 17)),
                [r1, r2, g1, g2, b1, b2] => {
                    Ok(Rgb::new(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2))
                }
                _ => Err(invalid()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        let inner = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let channels = inner
            .split(',')
            .take(3)
            .map(|part| part.trim().parse::<u8>().ok())
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Reference colour and label for one hazard category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: Rgb,
    pub label: String,
}

/// Legend of one hazard layer. Entry order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardLegend {
    pub id: String,
    pub name: String,
    #[serde(rename = "guide_color")]
    pub entries: Vec<LegendEntry>,
}

impl HazardLegend {
    /// Entry whose colour is closest to `color`; ties go to the first listed.
    pub fn nearest(&self, color: Rgb) -> Option<&LegendEntry> {
        let mut best: Option<(&LegendEntry, f64)> = None;
        for entry in &self.entries {
            let distance = entry.color.distance(&color);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((entry, distance));
            }
        }
        best.map(|(entry, _)| entry)
    }
}

/// All hazard legends keyed by layer id.
#[derive(Debug, Clone, Default)]
pub struct LegendCatalog {
    legends: Vec<HazardLegend>,
    by_id: HashMap<String, usize>,
}

impl LegendCatalog {
    pub fn new(legends: Vec<HazardLegend>) -> Self {
        let by_id = legends
            .iter()
            .enumerate()
            .map(|(index, legend)| (legend.id.clone(), index))
            .collect();
        Self { legends, by_id }
    }

    /// Load a legend dataset from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path)?;
        let catalog = Self::from_reader(file).map_err(|source| Error::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), layers = catalog.len(), "loaded hazard legends");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, serde_json::Error> {
        let legends: Vec<HazardLegend> = serde_json::from_reader(reader)?;
        Ok(Self::new(legends))
    }

    pub fn get(&self, id: &str) -> Option<&HazardLegend> {
        self.by_id.get(id).map(|&index| &self.legends[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &HazardLegend> {
        self.legends.iter()
    }

    pub fn len(&self) -> usize {
        self.legends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legends.is_empty()
    }
}
