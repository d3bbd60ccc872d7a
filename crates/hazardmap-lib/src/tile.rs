//! Slippy map tile addressing.
//!
//! Uses the OpenStreetMap tile naming convention:
//! - `z` is the zoom level
//! - `x` is the column (0 to 2^z - 1, from west to east)
//! - `y` is the row (0 to 2^z - 1, from north to south)

use std::f64::consts::PI;

use serde::Serialize;

use crate::coord::LonLat;

/// Web Mercator latitude limit (arctan(sinh(π))).
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Highest zoom level supported by the tile math (2^z must fit in u32).
pub const MAX_TILE_ZOOM: u8 = 31;

/// OSM-style tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Geographic extent of a tile in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl TileCoord {
    /// Tile containing `position` at zoom `z`.
    ///
    /// Latitude is clamped to the Web Mercator range and longitudes wrap
    /// around the antimeridian, so every input maps to a valid tile.
    pub fn containing(position: LonLat, z: u8) -> Self {
        let z = z.min(MAX_TILE_ZOOM);
        let n = (1u64 << z) as f64;
        let max_index = (1u64 << z) - 1;

        let lon = position.lon;
        let x = ((lon + 180.0) / 360.0 * n).floor();
        let x = x.rem_euclid(n);

        let lat = position.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let lat_rad = lat.to_radians();
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();

        let x = (x.max(0.0) as u64).min(max_index) as u32;
        let y = (y.max(0.0) as u64).min(max_index) as u32;

        Self { z, x, y }
    }

    /// Bounding box of this tile.
    pub fn bounds(&self) -> TileBounds {
        let n = (1u64 << self.z) as f64;
        let west = self.x as f64 / n * 360.0 - 180.0;
        let east = (self.x as f64 + 1.0) / n * 360.0 - 180.0;
        let north = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan().to_degrees();
        let south = (PI * (1.0 - 2.0 * (self.y as f64 + 1.0) / n))
            .sinh()
            .atan()
            .to_degrees();
        TileBounds {
            west,
            south,
            east,
            north,
        }
    }

    /// Substitute `{z}`, `{x}` and `{y}` in a URL template.
    pub fn fill_template(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

impl TileBounds {
    /// Pixel column/row of `position` inside a `tile_size` square image.
    ///
    /// Row 0 is the north edge. The result is clamped to the image.
    pub fn pixel_at(&self, position: LonLat, tile_size: u32) -> (u32, u32) {
        let size = tile_size as f64;
        let col = (position.lon - self.west) / (self.east - self.west) * size;
        let row = (self.north - position.lat) / (self.north - self.south) * size;
        (clamp_pixel(col, tile_size), clamp_pixel(row, tile_size))
    }
}

fn clamp_pixel(value: f64, tile_size: u32) -> u32 {
    let max = tile_size.saturating_sub(1);
    if value.is_nan() || value < 0.0 {
        0
    } else {
        (value.floor() as u32).min(max)
    }
}
