use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Geographic position in degrees, longitude first (GeoJSON order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]` pair as used in GeoJSON coordinates.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<LonLat> for Point<f64> {
    fn from(value: LonLat) -> Self {
        Point::new(value.lon, value.lat)
    }
}

impl From<Point<f64>> for LonLat {
    fn from(value: Point<f64>) -> Self {
        Self::new(value.x(), value.y())
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lon, self.lat)
    }
}

impl FromStr for LonLat {
    type Err = Error;

    /// Parses `"lon,lat"` in degrees.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| Error::InvalidCoordinate { message };
        let (lon, lat) = value
            .split_once(',')
            .ok_or_else(|| invalid(format!("expected \"lon,lat\", got \"{value}\"")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| invalid(format!("longitude is not a number: \"{}\"", lon.trim())))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| invalid(format!("latitude is not a number: \"{}\"", lat.trim())))?;
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid(format!("longitude {lon} outside [-180, 180]")));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid(format!("latitude {lat} outside [-90, 90]")));
        }
        Ok(Self::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lon_lat_text() {
        assert_eq!(
            "139.7671, 35.6812".parse::<LonLat>().unwrap(),
            LonLat::new(139.7671, 35.6812)
        );
        assert!("139.7671".parse::<LonLat>().is_err());
        assert!("east,35".parse::<LonLat>().is_err());
        assert!("35.6812,139.7671".parse::<LonLat>().is_err());
    }

    #[test]
    fn point_conversion_keeps_axis_order() {
        let position = LonLat::new(139.76, 35.68);
        let point: Point<f64> = position.into();
        assert_eq!(point.x(), 139.76);
        assert_eq!(point.y(), 35.68);
        assert_eq!(LonLat::from(point), position);
    }
}
