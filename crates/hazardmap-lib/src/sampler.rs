//! Pixel sampling from remote tile images.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::legend::Rgba;

/// Default user agent for tile requests.
const USER_AGENT: &str = concat!("hazardmap/", env!("CARGO_PKG_VERSION"));

/// Capability to read one pixel of a tile image.
///
/// Implementations return `None` for any failure (unreachable host, HTTP
/// error, undecodable image, pixel outside the image).
pub trait PixelSampler {
    fn sample(&self, url: &str, col: u32, row: u32) -> impl Future<Output = Option<Rgba>> + Send;
}

/// Fetches tiles over HTTP and decodes them with `image`.
#[derive(Debug, Clone)]
pub struct HttpTileSampler {
    client: reqwest::Client,
}

impl HttpTileSampler {
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Sampler whose HTTP client gives up after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetch and decode the tile, then read the pixel.
    pub async fn fetch_pixel(&self, url: &str, col: u32, row: u32) -> Result<Option<Rgba>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::TileFetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        debug!(url, bytes = bytes.len(), "fetched tile");
        decode_pixel(&bytes, col, row)
    }
}

impl PixelSampler for HttpTileSampler {
    async fn sample(&self, url: &str, col: u32, row: u32) -> Option<Rgba> {
        match self.fetch_pixel(url, col, row).await {
            Ok(pixel) => pixel,
            Err(err) => {
                warn!(url, error = %err, "tile sampling failed");
                None
            }
        }
    }
}

/// Read pixel (`col`, `row`) from an encoded PNG/JPEG image.
pub fn decode_pixel(bytes: &[u8], col: u32, row: u32) -> Result<Option<Rgba>> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    Ok(image
        .get_pixel_checked(col, row)
        .map(|pixel| {
            let [r, g, b, a] = pixel.0;
            Rgba::new(r, g, b, a)
        }))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba as ImageRgba, RgbaImage};

    use super::*;

    fn encoded_tile() -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(4, 4, ImageRgba([0, 0, 0, 0]));
        img.put_pixel(1, 2, ImageRgba([255, 0, 0, 255]));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png)
            .expect("encode png");
        cursor.into_inner()
    }

    #[test]
    fn decodes_requested_pixel() {
        let bytes = encoded_tile();
        assert_eq!(
            decode_pixel(&bytes, 1, 2).unwrap(),
            Some(Rgba::new(255, 0, 0, 255))
        );
        assert_eq!(decode_pixel(&bytes, 0, 0).unwrap(), Some(Rgba::new(0, 0, 0, 0)));
    }

    #[test]
    fn out_of_image_pixel_is_none() {
        let bytes = encoded_tile();
        assert_eq!(decode_pixel(&bytes, 10, 10).unwrap(), None);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_pixel(b"not an image", 0, 0).is_err());
    }
}
