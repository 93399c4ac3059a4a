// Quantizes the float displacement field into the RGBA8 raster the host
// filter actually consumes: R = dx, G = dy, B = 0, A = opaque. The filter
// reconstructs offsets as (channel/255 - 0.5) * scale.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::Error;
use crate::field::DisplacementField;

/// Channel value meaning "zero offset" after the +0.5 bias.
pub const NEUTRAL: u8 = 128;

/// Two-channel displacement map packed as interleaved RGBA8, same texel
/// count as the field it was encoded from. Derived data: rebuilt on every
/// synthesis, never edited.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedMap {
    pub width: usize,
    pub height: usize,
    /// RGBA, row-major; length == width * height * 4.
    pub data: Vec<u8>,
}

impl EncodedMap {
    /// Byte offset of the texel at (x, y).
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> &[u8] {
        let i = (y * self.width + x) * 4;
        &self.data[i..i + 4]
    }

    /// The map as an owned image, ready to hand to anything that speaks
    /// `image` types.
    pub fn to_image(&self) -> Result<RgbaImage, Error> {
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| Error::MapExport("buffer/dimension mismatch".into()))
    }

    /// PNG bytes — the transferable form of the map, for hosts that take an
    /// image resource rather than a raw buffer.
    pub fn to_png(&self) -> Result<Vec<u8>, Error> {
        let img = self.to_image()?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| Error::MapExport(e.to_string()))?;
        Ok(bytes)
    }
}

/// Quantize a field into its RGBA8 map.
///
/// Each offset is normalized by `max_scale`, biased to 0.5, and scaled to a
/// byte with clamping — the clamp is load-bearing, since the halved
/// `max_scale` pushes rim texels outside 0..1 on purpose. A field with
/// `max_scale == 0` has nothing to normalize by and encodes as the neutral
/// (no-op) map instead of dividing by zero.
pub fn encode(field: &DisplacementField) -> EncodedMap {
    let mut data = Vec::with_capacity(field.offsets.len() * 4);

    if field.max_scale <= 0.0 {
        for _ in &field.offsets {
            data.extend_from_slice(&[NEUTRAL, NEUTRAL, 0, 255]);
        }
    } else {
        for v in &field.offsets {
            let r = v.x / field.max_scale + 0.5;
            let g = v.y / field.max_scale + 0.5;
            data.push(quantize(r));
            data.push(quantize(g));
            data.push(0);
            data.push(255);
        }
    }

    EncodedMap { width: field.width, height: field.height, data }
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// The host compositing primitive, seen from this side: give it an image
/// and a scale, and it bends whatever renders behind the tagged region.
/// The engine only supplies conformant inputs; rendering is the host's job.
pub trait DisplacementFilter {
    fn set_map(&mut self, map: &EncodedMap, scale: f32);
}
