// Software stand-in for the host compositor's displacement primitive.
// Visual: everything behind the lens rect gets re-sampled through the
// encoded map, so the backdrop appears to bend under the glass.

use crate::encode::{DisplacementFilter, EncodedMap};
use crate::types::{FrameBuffer, Vec2};

/// Holds the most recently published map + scale and applies them on the
/// CPU. The engine never calls this directly; it only sees the
/// `DisplacementFilter` trait.
pub struct SoftwareFilter {
    map: Option<EncodedMap>,
    scale: f32,
}

impl SoftwareFilter {
    pub fn new() -> Self {
        Self { map: None, scale: 0.0 }
    }

    /// Re-render the lens rect of `screen` by sampling `backdrop` through
    /// the displacement map. For each covered pixel: read the map texel's
    /// R/G, de-bias by 0.5, scale, and fetch the backdrop at the offset
    /// position (edge-clamped).
    pub fn compose(
        &self,
        screen: &mut FrameBuffer,
        backdrop: &FrameBuffer,
        origin: Vec2,
        size: (f32, f32),
    ) {
        let Some(map) = &self.map else { return };
        if map.width == 0 || map.height == 0 || size.0 <= 0.0 || size.1 <= 0.0 {
            return; // nothing to bend (unmounted or degenerate lens)
        }

        let x0 = origin.x.floor().max(0.0) as usize;
        let y0 = origin.y.floor().max(0.0) as usize;
        let x1 = ((origin.x + size.0).ceil() as usize).min(screen.width);
        let y1 = ((origin.y + size.1).ceil() as usize).min(screen.height);

        for y in y0..y1 {
            for x in x0..x1 {
                // Where inside the lens rect is this pixel, 0..1?
                let u = (x as f32 - origin.x) / size.0;
                let v = (y as f32 - origin.y) / size.1;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }

                let mx = ((u * map.width as f32) as usize).min(map.width - 1);
                let my = ((v * map.height as f32) as usize).min(map.height - 1);
                let texel = map.texel(mx, my);

                let dx = (texel[0] as f32 / 255.0 - 0.5) * self.scale;
                let dy = (texel[1] as f32 / 255.0 - 0.5) * self.scale;

                // Edge-clamped fetch from the backdrop.
                let sx = (x as f32 + dx).round().clamp(0.0, (backdrop.width - 1) as f32) as usize;
                let sy = (y as f32 + dy).round().clamp(0.0, (backdrop.height - 1) as f32) as usize;
                screen.pixels[y * screen.width + x] = backdrop.pixels[sy * backdrop.width + sx];
            }
        }
    }
}

impl DisplacementFilter for SoftwareFilter {
    fn set_map(&mut self, map: &EncodedMap, scale: f32) {
        self.map = Some(map.clone());
        self.scale = scale;
    }
}
