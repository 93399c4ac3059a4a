// Core value types shared by the lens engine and the demo shell.

/// 2D coordinate, either normalized (0..1 across the lens) or in pixels.
/// Plain value, no identity; copied freely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Vec2::ZERO
    }
}

/// Lens extent, immutable after construction.
/// Visual: `width`/`height` is the on-screen rectangle the glass occupies;
/// `dpi` multiplies it into the backing raster the displacement map is
/// synthesized at (1.0 = one map texel per screen pixel).
#[derive(Clone, Copy, Debug)]
pub struct LensGeometry {
    pub width: f32,
    pub height: f32,
    pub dpi: f32,
}

impl LensGeometry {
    pub fn new(width: f32, height: f32, dpi: f32) -> Self {
        Self { width, height, dpi }
    }

    /// Backing raster size in texels, clamped so degenerate extents
    /// (zero or negative width/height) give an empty raster, not a panic.
    pub fn raster_size(&self) -> (usize, usize) {
        let w = (self.width * self.dpi).max(0.0).round() as usize;
        let h = (self.height * self.dpi).max(0.0).round() as usize;
        (w, h)
    }
}

/// Everything the drag controller knows about the pointer right now.
/// Mutated only by the controller; the refraction policy reads it through
/// an access-observing wrapper (see `refraction::TrackedPointer`).
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    /// True between pointer-down inside the lens and the matching pointer-up.
    pub dragging: bool,
    /// Pointer screen position at the moment the drag started.
    pub drag_anchor: Vec2,
    /// Lens top-left at the moment the drag started.
    pub drag_origin: Vec2,
    /// Pointer position relative to the lens rect, in 0..1 units.
    pub normalized: Vec2,
}

/// Current window/viewport extent in pixels; the drag clamp works in this space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Software pixel buffer for the demo window (0x00RRGGBB, minifb layout).
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}
