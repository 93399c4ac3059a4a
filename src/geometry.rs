// Shaping primitives for the lens boundary and falloff.
// Pure math, no state; everything here works on normalized lens coordinates.

/// Euclidean length of (x, y).
#[inline]
pub fn length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Cubic Hermite ease between `lo` and `hi`.
/// Clamps (t - lo)/(hi - lo) to 0..1 and applies 3t² - 2t³.
/// Visual: turns any hard threshold into a soft gradient; with `lo > hi`
/// the ramp runs backwards (1 at `hi`, 0 at `lo`), which the refraction
/// policy relies on.
#[inline]
pub fn smooth_hermite(lo: f32, hi: f32, t: f32) -> f32 {
    let t = ((t - lo) / (hi - lo)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Signed distance from (x, y) to a rounded rectangle centered at the origin
/// with half-extents (half_w, half_h) and corner radius `radius`.
/// Negative inside, zero on the boundary, positive outside; continuous,
/// so easing over it gives a smooth falloff around the whole outline.
pub fn rounded_rect_sdf(x: f32, y: f32, half_w: f32, half_h: f32, radius: f32) -> f32 {
    let qx = x.abs() - half_w + radius;
    let qy = y.abs() - half_h + radius;
    qx.max(qy).min(0.0) + length(qx.max(0.0), qy.max(0.0)) - radius
}
