// The refraction policy: where should each output pixel *look* in the
// backdrop? Policies get the normalized output coordinate plus an
// access-observed view of the pointer, and answer with a source coordinate
// in the same normalized space.

use std::cell::Cell;

use crate::geometry::{rounded_rect_sdf, smooth_hermite};
use crate::types::{PointerState, Vec2};

/// Read-observing view over `PointerState`.
///
/// Synthesis hands this (never the raw state) to the refraction policy and
/// afterwards asks `was_read()`: if the policy never touched the pointer,
/// its field cannot change on pointer moves, so re-synthesis can be skipped.
/// The getter-sets-a-flag trick replaces the reflective proxy a dynamic
/// language would use.
pub struct TrackedPointer<'a> {
    state: &'a PointerState,
    read: Cell<bool>,
}

impl<'a> TrackedPointer<'a> {
    pub fn new(state: &'a PointerState) -> Self {
        Self { state, read: Cell::new(false) }
    }

    /// Pointer position relative to the lens rect, 0..1.
    #[inline]
    pub fn normalized(&self) -> Vec2 {
        self.read.set(true);
        self.state.normalized
    }

    /// True while a drag is in progress.
    #[inline]
    pub fn dragging(&self) -> bool {
        self.read.set(true);
        self.state.dragging
    }

    /// Did the policy consult the pointer at all during this pass?
    pub fn was_read(&self) -> bool {
        self.read.get()
    }
}

/// A displacement policy: maps an output coordinate to the backdrop
/// coordinate it should sample from. Both are normalized to the lens rect.
pub trait Refraction {
    fn sample(&self, uv: Vec2, pointer: &TrackedPointer<'_>) -> Vec2;
}

/// The baseline convex-glass policy.
///
/// Fixed curve: recenter `uv` on the lens middle, take the rounded-rect
/// signed distance, ease it twice (once over the inverted 0.8..0 band, once
/// more over 0..1 for an extra-soft shoulder), then scale the recentered
/// coordinate by the result. Deep inside the slab the factor is 1 (no
/// distortion); across the rim band samples get pulled toward the center,
/// which is what reads as glass-edge magnification.
///
/// This policy never consults the pointer, so under it the field is
/// synthesized exactly once per mount.
#[derive(Clone, Copy, Debug)]
pub struct ConvexLens {
    pub half_w: f32,
    pub half_h: f32,
    pub radius: f32,
}

impl Default for ConvexLens {
    fn default() -> Self {
        Self { half_w: 0.3, half_h: 0.2, radius: 0.6 }
    }
}

impl Refraction for ConvexLens {
    fn sample(&self, uv: Vec2, _pointer: &TrackedPointer<'_>) -> Vec2 {
        let ix = uv.x - 0.5;
        let iy = uv.y - 0.5;
        let d = rounded_rect_sdf(ix, iy, self.half_w, self.half_h, self.radius);
        let raw = smooth_hermite(0.8, 0.0, d - 0.15);
        // The second ease re-applies the same curve to its own output. It
        // looks redundant but the shipped falloff is this composed shape;
        // do not collapse it to a single ease.
        let scaled = smooth_hermite(0.0, 1.0, raw);
        Vec2::new(ix * scaled + 0.5, iy * scaled + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(uv: Vec2) -> Vec2 {
        let state = PointerState::default();
        let pointer = TrackedPointer::new(&state);
        ConvexLens::default().sample(uv, &pointer)
    }

    #[test]
    fn deep_interior_is_undistorted() {
        // At the lens center the ease saturates at 1: sample == uv exactly.
        let center = Vec2::new(0.5, 0.5);
        let s = sample_at(center);
        assert!((s.x - center.x).abs() < 1e-6);
        assert!((s.y - center.y).abs() < 1e-6);

        // Slightly off-center is still inside the flat part of the slab.
        let near = Vec2::new(0.55, 0.5);
        let s = sample_at(near);
        assert!((s.x - near.x).abs() < 1e-6);
        assert!((s.y - near.y).abs() < 1e-6);
    }

    #[test]
    fn rim_band_pulls_samples_toward_the_center() {
        // (0.1, 0.5) sits on the falloff band left of the slab: the sample
        // must land strictly between the pixel and the center (lensing,
        // not repulsion), and mirror on the right side.
        let left = sample_at(Vec2::new(0.1, 0.5));
        assert!(left.x > 0.1 && left.x < 0.5);

        let right = sample_at(Vec2::new(0.9, 0.5));
        assert!(right.x < 0.9 && right.x > 0.5);

        // Pull strength is symmetric.
        assert!(((left.x - 0.1) - (0.9 - right.x)).abs() < 1e-5);
    }

    #[test]
    fn falloff_is_the_composed_double_ease() {
        // Guard the as-shipped curve: the scale factor at a band point must
        // equal hermite(hermite(...)), not the single-ease value.
        let uv = Vec2::new(0.1, 0.5);
        let ix = uv.x - 0.5;
        let d = rounded_rect_sdf(ix, 0.0, 0.3, 0.2, 0.6);
        let raw = smooth_hermite(0.8, 0.0, d - 0.15);
        let scaled = smooth_hermite(0.0, 1.0, raw);
        assert!(raw < 1.0 && scaled != raw);

        let s = sample_at(uv);
        assert!((s.x - (ix * scaled + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn baseline_policy_never_reads_the_pointer() {
        let state = PointerState::default();
        let pointer = TrackedPointer::new(&state);
        let lens = ConvexLens::default();
        for i in 0..10 {
            let t = i as f32 / 10.0;
            lens.sample(Vec2::new(t, 1.0 - t), &pointer);
        }
        assert!(!pointer.was_read());
    }

    #[test]
    fn tracked_pointer_flags_any_access() {
        let state = PointerState { dragging: true, ..Default::default() };
        let pointer = TrackedPointer::new(&state);
        assert!(!pointer.was_read());
        assert!(pointer.dragging());
        assert!(pointer.was_read());

        let pointer = TrackedPointer::new(&state);
        let _ = pointer.normalized();
        assert!(pointer.was_read());
    }
}
