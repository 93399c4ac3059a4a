// The lens controller: owns position, pointer state, and the synthesized
// map; turns pointer/resize events into state changes and decides when the
// expensive full-raster synthesis actually has to re-run.

use crate::encode::{self, DisplacementFilter, EncodedMap};
use crate::field::{self, DisplacementField};
use crate::refraction::Refraction;
use crate::types::{LensGeometry, PointerState, Vec2, Viewport};

/// Construction parameters, all defaulted like the knobs they mirror.
pub struct LensConfig {
    pub width: f32,
    pub height: f32,
    /// Backing-raster multiplier (1.0 = one map texel per screen pixel).
    pub dpi: f32,
    /// Margin the lens keeps from every viewport edge while dragging.
    pub margin: f32,
    /// Invoked exactly once, on teardown.
    pub on_destroy: Option<Box<dyn FnOnce()>>,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self { width: 300.0, height: 200.0, dpi: 1.0, margin: 10.0, on_destroy: None }
    }
}

/// Clamp a top-left position so the whole lens stays `margin` pixels inside
/// the viewport. When the viewport is too small to honor both bounds the
/// chain collapses to the lower one (the lens hugs the top-left margin);
/// intentional degradation, never an error.
pub fn clamp_position(pos: Vec2, size: (f32, f32), viewport: Viewport, margin: f32) -> Vec2 {
    let max_x = viewport.width - size.0 - margin;
    let max_y = viewport.height - size.1 - margin;
    Vec2::new(pos.x.min(max_x).max(margin), pos.y.min(max_y).max(margin))
}

/// States of the drag machine: `dragging == false` is idle.
///
/// Event flow: mount centers the lens and synthesizes once; pointer-down
/// inside the rect arms a drag; every pointer-move updates position (cheap)
/// and re-synthesizes only if the previous pass actually read the pointer;
/// resize re-clamps without re-synthesizing; destroy detaches and fires the
/// teardown callback once.
pub struct LiquidGlass {
    geometry: LensGeometry,
    refraction: Box<dyn Refraction>,
    margin: f32,
    viewport: Viewport,
    position: Vec2,
    pointer: PointerState,
    /// Set by the last synthesis pass: did the policy consult the pointer?
    pointer_read: bool,
    field: DisplacementField,
    map: EncodedMap,
    passes: u64,
    destroyed: bool,
    on_destroy: Option<Box<dyn FnOnce()>>,
}

impl LiquidGlass {
    /// Mount: center in the viewport, clamp, run the first synthesis.
    pub fn new(config: LensConfig, viewport: Viewport, refraction: Box<dyn Refraction>) -> Self {
        let geometry = LensGeometry::new(config.width, config.height, config.dpi);
        let centered = Vec2::new(
            (viewport.width - config.width) / 2.0,
            (viewport.height - config.height) / 2.0,
        );
        let position = clamp_position(centered, (config.width, config.height), viewport, config.margin);

        let mut lens = Self {
            geometry,
            refraction,
            margin: config.margin,
            viewport,
            position,
            pointer: PointerState::default(),
            pointer_read: false,
            field: DisplacementField::empty(),
            map: encode::encode(&DisplacementField::empty()),
            passes: 0,
            destroyed: false,
            on_destroy: config.on_destroy,
        };
        lens.resynthesize();
        log::info!(
            "lens mounted at ({:.0}, {:.0}), raster {}x{}",
            lens.position.x,
            lens.position.y,
            lens.field.width,
            lens.field.height
        );
        lens
    }

    /// Pointer pressed at viewport coordinates (x, y). Only a press inside
    /// the lens rect starts a drag; everything else is ignored.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.destroyed || !self.contains(x, y) {
            return;
        }
        self.pointer.dragging = true;
        self.pointer.drag_anchor = Vec2::new(x, y);
        self.pointer.drag_origin = self.position;
    }

    /// Pointer moved. Position updates are unconditional while dragging;
    /// the O(w·h) re-synthesis runs only when the active policy is known to
    /// depend on the pointer (see `pointer_read`).
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.destroyed {
            return;
        }

        if self.pointer.dragging {
            let next = Vec2::new(
                self.pointer.drag_origin.x + (x - self.pointer.drag_anchor.x),
                self.pointer.drag_origin.y + (y - self.pointer.drag_anchor.y),
            );
            self.position = clamp_position(next, self.size(), self.viewport, self.margin);
        }

        // Track where the pointer sits relative to the lens rect, for
        // policies that want it. Degenerate extents pin it to the center.
        self.pointer.normalized = Vec2::new(
            if self.geometry.width > 0.0 { (x - self.position.x) / self.geometry.width } else { 0.5 },
            if self.geometry.height > 0.0 { (y - self.position.y) / self.geometry.height } else { 0.5 },
        );

        if self.pointer_read {
            self.resynthesize();
        }
    }

    /// Pointer released anywhere: back to idle.
    pub fn pointer_up(&mut self) {
        if self.destroyed {
            return;
        }
        self.pointer.dragging = false;
    }

    /// Viewport changed size: re-clamp against the new bounds, keep the
    /// position otherwise (no recentering), and never re-synthesize.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.destroyed {
            return;
        }
        self.viewport = viewport;
        let clamped = clamp_position(self.position, self.size(), viewport, self.margin);
        if clamped != self.position {
            log::debug!(
                "resize re-clamped lens ({:.0}, {:.0}) -> ({:.0}, {:.0})",
                self.position.x,
                self.position.y,
                clamped.x,
                clamped.y
            );
            self.position = clamped;
        }
    }

    /// Detach from event delivery and fire `on_destroy`. Safe to call any
    /// number of times; only the first does anything. `Drop` routes here.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.pointer.dragging = false;
        if let Some(cb) = self.on_destroy.take() {
            cb();
        }
    }

    /// Hand the current map and scale to a host filter.
    pub fn publish(&self, filter: &mut dyn DisplacementFilter) {
        filter.set_map(&self.map, self.filter_scale());
    }

    /// Filter scale in screen-pixel units (the map is synthesized at
    /// `dpi` times that resolution, so the raster-space factor is divided
    /// back down).
    pub fn filter_scale(&self) -> f32 {
        if self.geometry.dpi > 0.0 { self.field.max_scale / self.geometry.dpi } else { 0.0 }
    }

    fn resynthesize(&mut self) {
        let synthesis = field::synthesize(&self.geometry, self.refraction.as_ref(), &self.pointer);
        self.pointer_read = synthesis.pointer_read;
        self.field = synthesis.field;
        self.map = encode::encode(&self.field);
        self.passes += 1;
        log::debug!(
            "synthesis pass {}: max_scale {:.3}, pointer_read {}",
            self.passes,
            self.field.max_scale,
            self.pointer_read
        );
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.position.x
            && x < self.position.x + self.geometry.width
            && y >= self.position.y
            && y < self.position.y + self.geometry.height
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> (f32, f32) {
        (self.geometry.width, self.geometry.height)
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.dragging
    }

    pub fn map(&self) -> &EncodedMap {
        &self.map
    }

    /// How many synthesis passes have run so far (1 right after mount).
    pub fn synthesis_passes(&self) -> u64 {
        self.passes
    }
}

impl Drop for LiquidGlass {
    fn drop(&mut self) {
        self.destroy();
    }
}
