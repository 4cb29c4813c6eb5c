//! 2D view transform: pan offset and zoom, independent of piece state.
use glam::Vec2;

/// Lowest zoom the wheel can reach.
pub const MIN_ZOOM: f32 = 0.5;
/// Relative zoom change per wheel unit.
pub const WHEEL_ZOOM_FACTOR: f32 = 0.001;

/// `offset` is the world point shown at the viewport centre; `zoom` is pixels per world unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CameraView {
    pub fn new(offset: Vec2, zoom: f32) -> Self {
        Self {
            offset,
            zoom: zoom.max(MIN_ZOOM),
        }
    }

    /// Move the view so the box `min..max` is centred, keeping the zoom.
    pub fn center_on(&mut self, min: Vec2, max: Vec2) {
        self.offset = (min + max) * 0.5;
    }

    /// Centre on `min..max` and zoom so the box fits `screen` pixels (never below the floor).
    pub fn fit(min: Vec2, max: Vec2, screen: Vec2) -> Self {
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));
        let zoom = (screen / extent).min_element();
        Self::new((min + max) * 0.5, zoom)
    }

    /// Move the view by a pointer delta given in screen pixels (y down).
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.offset -= Vec2::new(screen_delta.x, -screen_delta.y) / self.zoom;
    }

    /// Zoom by `1 - WHEEL_ZOOM_FACTOR * delta`, keeping the world point under the cursor fixed.
    pub fn wheel(&mut self, delta: f32, cursor_world: Vec2) {
        let previous = self.zoom;
        let next = (previous * (1.0 - WHEEL_ZOOM_FACTOR * delta)).max(MIN_ZOOM);
        self.zoom = next;
        self.offset = self.offset.lerp(cursor_world, 1.0 - previous / next);
    }
}
