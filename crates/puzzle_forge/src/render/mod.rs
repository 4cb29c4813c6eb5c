//! Renderer contract consumed by the core.
//!
//! The core never draws. It hands a [`Frame`] (mesh, packed piece buffer, view) to a
//! [`PuzzleRenderer`] for display, and asks the same renderer for an id-encoded
//! [`PickingBuffer`] when it needs to know which pieces are under a screen rectangle.
use glam::Vec2;

use crate::geometry::mesh::PuzzleMesh;
use crate::interaction::camera::CameraView;
use crate::interaction::picking::{PickingBuffer, ScreenRect};
use crate::state::PackedPieceBuffer;

pub mod raster;

/// Screen size plus camera. Screen origin is top-left with y growing downward; world y grows up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub camera: CameraView,
}

impl Viewport {
    pub fn new(width: u32, height: u32, camera: CameraView) -> Self {
        Self {
            width,
            height,
            camera,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let rel = (world - self.camera.offset) * self.camera.zoom;
        Vec2::new(rel.x, -rel.y) + self.size() * 0.5
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let rel = screen - self.size() * 0.5;
        Vec2::new(rel.x, -rel.y) / self.camera.zoom + self.camera.offset
    }

    /// The full-viewport rectangle.
    pub fn rect(&self) -> ScreenRect {
        ScreenRect::new(0, 0, self.width, self.height)
    }
}

/// Everything a renderer needs for one draw.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub mesh: &'a PuzzleMesh,
    pub pieces: &'a PackedPieceBuffer,
    pub piece_count: u32,
    pub viewport: Viewport,
    /// The packed buffer changed since the previous frame and must be re-uploaded.
    pub buffer_dirty: bool,
}

/// Display and picking passes over the same piece state.
pub trait PuzzleRenderer {
    /// Draw the scene for the user.
    fn render_scene(&mut self, frame: &Frame<'_>);

    /// Draw piece ids into exactly `rect` and read the pixels back.
    fn render_picking_buffer(&mut self, frame: &Frame<'_>, rect: ScreenRect) -> PickingBuffer;
}

impl<R: PuzzleRenderer + ?Sized> PuzzleRenderer for &mut R {
    fn render_scene(&mut self, frame: &Frame<'_>) {
        (**self).render_scene(frame);
    }

    fn render_picking_buffer(&mut self, frame: &Frame<'_>, rect: ScreenRect) -> PickingBuffer {
        (**self).render_picking_buffer(frame, rect)
    }
}
