//! CPU reference renderer.
//!
//! Rasterises the mesh with the state read back from the packed piece buffer, the same inputs
//! a GPU pass would receive, into id-encoded RGBA8 buffers. Pieces are drawn in ascending `z`
//! (ties in id order) so raised pieces cover the rest.
use glam::Vec2;
use tracing::trace;

use crate::interaction::picking::{PickingBuffer, ScreenRect};
use crate::render::{Frame, PuzzleRenderer};

#[derive(Clone, Debug, Default)]
pub struct SoftwareRenderer {
    scene: Option<PickingBuffer>,
    uploads: usize,
    picking_passes: usize,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id buffer of the last [`PuzzleRenderer::render_scene`] call.
    pub fn scene(&self) -> Option<&PickingBuffer> {
        self.scene.as_ref()
    }

    /// Number of frames that carried a dirty packed buffer.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn picking_passes(&self) -> usize {
        self.picking_passes
    }

    /// Rasterise `frame` into a fresh id buffer covering `rect`.
    pub fn rasterize(frame: &Frame<'_>, rect: ScreenRect) -> PickingBuffer {
        let mut target = PickingBuffer::cleared(rect);

        let mut order: Vec<(u32, [f32; 4])> = (1..=frame.piece_count)
            .filter_map(|id| frame.pieces.read(id as usize).map(|cell| (id, cell)))
            .collect();
        order.sort_by(|a, b| a.1[2].total_cmp(&b.1[2]));

        for (id, [x, y, _, angle]) in order {
            let rotation = Vec2::from_angle(angle);
            let translation = Vec2::new(x, y);
            for tri in frame.mesh.piece_triangles((id - 1) as usize) {
                let screen = tri.map(|local| {
                    let world = rotation.rotate(local.truncate()) + translation;
                    frame.viewport.world_to_screen(world)
                });
                fill_triangle(&mut target, screen, id);
            }
        }
        target
    }
}

impl PuzzleRenderer for SoftwareRenderer {
    fn render_scene(&mut self, frame: &Frame<'_>) {
        if frame.buffer_dirty {
            self.uploads += 1;
        }
        self.scene = Some(Self::rasterize(frame, frame.viewport.rect()));
    }

    fn render_picking_buffer(&mut self, frame: &Frame<'_>, rect: ScreenRect) -> PickingBuffer {
        self.picking_passes += 1;
        trace!(?rect, "software picking pass");
        Self::rasterize(frame, rect)
    }
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// Fill pixels whose centres lie inside the triangle (either winding), clipped to the target.
fn fill_triangle(target: &mut PickingBuffer, [a, b, c]: [Vec2; 3], id: u32) {
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    let rect = target.rect;
    let min = a.min(b).min(c).floor();
    let max = a.max(b).max(c).ceil();
    let x0 = (min.x as i64).max(i64::from(rect.x));
    let y0 = (min.y as i64).max(i64::from(rect.y));
    let x1 = (max.x as i64).min(i64::from(rect.x) + i64::from(rect.width));
    let y1 = (max.y as i64).min(i64::from(rect.y) + i64::from(rect.height));

    let sign = area.signum();
    for py in y0..y1 {
        for px in x0..x1 {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let inside = edge(a, b, p) * sign >= 0.0
                && edge(b, c, p) * sign >= 0.0
                && edge(c, a, p) * sign >= 0.0;
            if inside {
                target.put(px as i32, py as i32, id);
            }
        }
    }
}
