use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use puzzle_forge::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Output image settings.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    pub outline: [u8; 3],
    /// Tint the selected pieces with this colour.
    pub highlight: Option<[u8; 3]>,
    pub selection: Vec<PieceId>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [245, 242, 235],
            outline: [40, 40, 40],
            highlight: None,
            selection: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_selection(mut self, selection: &[PieceId], color: [u8; 3]) -> Self {
        self.selection = selection.to_vec();
        self.highlight = Some(color);
        self
    }

    /// Viewport of the image size looking at `camera`.
    pub fn viewport(&self, camera: CameraView) -> Viewport {
        Viewport::new(self.image_size.0, self.image_size.1, camera)
    }
}

/// Stable pastel colour for a piece id.
pub fn piece_color(id: u32) -> [u8; 3] {
    let mut h = id.wrapping_mul(0x9E37_79B9);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    let channel = |shift: u32| 120 + ((h >> shift) & 0x7f) as u8;
    [channel(0), channel(8), channel(16)]
}

/// Rasterise `model` through the software renderer and write a PNG.
///
/// Pixels whose right or lower neighbour shows a different piece are drawn as outline.
pub fn render_model_to_png<P: AsRef<Path>>(
    model: &PuzzleModel,
    camera: CameraView,
    config: &RenderConfig,
    out_path: P,
) -> anyhow::Result<()> {
    let viewport = config.viewport(camera);
    let frame = model.frame(viewport, true);
    let buffer = SoftwareRenderer::rasterize(&frame, viewport.rect());

    let (width, height) = config.image_size;
    let id_at = |x: u32, y: u32| buffer.id_at(x, y).unwrap_or(0);
    let mut img = RgbImage::from_pixel(width, height, Rgb(config.background));

    for y in 0..height {
        for x in 0..width {
            let id = id_at(x, y);
            let right = if x + 1 < width { id_at(x + 1, y) } else { id };
            let below = if y + 1 < height { id_at(x, y + 1) } else { id };
            let color = if id != right || id != below {
                config.outline
            } else if id == 0 {
                continue;
            } else {
                match config.highlight {
                    Some(tint) if config.selection.iter().any(|p| p.get() == id) => {
                        blend(piece_color(id), tint)
                    }
                    _ => piece_color(id),
                }
            };
            img.put_pixel(x, y, Rgb(color));
        }
    }

    let out_path = out_path.as_ref();
    img.save(out_path)?;
    info!(path = %out_path.display(), width, height, "wrote image");
    Ok(())
}

/// Camera framing the assembled board with a margin of one cell.
pub fn board_camera(model: &PuzzleModel, screen: Vec2) -> CameraView {
    let margin = Vec2::splat(model.average_cell_size());
    CameraView::fit(-margin, model.board_size + margin, screen)
}

fn blend(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [0, 1, 2].map(|i| ((a[i] as u16 + b[i] as u16) / 2) as u8)
}
