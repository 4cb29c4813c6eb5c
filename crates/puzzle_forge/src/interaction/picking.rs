//! Picking contract: screen rectangles, id-encoded pixel buffers and their decoding.
//!
//! A renderer answers a picking query by drawing every piece with its id packed into the
//! RGB channels (`r = id >> 16`, `g = (id >> 8) & 255`, `b = id & 255`, 0 = background) for
//! exactly the requested rectangle and handing back the pixels.
use std::collections::BTreeSet;

use glam::Vec2;
use tracing::warn;

use crate::state::PieceId;

/// Integer screen rectangle, origin at the top-left of the viewport, y growing downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// The 1×1 rectangle under a screen position.
    pub fn pixel(at: Vec2) -> Self {
        Self::new(at.x.floor() as i32, at.y.floor() as i32, 1, 1)
    }

    /// Rectangle spanned by two opposite corners in any order; each side is at least 1 pixel.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b).floor();
        let max = a.max(b).floor();
        let size = (max - min).max(Vec2::ONE);
        Self::new(min.x as i32, min.y as i32, size.x as u32, size.y as u32)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && i64::from(px) < i64::from(self.x) + i64::from(self.width)
            && i64::from(py) < i64::from(self.y) + i64::from(self.height)
    }
}

/// Pack a piece id into an opaque RGBA8 pixel.
pub fn encode_id(id: u32) -> [u8; 4] {
    [
        ((id >> 16) & 0xff) as u8,
        ((id >> 8) & 0xff) as u8,
        (id & 0xff) as u8,
        0xff,
    ]
}

/// Inverse of [`encode_id`]; alpha is ignored.
pub fn decode_pixel(pixel: [u8; 4]) -> u32 {
    (u32::from(pixel[0]) << 16) | (u32::from(pixel[1]) << 8) | u32::from(pixel[2])
}

/// RGBA8 id buffer covering one [`ScreenRect`], rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickingBuffer {
    pub rect: ScreenRect,
    pub pixels: Vec<u8>,
}

impl PickingBuffer {
    /// A buffer for `rect` filled with the background id 0.
    pub fn cleared(rect: ScreenRect) -> Self {
        Self {
            rect,
            pixels: vec![0; rect.area() * 4],
        }
    }

    /// Id pixel at local coordinates inside the rectangle.
    pub fn id_at(&self, local_x: u32, local_y: u32) -> Option<u32> {
        if local_x >= self.rect.width || local_y >= self.rect.height {
            return None;
        }
        let offset = (local_y as usize * self.rect.width as usize + local_x as usize) * 4;
        let px = self.pixels.get(offset..offset + 4)?;
        Some(decode_pixel([px[0], px[1], px[2], px[3]]))
    }

    /// Write `id` at screen coordinates; pixels outside the rectangle are dropped.
    pub fn put(&mut self, px: i32, py: i32, id: u32) {
        if !self.rect.contains(px, py) {
            return;
        }
        let lx = (px - self.rect.x) as usize;
        let ly = (py - self.rect.y) as usize;
        let offset = (ly * self.rect.width as usize + lx) * 4;
        if let Some(dst) = self.pixels.get_mut(offset..offset + 4) {
            dst.copy_from_slice(&encode_id(id));
        }
    }
}

/// Distinct non-zero ids in `buffer`, ascending. Ids above `piece_count` are ignored.
pub fn decode_ids(buffer: &PickingBuffer, piece_count: u32) -> Vec<PieceId> {
    let mut ids = BTreeSet::new();
    let mut ignored = 0usize;
    for px in buffer.pixels.chunks_exact(4) {
        let raw = decode_pixel([px[0], px[1], px[2], px[3]]);
        if raw == 0 {
            continue;
        }
        if raw > piece_count {
            ignored += 1;
            continue;
        }
        if let Some(id) = PieceId::new(raw) {
            ids.insert(id);
        }
    }
    if ignored > 0 {
        warn!(ignored, piece_count, "picking buffer held out-of-range ids");
    }
    ids.into_iter().collect()
}
