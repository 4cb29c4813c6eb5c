//! Square, power-of-two sized per-piece state buffer consumed by renderers.
use crate::state::PieceState;

/// Channels stored per cell: x, y, z, rotation (radians).
pub const CHANNELS: usize = 4;

/// Per-piece `(x, y, z, rotation)` texels indexed by piece id. Cell 0 is never written.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedPieceBuffer {
    side: usize,
    data: Vec<f32>,
}

impl PackedPieceBuffer {
    /// Smallest power of two whose square holds `piece_count + 1` cells.
    pub fn side_for(piece_count: usize) -> usize {
        let cells = piece_count + 1;
        let mut root = (cells as f64).sqrt().ceil() as usize;
        // Guard against the float root landing one short for large counts.
        while root * root < cells {
            root += 1;
        }
        root.next_power_of_two()
    }

    pub fn new(piece_count: usize) -> Self {
        let side = Self::side_for(piece_count);
        Self {
            side,
            data: vec![0.0; side * side * CHANNELS],
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of cells (`side²`).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.side * self.side
    }

    /// Texel coordinates `(column, row)` of the cell for `index`.
    pub fn texel_of(&self, index: usize) -> (usize, usize) {
        (index % self.side, index / self.side)
    }

    /// Overwrite all four channels of cell `index`. Out-of-capacity indices are ignored.
    pub fn write(&mut self, index: usize, state: &PieceState) {
        if let Some(cell) = self.cell_mut(index) {
            cell.copy_from_slice(&[
                state.position.x,
                state.position.y,
                state.position.z,
                state.rotation.radians(),
            ]);
        }
    }

    pub fn read(&self, index: usize) -> Option<[f32; CHANNELS]> {
        let start = index.checked_mul(CHANNELS)?;
        let cell = self.data.get(start..start + CHANNELS)?;
        let mut out = [0.0; CHANNELS];
        out.copy_from_slice(cell);
        Some(out)
    }

    /// Raw channel data, row-major, `CHANNELS` floats per cell.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    fn cell_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        let start = index.checked_mul(CHANNELS)?;
        self.data.get_mut(start..start + CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::state::Rotation;

    #[test]
    fn side_is_smallest_fitting_power_of_two() {
        assert_eq!(PackedPieceBuffer::side_for(2000), 64);
        assert_eq!(PackedPieceBuffer::side_for(12), 4);
        assert_eq!(PackedPieceBuffer::side_for(15), 4);
        assert_eq!(PackedPieceBuffer::side_for(16), 8);
        assert_eq!(PackedPieceBuffer::side_for(0), 1);
        for count in [1usize, 7, 63, 255, 4095, 5000] {
            let side = PackedPieceBuffer::side_for(count);
            assert!(side.is_power_of_two());
            assert!(side * side > count);
            assert!((side / 2) * (side / 2) < count + 1 || side == 1);
        }
    }

    #[test]
    fn write_then_read_cell() {
        let mut buffer = PackedPieceBuffer::new(12);
        let state = PieceState::new(Vec3::new(1.0, 2.0, 0.1), Rotation::from_quarter_turns(2));
        buffer.write(5, &state);
        let cell = buffer.read(5).unwrap();
        assert_eq!(&cell[..3], &[1.0, 2.0, 0.1]);
        assert!((cell[3] - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(buffer.texel_of(5), (1, 1));
        assert_eq!(buffer.read(0), Some([0.0; 4]));
        assert_eq!(buffer.read(16), None);
    }
}
