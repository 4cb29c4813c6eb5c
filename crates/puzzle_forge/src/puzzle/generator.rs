//! Generation pipeline: solver, grid, connector curves, outlines, mesh and initial state.
use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::{EventSink, PuzzleEvent};
use crate::geometry::connector::{curve_edges, TabShape};
use crate::geometry::mesh::PuzzleMesh;
use crate::geometry::offset::{offset_outline, signed_area2};
use crate::geometry::outline::{cell_center, stitch_outline};
use crate::geometry::triangulate::triangulate;
use crate::puzzle::config::PuzzleConfig;
use crate::puzzle::PuzzleModel;
use crate::random::{rand01, PuzzleRng};
use crate::state::{PieceId, PieceState, PieceStateStore, Rotation};
use crate::topology::grid::Grid;
use crate::topology::solver::solve_grid;

/// Runs [`PuzzleConfig`]s into [`PuzzleModel`]s.
#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    pub config: PuzzleConfig,
}

impl PuzzleGenerator {
    pub fn try_new(config: PuzzleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: PuzzleConfig) -> Self {
        debug_assert!(
            config.width > 0.0 && config.height > 0.0,
            "board size must be > 0"
        );
        debug_assert!(config.target_count > 0, "target_count must be > 0");
        debug_assert!(config.curve_divisions > 0, "curve_divisions must be > 0");

        Self { config }
    }

    /// Generates the puzzle from the configured seed.
    pub fn run(&self) -> Result<PuzzleModel> {
        self.run_with_events(&mut ())
    }

    pub fn run_with_events(&self, sink: &mut dyn EventSink) -> Result<PuzzleModel> {
        let mut rng = PuzzleRng::new(&self.config.seed);
        self.run_with_rng(&mut rng, sink)
    }

    /// Generates the puzzle drawing from `rng` instead of the configured seed.
    pub fn run_with_rng(
        &self,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<PuzzleModel> {
        generate_with_shape(&self.config, self.config.tab_shape, rng, sink)
    }

    /// Like [`PuzzleGenerator::run_with_events`], but retries geometry failures.
    ///
    /// Every retry restarts from the configured seed with the tab jitter halved. Errors other
    /// than [`Error::Geometry`] are returned immediately, as is the last geometry error.
    pub fn run_with_retries(
        &self,
        attempts: usize,
        sink: &mut dyn EventSink,
    ) -> Result<PuzzleModel> {
        let attempts = attempts.max(1);
        let mut shape = self.config.tab_shape;
        let mut attempt = 1;
        loop {
            let mut rng = PuzzleRng::new(&self.config.seed);
            match generate_with_shape(&self.config, shape, &mut rng, sink) {
                Err(err @ Error::Geometry { .. }) if attempt < attempts => {
                    warn!(attempt, %err, "generation failed, retrying with reduced jitter");
                    sink.send(PuzzleEvent::Warning {
                        context: format!("attempt {attempt}"),
                        message: err.to_string(),
                    });
                    shape = shape.scaled(0.5);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// Generate a puzzle from `config` with its own seed.
pub fn generate_puzzle(config: PuzzleConfig) -> Result<PuzzleModel> {
    PuzzleGenerator::try_new(config)?.run()
}

fn generate_with_shape(
    config: &PuzzleConfig,
    shape: TabShape,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<PuzzleModel> {
    config.validate()?;

    let size = solve_grid(config.width, config.height, config.target_count)?;
    let board_size = Vec2::new(config.width, config.height);
    let cell_size = board_size / Vec2::new(size.cols as f32, size.rows as f32);
    info!(
        cols = size.cols,
        rows = size.rows,
        pieces = size.total(),
        seed = %config.seed,
        "generating puzzle"
    );
    sink.send(PuzzleEvent::GenerationStarted {
        grid: size,
        seed: config.seed.clone(),
    });

    let mut grid = Grid::new(size, cell_size, config.borderless);
    grid.validate()?;

    let curved = curve_edges(&mut grid, rng, &shape, config.curve_divisions);
    let border = grid.border_count();
    sink.send(PuzzleEvent::CurvesGenerated { curved, border });

    let average_cell = (cell_size.x + cell_size.y) * 0.5;
    let gap = config.gap_ratio * average_cell;
    let piece_count = grid.pieces.len();
    let vertices_per_piece = 4 * (config.curve_divisions + 2);
    let mut mesh = PuzzleMesh::with_capacity(piece_count, vertices_per_piece);
    let mut centers = Vec::with_capacity(piece_count);

    for slot in 0..piece_count {
        let outline = stitch_outline(&grid, slot);
        let center = cell_center(&grid, slot);
        // Inset is to the right of travel for clockwise outlines.
        let inset = if signed_area2(&outline) < 0.0 { -gap } else { gap };
        let outline = offset_outline(&outline, inset);
        let triangles =
            triangulate(&outline).map_err(|source| Error::Geometry { piece: slot, source })?;
        let id = PieceId::from_slot(slot)
            .ok_or_else(|| Error::Topology(format!("piece slot {slot} has no id")))?;
        mesh.push_piece(id, &outline, center, board_size, &triangles);
        centers.push(center);
    }
    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "piece meshes built"
    );

    let layout: Vec<Vec2> = centers.iter().map(|c| *c * config.packing_scale).collect();
    let states = layout
        .iter()
        .map(|position| {
            let rotation = if config.scramble_rotation {
                Rotation::from_quarter_turns((rand01(rng) * 4.0) as u32)
            } else {
                Rotation::ZERO
            };
            PieceState::new(position.extend(0.0), rotation)
        })
        .collect();
    let store = PieceStateStore::new(states);

    grid.collapse_curves();

    info!(
        pieces = piece_count,
        edges = grid.edges.len(),
        triangles = mesh.triangle_count(),
        "puzzle generated"
    );
    sink.send(PuzzleEvent::GenerationFinished {
        pieces: piece_count,
        triangles: mesh.triangle_count(),
    });

    Ok(PuzzleModel {
        grid,
        centers,
        layout,
        mesh,
        store,
        board_size,
        cell_size,
        snap_tolerance: config.snap_ratio * average_cell,
        gap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::events::VecSink;
    use crate::geometry::connector::TAB_INTERIOR_POINTS;
    use crate::random::tests::FixedRng;

    fn regular_4x3() -> PuzzleConfig {
        PuzzleConfig::new(400.0, 300.0, 12)
            .with_tab_shape(TabShape::regular())
            .with_scramble_rotation(false)
    }

    #[test]
    fn regular_board_has_expected_counts() {
        let model = PuzzleGenerator::try_new(regular_4x3())
            .unwrap()
            .run_with_rng(&mut FixedRng { value: 0 }, &mut ())
            .unwrap();
        assert_eq!(model.piece_count(), 12);
        assert_eq!(model.grid.edges.len(), 31);
        assert_eq!(model.grid.border_count(), 14);
        assert_eq!(model.mesh.piece_count(), 12);
        assert!(model.grid.edges.iter().all(|e| e.curve.is_empty()));
        assert!((model.snap_tolerance - 15.0).abs() < 1e-4);
        assert_eq!(model.store.buffer().side(), 4);
    }

    #[test]
    fn initial_layout_is_spread_by_packing_scale() {
        let model = generate_puzzle(regular_4x3()).unwrap();
        let first = model.store.get(1).unwrap();
        assert!(first.position.truncate().distance(Vec2::new(80.0, 80.0)) < 1e-4);
        assert_eq!(first.rotation, Rotation::ZERO);
        let (min, max) = model.table_bounds();
        assert_eq!(min, Vec2::new(80.0, 80.0));
        assert_eq!(max, Vec2::new(560.0, 400.0));
        assert!(!model.is_solved(1e-3));
    }

    #[test]
    fn events_bracket_generation() {
        let mut sink = VecSink::new();
        PuzzleGenerator::new(regular_4x3())
            .run_with_events(&mut sink)
            .unwrap();
        let events = sink.into_inner();
        assert!(matches!(events.first(), Some(PuzzleEvent::GenerationStarted { .. })));
        assert!(matches!(
            events.get(1),
            Some(PuzzleEvent::CurvesGenerated {
                curved: 17,
                border: 14
            })
        ));
        assert!(matches!(
            events.last(),
            Some(PuzzleEvent::GenerationFinished { pieces: 12, .. })
        ));
    }

    #[test]
    fn same_seed_reproduces_mesh() {
        let config = PuzzleConfig::new(640.0, 480.0, 48).with_seed("determinism");
        let a = generate_puzzle(config.clone()).unwrap();
        let b = generate_puzzle(config).unwrap();
        assert_eq!(a.mesh.positions, b.mesh.positions);
        assert_eq!(a.mesh.indices, b.mesh.indices);
        assert_eq!(a.store.snapshot(), b.store.snapshot());
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let mut sink = VecSink::new();
        let generator = PuzzleGenerator {
            config: PuzzleConfig::new(-1.0, 10.0, 4),
        };
        let err = generator.run_with_events(&mut sink).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn retries_return_config_errors_immediately() {
        let generator = PuzzleGenerator {
            config: PuzzleConfig::new(10.0, 10.0, 0),
        };
        let mut sink = VecSink::new();
        assert!(matches!(
            generator.run_with_retries(3, &mut sink),
            Err(Error::InvalidConfig(_))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn rotation_draws_follow_the_curve_draws() {
        let config = PuzzleConfig::new(400.0, 300.0, 12).with_seed(42u64);
        let model = generate_puzzle(config.clone()).unwrap();

        let mut rng = PuzzleRng::new(&config.seed);
        for _ in 0..17 * (1 + 7 + TAB_INTERIOR_POINTS) {
            rng.next_u32();
        }
        let expected: Vec<Rotation> = (0..12)
            .map(|_| Rotation::from_quarter_turns((rand01(&mut rng) * 4.0) as u32))
            .collect();
        let actual: Vec<Rotation> = model.store.states().iter().map(|s| s.rotation).collect();
        assert_eq!(actual, expected);
    }

    /// Tabs wide and jittery enough to fold every outline over itself.
    fn tangled_shape() -> TabShape {
        TabShape {
            width: (0.9, 0.95),
            nip_jitter: 0.6,
            edge_shift: 0.6,
            ..TabShape::organic()
        }
    }

    #[test]
    fn self_intersecting_outline_aborts_generation() {
        let config = PuzzleConfig::new(400.0, 300.0, 12)
            .with_seed(3u64)
            .with_tab_shape(tangled_shape());
        let mut sink = VecSink::new();
        let err = PuzzleGenerator::new(config)
            .run_with_events(&mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Geometry {
                source: GeometryError::SelfIntersecting { .. },
                ..
            }
        ));
        assert!(!sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, PuzzleEvent::GenerationFinished { .. })));
    }

    fn warnings(sink: &VecSink) -> usize {
        sink.as_slice()
            .iter()
            .filter(|e| matches!(e, PuzzleEvent::Warning { .. }))
            .count()
    }

    #[test]
    fn retries_give_up_when_jitter_is_not_the_cause() {
        // Tab width is not scaled by retries, so every attempt fails the same way.
        let config = PuzzleConfig::new(400.0, 300.0, 12)
            .with_seed(3u64)
            .with_tab_shape(tangled_shape());
        let mut sink = VecSink::new();
        let result = PuzzleGenerator::new(config).run_with_retries(6, &mut sink);
        assert!(matches!(result, Err(Error::Geometry { .. })));
        assert_eq!(warnings(&sink), 5);
        assert_eq!(sink.len(), 6 * 2 + 5);
    }

    #[test]
    fn retries_recover_once_jitter_is_halved_enough() {
        // Corner shifts of up to two edge lengths tangle the board; six halvings bring
        // them below the organic default.
        let shape = TabShape {
            edge_shift: 2.0,
            ..TabShape::organic()
        };
        let config = PuzzleConfig::new(400.0, 300.0, 12)
            .with_seed(3u64)
            .with_tab_shape(shape);
        let generator = PuzzleGenerator::new(config);
        assert!(matches!(generator.run(), Err(Error::Geometry { .. })));

        let mut sink = VecSink::new();
        let model = generator.run_with_retries(10, &mut sink).unwrap();
        assert_eq!(model.piece_count(), 12);
        let retried = warnings(&sink);
        assert!((1..10).contains(&retried), "{retried} retries");
        assert!(matches!(
            sink.as_slice().last(),
            Some(PuzzleEvent::GenerationFinished { pieces: 12, .. })
        ));
    }

    #[test]
    fn scrambled_rotations_are_seeded() {
        let config = PuzzleConfig::new(400.0, 300.0, 12).with_seed(42u64);
        let a = generate_puzzle(config.clone()).unwrap();
        let b = generate_puzzle(config).unwrap();
        let rotations = |m: &PuzzleModel| -> Vec<Rotation> {
            m.store.states().iter().map(|s| s.rotation).collect()
        };
        assert_eq!(rotations(&a), rotations(&b));
    }
}
