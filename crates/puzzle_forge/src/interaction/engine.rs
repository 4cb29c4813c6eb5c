//! Pointer-driven interaction state machine.
//!
//! The engine is the only writer to the piece state store once a puzzle is generated. Each
//! handler runs to completion; picking queries go synchronously through the renderer against
//! the state the user currently sees.
use glam::{Vec2, Vec3};
use mint::Point2;
use tracing::{debug, trace};

use crate::events::{EventSink, PuzzleEvent};
use crate::interaction::camera::CameraView;
use crate::interaction::picking::{decode_ids, ScreenRect};
use crate::interaction::snap::snap_pieces;
use crate::puzzle::PuzzleModel;
use crate::render::{PuzzleRenderer, Viewport};
use crate::state::PieceId;

/// Draw-order hint for pieces that follow the pointer.
pub const DRAG_Z: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };
}

/// A pointer sample in screen pixels (top-left origin, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Point2<f32>,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: impl Into<Point2<f32>>, button: PointerButton) -> Self {
        Self {
            position: position.into(),
            button,
            modifiers: Modifiers::NONE,
        }
    }

    /// A primary-button event, the usual shape of move samples.
    pub fn at(position: impl Into<Point2<f32>>) -> Self {
        Self::new(position, PointerButton::Primary)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    fn screen(&self) -> Vec2 {
        Vec2::from(self.position)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A selection rectangle is being dragged out, in screen pixels.
    Selecting { anchor: Vec2, current: Vec2 },
    /// Selected pieces follow the pointer; `last` is the previous world sample.
    DraggingPieces { last: Vec2 },
    /// The view follows the pointer; `last` is the previous screen sample.
    PanningCamera { last: Vec2 },
}

/// Collaborators a handler needs for one event.
pub struct InteractionContext<'a> {
    pub model: &'a mut PuzzleModel,
    pub renderer: &'a mut dyn PuzzleRenderer,
    pub sink: &'a mut dyn EventSink,
}

impl<'a> InteractionContext<'a> {
    pub fn new(
        model: &'a mut PuzzleModel,
        renderer: &'a mut dyn PuzzleRenderer,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            model,
            renderer,
            sink,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InteractionEngine {
    state: InteractionState,
    selection: Vec<PieceId>,
    viewport: Viewport,
}

impl InteractionEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: InteractionState::Idle,
            selection: Vec::new(),
            viewport,
        }
    }

    /// An engine whose camera frames the model's initial layout.
    pub fn for_model(model: &PuzzleModel, width: u32, height: u32) -> Self {
        let (min, max) = model.table_bounds();
        let margin = model.average_cell_size();
        let camera = CameraView::fit(
            min - Vec2::splat(margin),
            max + Vec2::splat(margin),
            Vec2::new(width as f32, height as f32),
        );
        Self::new(Viewport::new(width, height, camera))
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn selection(&self) -> &[PieceId] {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &CameraView {
        &self.viewport.camera
    }

    /// Centre the view on the model's table without changing the zoom.
    pub fn recenter(&mut self, model: &PuzzleModel) {
        let (min, max) = model.table_bounds();
        self.viewport.camera.center_on(min, max);
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.viewport.screen_to_world(screen)
    }

    /// Draw the scene, handing the renderer the dirty flag of the packed buffer.
    pub fn render(&self, ctx: &mut InteractionContext<'_>) {
        let dirty = ctx.model.store.take_dirty();
        let frame = ctx.model.frame(self.viewport, dirty);
        ctx.renderer.render_scene(&frame);
    }

    pub fn on_pointer_down(&mut self, event: PointerEvent, ctx: &mut InteractionContext<'_>) {
        if matches!(self.state, InteractionState::DraggingPieces { .. }) {
            debug!("pointer down while dragging, releasing first");
            self.release_drag(ctx);
        }
        let screen = event.screen();

        match (event.button, event.modifiers) {
            (PointerButton::Primary, Modifiers { ctrl: true, .. }) => {
                self.state = InteractionState::Selecting {
                    anchor: screen,
                    current: screen,
                };
            }
            (PointerButton::Primary, Modifiers { shift: true, .. })
            | (PointerButton::Middle, _) => {
                self.pick(ScreenRect::pixel(screen), ctx);
                self.state = InteractionState::PanningCamera { last: screen };
            }
            (PointerButton::Primary, _) => {
                self.pick(ScreenRect::pixel(screen), ctx);
                self.state = if self.selection.is_empty() {
                    InteractionState::Idle
                } else {
                    InteractionState::DraggingPieces {
                        last: self.screen_to_world(screen),
                    }
                };
            }
            (PointerButton::Secondary, _) => {
                self.pick(ScreenRect::pixel(screen), ctx);
                self.rotate_selection(ctx);
            }
        }
        trace!(state = ?self.state, "pointer down handled");
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent, ctx: &mut InteractionContext<'_>) {
        let screen = event.screen();
        match self.state {
            InteractionState::Idle => {}
            InteractionState::Selecting { anchor, .. } => {
                self.state = InteractionState::Selecting {
                    anchor,
                    current: screen,
                };
            }
            InteractionState::PanningCamera { last } => {
                self.viewport.camera.pan(screen - last);
                self.state = InteractionState::PanningCamera { last: screen };
            }
            InteractionState::DraggingPieces { last } => {
                let world = self.screen_to_world(screen);
                self.drag_by(world - last, ctx);
                self.state = InteractionState::DraggingPieces { last: world };
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent, ctx: &mut InteractionContext<'_>) {
        match self.state {
            InteractionState::Selecting { anchor, .. } => {
                let rect = ScreenRect::from_corners(anchor, event.screen());
                self.pick(rect, ctx);
                debug!(?rect, selected = self.selection.len(), "rectangle selection");
            }
            InteractionState::DraggingPieces { .. } => self.release_drag(ctx),
            InteractionState::PanningCamera { .. } | InteractionState::Idle => {}
        }
        self.state = InteractionState::Idle;
    }

    /// Rotate one piece by a quarter turn and try to snap it.
    pub fn on_discrete_rotate_command(
        &mut self,
        piece: PieceId,
        ctx: &mut InteractionContext<'_>,
    ) {
        self.rotate_pieces(&[piece], ctx);
    }

    /// Rotate every selected piece by a quarter turn.
    pub fn rotate_selection(&mut self, ctx: &mut InteractionContext<'_>) {
        let pieces = self.selection.clone();
        self.rotate_pieces(&pieces, ctx);
    }

    /// Zoom about the cursor. Positive `delta` zooms out.
    pub fn on_wheel(&mut self, delta: f32, cursor: impl Into<Point2<f32>>) {
        let world = self.screen_to_world(Vec2::from(cursor.into()));
        self.viewport.camera.wheel(delta, world);
        trace!(zoom = self.viewport.camera.zoom, "wheel zoom");
    }

    fn pick(&mut self, rect: ScreenRect, ctx: &mut InteractionContext<'_>) {
        let count = ctx.model.piece_count();
        let frame = ctx.model.frame(self.viewport, ctx.model.store.is_dirty());
        let buffer = ctx.renderer.render_picking_buffer(&frame, rect);
        self.selection = decode_ids(&buffer, count);
        ctx.sink.send(PuzzleEvent::SelectionChanged {
            selection: self.selection.clone(),
        });
    }

    fn drag_by(&mut self, delta: Vec2, ctx: &mut InteractionContext<'_>) {
        let store = &mut ctx.model.store;
        let ids: Vec<PieceId> = store.ids().collect();
        for id in ids {
            let Ok(state) = store.piece(id) else {
                continue;
            };
            let position = if self.selection.contains(&id) {
                (state.position.truncate() + delta).extend(DRAG_Z)
            } else {
                Vec3::new(state.position.x, state.position.y, 0.0)
            };
            if let Err(err) = store.set(id.get(), position, state.rotation) {
                debug!(%err, "drag write ignored");
            }
        }
    }

    fn release_drag(&mut self, ctx: &mut InteractionContext<'_>) {
        let pieces = std::mem::take(&mut self.selection);
        self.drop_and_snap(&pieces, ctx);
        ctx.sink.send(PuzzleEvent::PiecesDropped { pieces });
        self.state = InteractionState::Idle;
    }

    fn rotate_pieces(&mut self, pieces: &[PieceId], ctx: &mut InteractionContext<'_>) {
        for &piece in pieces {
            let state = match ctx.model.store.piece(piece) {
                Ok(state) => state,
                Err(err) => {
                    debug!(%err, "rotate ignored");
                    continue;
                }
            };
            let rotation = state.rotation.rotate_quarter();
            if let Err(err) = ctx.model.store.set(piece.get(), state.position, rotation) {
                debug!(%err, "rotate ignored");
                continue;
            }
            ctx.sink.send(PuzzleEvent::PieceRotated { piece, rotation });
        }
        self.drop_and_snap(pieces, ctx);
    }

    /// Snap each piece against its neighbours, then lower it to `z = 0`.
    fn drop_and_snap(&self, pieces: &[PieceId], ctx: &mut InteractionContext<'_>) {
        let model = &mut *ctx.model;
        snap_pieces(
            &model.grid,
            &model.centers,
            &mut model.store,
            pieces,
            model.snap_tolerance,
            &mut *ctx.sink,
        );
        for &piece in pieces {
            if let Ok(state) = model.store.piece(piece) {
                let grounded = Vec3::new(state.position.x, state.position.y, 0.0);
                if let Err(err) = model.store.set(piece.get(), grounded, state.rotation) {
                    debug!(%err, "drop ignored");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecSink;
    use crate::geometry::connector::TabShape;
    use crate::interaction::picking::PickingBuffer;
    use crate::puzzle::{generate_puzzle, PuzzleConfig};
    use crate::render::Frame;
    use crate::state::Rotation;

    /// Answers every picking query with one fixed id in the rectangle's first pixel.
    #[derive(Default)]
    struct FixedPicker {
        id: u32,
        rects: Vec<ScreenRect>,
        scenes: usize,
    }

    impl PuzzleRenderer for FixedPicker {
        fn render_scene(&mut self, _frame: &Frame<'_>) {
            self.scenes += 1;
        }

        fn render_picking_buffer(
            &mut self,
            _frame: &Frame<'_>,
            rect: ScreenRect,
        ) -> PickingBuffer {
            self.rects.push(rect);
            let mut buffer = PickingBuffer::cleared(rect);
            buffer.put(rect.x, rect.y, self.id);
            buffer
        }
    }

    fn model() -> PuzzleModel {
        generate_puzzle(
            PuzzleConfig::new(400.0, 300.0, 12)
                .with_tab_shape(TabShape::regular())
                .with_scramble_rotation(false),
        )
        .unwrap()
    }

    fn engine() -> InteractionEngine {
        InteractionEngine::new(Viewport::new(800, 600, CameraView::default()))
    }

    fn id(raw: u32) -> PieceId {
        PieceId::new(raw).unwrap()
    }

    #[test]
    fn drag_moves_selection_and_raises_it() {
        let mut model = model();
        let before = model.store.get(5).unwrap().position;
        let mut picker = FixedPicker {
            id: 5,
            ..Default::default()
        };
        let mut sink = VecSink::new();
        let mut engine = engine();
        {
            let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut sink);
            engine.on_pointer_down(PointerEvent::at([100.0, 100.0]), &mut ctx);
            assert_eq!(engine.selection(), &[id(5)]);
            assert!(matches!(engine.state(), InteractionState::DraggingPieces { .. }));

            engine.on_pointer_move(PointerEvent::at([110.0, 100.0]), &mut ctx);
            let moved = ctx.model.store.get(5).unwrap().position;
            assert_eq!(moved, Vec3::new(before.x + 10.0, before.y, DRAG_Z));
            assert_eq!(ctx.model.store.get(1).unwrap().position.z, 0.0);

            engine.on_pointer_up(PointerEvent::at([110.0, 100.0]), &mut ctx);
            assert_eq!(ctx.model.store.get(5).unwrap().position.z, 0.0);
        }
        assert_eq!(engine.state(), InteractionState::Idle);
        assert!(engine.selection().is_empty());
        assert_eq!(picker.rects, vec![ScreenRect::new(100, 100, 1, 1)]);
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, PuzzleEvent::PiecesDropped { pieces } if pieces == &[id(5)])));
    }

    #[test]
    fn release_near_home_snaps_to_neighbour() {
        let mut model = model();
        let home2 = model.home(id(2)).unwrap();
        let home5 = model.home(id(5)).unwrap();
        model.store.set(2, home2.extend(0.0), Rotation::ZERO).unwrap();
        let start = home5 + Vec2::new(-7.0, -2.0);
        model.store.set(5, start.extend(0.0), Rotation::ZERO).unwrap();

        let mut picker = FixedPicker {
            id: 5,
            ..Default::default()
        };
        let mut sink = VecSink::new();
        let mut engine = engine();
        {
            let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut sink);
            engine.on_pointer_down(PointerEvent::at([300.0, 300.0]), &mut ctx);
            engine.on_pointer_move(PointerEvent::at([310.0, 300.0]), &mut ctx);
            engine.on_pointer_up(PointerEvent::at([310.0, 300.0]), &mut ctx);
        }
        let placed = model.store.get(5).unwrap().position;
        assert!(placed.truncate().distance(home5) < 1e-3, "{placed:?}");
        assert_eq!(sink.snap_count(), 1);
    }

    #[test]
    fn empty_pick_clears_selection() {
        let mut model = model();
        let mut picker = FixedPicker::default();
        let mut sink = VecSink::new();
        let mut engine = engine();
        let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut sink);
        engine.on_pointer_down(PointerEvent::at([5.0, 5.0]), &mut ctx);
        assert!(engine.selection().is_empty());
        assert_eq!(engine.state(), InteractionState::Idle);
    }

    #[test]
    fn out_of_range_pick_is_ignored() {
        let mut model = model();
        let mut picker = FixedPicker {
            id: 500,
            ..Default::default()
        };
        let mut engine = engine();
        let mut quiet = VecSink::new();
        let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut quiet);
        engine.on_pointer_down(PointerEvent::at([5.0, 5.0]), &mut ctx);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn four_rotations_restore_orientation() {
        let mut model = model();
        let mut picker = FixedPicker::default();
        let mut sink = VecSink::new();
        let mut engine = engine();
        let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut sink);
        let original = ctx.model.store.get(3).unwrap();
        for turn in 1..=4u32 {
            engine.on_discrete_rotate_command(id(3), &mut ctx);
            let rotation = ctx.model.store.get(3).unwrap().rotation;
            assert_eq!(rotation, Rotation::from_quarter_turns(turn));
        }
        assert_eq!(ctx.model.store.get(3).unwrap(), original);
    }

    #[test]
    fn secondary_click_rotates_picked_piece() {
        let mut model = model();
        let mut picker = FixedPicker {
            id: 7,
            ..Default::default()
        };
        let mut engine = engine();
        let mut quiet = VecSink::new();
        let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut quiet);
        engine.on_pointer_down(
            PointerEvent::new([50.0, 50.0], PointerButton::Secondary),
            &mut ctx,
        );
        assert_eq!(ctx.model.store.get(7).unwrap().rotation.quarter_turns(), 1);
        assert_eq!(engine.state(), InteractionState::Idle);
    }

    #[test]
    fn shift_drag_pans_without_touching_pieces() {
        let mut model = model();
        let before = model.store.snapshot();
        let mut picker = FixedPicker {
            id: 2,
            ..Default::default()
        };
        let mut engine = engine();
        {
            let mut quiet = VecSink::new();
            let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut quiet);
            let down = PointerEvent::at([100.0, 100.0]).with_modifiers(Modifiers::SHIFT);
            engine.on_pointer_down(down, &mut ctx);
            assert!(matches!(engine.state(), InteractionState::PanningCamera { .. }));
            engine.on_pointer_move(PointerEvent::at([120.0, 90.0]), &mut ctx);
            engine.on_pointer_up(PointerEvent::at([120.0, 90.0]), &mut ctx);
        }
        assert_eq!(engine.camera().offset, Vec2::new(-20.0, -10.0));
        assert_eq!(model.store.snapshot(), before);

        engine.on_wheel(-200.0, [400.0, 300.0]);
        let zoom = engine.camera().zoom;
        engine.recenter(&model);
        assert_eq!(engine.camera().offset, Vec2::new(320.0, 240.0));
        assert_eq!(engine.camera().zoom, zoom);
    }

    #[test]
    fn ctrl_drag_picks_rectangle_on_release() {
        let mut model = model();
        let mut picker = FixedPicker {
            id: 4,
            ..Default::default()
        };
        let mut engine = engine();
        {
            let mut quiet = VecSink::new();
            let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut quiet);
            let down = PointerEvent::at([200.0, 150.0]).with_modifiers(Modifiers::CTRL);
            engine.on_pointer_down(down, &mut ctx);
            engine.on_pointer_move(PointerEvent::at([150.0, 190.0]), &mut ctx);
            assert_eq!(
                engine.state(),
                InteractionState::Selecting {
                    anchor: Vec2::new(200.0, 150.0),
                    current: Vec2::new(150.0, 190.0)
                }
            );
            engine.on_pointer_up(PointerEvent::at([150.0, 190.0]), &mut ctx);
        }
        assert_eq!(picker.rects, vec![ScreenRect::new(150, 150, 50, 40)]);
        assert_eq!(engine.selection(), &[id(4)]);
        assert_eq!(engine.state(), InteractionState::Idle);
    }

    #[test]
    fn new_press_while_dragging_releases_first() {
        let mut model = model();
        let mut picker = FixedPicker {
            id: 9,
            ..Default::default()
        };
        let mut sink = VecSink::new();
        let mut engine = engine();
        {
            let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut sink);
            engine.on_pointer_down(PointerEvent::at([10.0, 10.0]), &mut ctx);
            engine.on_pointer_move(PointerEvent::at([20.0, 10.0]), &mut ctx);
            engine.on_pointer_down(PointerEvent::at([20.0, 10.0]), &mut ctx);
        }
        let events = sink.into_inner();
        let dropped = events
            .iter()
            .position(|e| matches!(e, PuzzleEvent::PiecesDropped { .. }))
            .expect("implicit release");
        let reselected = events
            .iter()
            .rposition(|e| matches!(e, PuzzleEvent::SelectionChanged { .. }))
            .unwrap();
        assert!(dropped < reselected);
        assert_eq!(model.store.get(9).unwrap().position.z, 0.0);
    }

    #[test]
    fn wheel_and_render_use_the_viewport() {
        let mut model = model();
        let mut picker = FixedPicker::default();
        let mut engine = InteractionEngine::for_model(&model, 800, 600);
        let zoom = engine.camera().zoom;
        engine.on_wheel(-100.0, [400.0, 300.0]);
        assert!((engine.camera().zoom - zoom * 1.1).abs() < 1e-4);

        let mut quiet = VecSink::new();
        let mut ctx = InteractionContext::new(&mut model, &mut picker, &mut quiet);
        engine.render(&mut ctx);
        assert!(!ctx.model.store.is_dirty());
        assert_eq!(picker.scenes, 1);
    }
}
