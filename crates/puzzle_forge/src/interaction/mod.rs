//! Runtime interaction: picking decode, camera, neighbour snapping and the pointer state machine.
pub mod camera;
pub mod engine;
pub mod picking;
pub mod snap;

pub use camera::CameraView;
pub use engine::{
    InteractionContext, InteractionEngine, InteractionState, Modifiers, PointerButton, PointerEvent,
};
pub use picking::{decode_ids, encode_id, PickingBuffer, ScreenRect};
pub use snap::{snap_piece, snap_pieces, Snap};
