#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{board_camera, init_tracing, piece_color, render_model_to_png, RenderConfig};
