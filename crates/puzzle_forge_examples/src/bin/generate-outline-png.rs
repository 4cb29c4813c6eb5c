use glam::Vec2;
use puzzle_forge::prelude::*;
use puzzle_forge_examples::{board_camera, init_tracing, render_model_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Pass a seed text to reproduce a board; otherwise a random numeric seed is drawn.
    let seed = match std::env::args().nth(1) {
        Some(text) => Seed::from(text.as_str()),
        None => Seed::Number(rand::random()),
    };
    tracing::info!(?seed, "seed");
    let config = PuzzleConfig::new(1920.0, 1080.0, 100).with_seed(seed);
    let mut sink = FnSink::new(|event: PuzzleEvent| tracing::debug!(?event, "generation event"));
    let mut model = PuzzleGenerator::try_new(config)?.run_with_retries(3, &mut sink)?;

    let render = RenderConfig::new((1600, 1000));
    let screen = Vec2::new(1600.0, 1000.0);

    // Scattered start: the layout spread by the packing scale with scrambled rotations.
    let (min, max) = model.table_bounds();
    let margin = Vec2::splat(model.average_cell_size());
    let table = CameraView::fit(min - margin, max + margin, screen);
    render_model_to_png(&model, table, &render, "generate-outline-scattered.png")?;

    // Assembled board: every piece at home, unrotated.
    for id in model.store.ids().collect::<Vec<_>>() {
        if let Some(home) = model.home(id) {
            model.store.set(id.get(), home.extend(0.0), Rotation::ZERO)?;
        }
    }
    render_model_to_png(
        &model,
        board_camera(&model, screen),
        &render.with_background([230, 236, 245]),
        "generate-outline-assembled.png",
    )?;

    tracing::info!(
        pieces = model.piece_count(),
        triangles = model.mesh.triangle_count(),
        solved = model.is_solved(1e-3),
        "done"
    );
    Ok(())
}
