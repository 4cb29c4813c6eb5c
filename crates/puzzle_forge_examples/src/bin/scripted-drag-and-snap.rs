use glam::Vec2;
use puzzle_forge::prelude::*;
use puzzle_forge_examples::{board_camera, init_tracing, render_model_to_png, RenderConfig};

const SCREEN: (u32, u32) = (1200, 800);

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = PuzzleConfig::new(800.0, 600.0, 24)
        .with_seed(7u64)
        .with_scramble_rotation(false);
    let mut model = generate_puzzle(config)?;

    // Start from the assembled board, then pull one piece out and put it back.
    for id in model.store.ids().collect::<Vec<_>>() {
        if let Some(home) = model.home(id) {
            model.store.set(id.get(), home.extend(0.0), Rotation::ZERO)?;
        }
    }

    let screen = Vec2::new(SCREEN.0 as f32, SCREEN.1 as f32);
    let camera = board_camera(&model, screen);
    let mut engine = InteractionEngine::new(Viewport::new(SCREEN.0, SCREEN.1, camera));
    let mut renderer = SoftwareRenderer::new();
    let mut sink = FnSink::new(|event: PuzzleEvent| match event {
        PuzzleEvent::Snapped {
            piece, neighbour, ..
        } => tracing::info!(%piece, %neighbour, "snapped"),
        other => tracing::debug!(event = ?other, "interaction event"),
    });

    let target = PieceId::new(8).ok_or_else(|| anyhow::anyhow!("board has no piece 8"))?;
    let home = model
        .home(target)
        .ok_or_else(|| anyhow::anyhow!("piece 8 has no home"))?;
    let grab = engine.viewport().world_to_screen(home);
    let away = grab + Vec2::new(0.0, -160.0);
    let near = grab + Vec2::new(6.0, 4.0);

    let pulled = {
        let mut ctx = InteractionContext::new(&mut model, &mut renderer, &mut sink);
        engine.on_pointer_down(PointerEvent::at(grab), &mut ctx);
        let selection = engine.selection().to_vec();
        for step in 1..=8 {
            let t = step as f32 / 8.0;
            engine.on_pointer_move(PointerEvent::at(grab.lerp(away, t)), &mut ctx);
        }
        engine.on_pointer_up(PointerEvent::at(away), &mut ctx);
        selection
    };
    render_model_to_png(
        &model,
        camera,
        &RenderConfig::new(SCREEN).with_selection(&pulled, [240, 80, 60]),
        "scripted-drag-pulled.png",
    )?;

    {
        let mut ctx = InteractionContext::new(&mut model, &mut renderer, &mut sink);
        engine.on_pointer_down(PointerEvent::at(away), &mut ctx);
        engine.on_pointer_move(PointerEvent::at(near), &mut ctx);
        engine.on_pointer_up(PointerEvent::at(near), &mut ctx);
    }
    render_model_to_png(
        &model,
        camera,
        &RenderConfig::new(SCREEN),
        "scripted-drag-snapped.png",
    )?;

    tracing::info!(solved = model.is_solved(1e-3), "scripted session finished");
    Ok(())
}
