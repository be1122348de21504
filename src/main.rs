//! Minigate entry point
//!
//! The browser build starts from `wasm_main`. The native binary has no DOM;
//! it runs every game headless for a few seconds of simulated frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = minigate::platform::web::run() {
        log::error!("Minigate failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Minigate (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the real thing");

    smoke_run(300);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run(frames: u32) {
    use minigate::driver::{Flow, FrameClock, run_frame};
    use minigate::renderer::CommandBuffer;
    use minigate::sim::create_game;
    use minigate::{GameKind, Tuning};

    let tuning = Tuning::load();
    for kind in GameKind::ALL {
        let mut game = create_game(kind, &tuning, 42);
        game.start(Box::new(move || log::info!("{} won", kind.as_str())));

        let mut painter = CommandBuffer::new();
        let mut clock = FrameClock::new();
        let mut ran = 0;
        for i in 0..frames {
            painter.clear_commands();
            ran += 1;
            if run_frame(game.as_mut(), &mut painter, &mut clock, i as f64 * 16.0) == Flow::Halt {
                break;
            }
        }
        game.stop();

        let hud = game.hud();
        println!(
            "{:<7} {:>4} frames, {:>3} draw calls/frame, {} | {}",
            kind.as_str(),
            ran,
            painter.commands.len(),
            hud.title,
            hud.status
        );
    }
}
