//! Terminal rocket flight (default binary).
//!
//! Fixed-rate loop: drain input, step the flight, render, sleep to the next
//! tick. Keyboard reads happen on a producer thread; everything else runs here.

use std::fs::OpenOptions;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use rocket_console::core::{FlightState, RunConfig, Scenery};
use rocket_console::input::{InputHandler, InputPump};
use rocket_console::term::{FlightView, FrameBuffer, TerminalRenderer, Viewport};

const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 80,
    height: 24,
};

fn main() -> Result<()> {
    let run_config = RunConfig::from_env().context("invalid ROCKET_* environment")?;
    init_logging(run_config.log_path.as_deref())?;

    let config = run_config.game_config().context("invalid flight configuration")?;
    let seed = run_config.seed.unwrap_or_else(clock_seed);
    let scenery = Scenery::generate(
        &config.world,
        run_config.cloud_count,
        run_config.tree_count,
        seed,
    );
    log::info!(
        "starting: gravity={} stages={} seed={} tick={}ms clouds={} trees={}",
        config.world.gravity.as_str(),
        config.stages.len(),
        seed,
        run_config.tick_ms,
        run_config.cloud_count,
        run_config.tree_count
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;
    log::info!("key release events: {}", term.keyboard_enhanced());

    let result = run(&mut term, FlightState::new(config), &scenery, run_config.tick_ms);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        log::error!("flight loop failed: {err:#}");
    }
    log::info!("shutdown");
    result
}

fn run(
    term: &mut TerminalRenderer,
    mut flight: FlightState,
    scenery: &Scenery,
    tick_ms: u32,
) -> Result<()> {
    let view = FlightView::new();
    let mut pump = InputPump::spawn()?;
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(FALLBACK_VIEWPORT.width, FALLBACK_VIEWPORT.height);

    let tick = Duration::from_millis(tick_ms as u64);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        for event in pump.drain() {
            input.handle_event_at(event.key, event.at);
        }
        if pump.is_disconnected() {
            pump.stop().context("input thread failed")?;
            log::info!("input closed, leaving");
            return Ok(());
        }
        let frame = input.frame();

        let elapsed_ms = frame_start
            .saturating_duration_since(last_frame)
            .as_millis()
            .min(u32::MAX as u128) as u32;
        last_frame = frame_start;
        flight.step(&frame, elapsed_ms);

        let viewport = term.viewport().unwrap_or(FALLBACK_VIEWPORT);
        view.render_into(&flight.snapshot(), scenery, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        if frame.quit_requested {
            log::info!(
                "quit after {} frames, {} crashes",
                flight.frames(),
                flight.crashes()
            );
            break;
        }

        if let Some(rest) = tick.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    pump.stop()
}

/// Send log records to `path` when set. The screen belongs to the game, so
/// without a path nothing is logged.
fn init_logging(path: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("install logger")?;
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
