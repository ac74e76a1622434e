//! Scrollshot: a top-down arena shooter on a software-rendered camera
//!
//! - World camera at a reduced virtual resolution, upscaled nearest-neighbour
//! - Smooth follow of one player, zoom-to-fit for several
//! - Keyboard/mouse plus hot-pluggable gamepads, one player per device
//! - Aimed weapons with rotated muzzles, time-limited bullets
//!
//! Usage: `scrollshot [CONFIG_PATH]` (default `config/game.ron`).
//! `RUST_LOG` sets the log filter, `LOG_FORMAT=json` switches to JSON logs.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod asset;
mod config;
mod error;
mod game;
mod input;
mod rasterizer;

use std::path::PathBuf;

use macroquad::prelude::*;

use asset::AssetTable;
use config::{GameConfig, DEFAULT_CONFIG_PATH};
use game::{Runtime, ScreenSink};
use input::InputState;

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn window_conf() -> Conf {
    // Runs before logging is up; errors are reported again from main
    let display = GameConfig::load(config_path()).unwrap_or_default().display;
    Conf {
        window_title: format!("{} v{}", display.title, VERSION),
        window_width: display.width as i32,
        window_height: display.height as i32,
        window_resizable: true,
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: display.fullscreen,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

/// The manifest if present, coloured placeholders otherwise
fn load_assets(config: &GameConfig) -> error::Result<AssetTable> {
    let manifest = &config.assets.manifest;
    if manifest.exists() {
        AssetTable::load_manifest(manifest)
    } else {
        tracing::warn!(path = %manifest.display(), "no animation manifest, using placeholder sprites");
        Ok(AssetTable::placeholder())
    }
}

fn setup() -> error::Result<(InputState, Runtime)> {
    let config = GameConfig::load(config_path())?;
    let assets = load_assets(&config)?;
    let display = (config.display.width, config.display.height);
    let input = InputState::new(&config.input, display);
    let runtime = Runtime::new(config, assets, input.devices().len())?;
    Ok((input, runtime))
}

/// Wait out the rest of the target frame time
fn limit_frame_rate(frame_start: f64, target_fps: u32) {
    let target_frame_time = 1.0 / target_fps.max(1) as f64;

    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002; // 2ms
        while get_time() - frame_start + spin_margin < target_frame_time {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
    // WASM: the browser paces frames
    #[cfg(target_arch = "wasm32")]
    let _ = (frame_start, target_frame_time);
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    init_tracing();
    tracing::info!(version = VERSION, "starting");

    let (mut input, mut runtime) = match setup() {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            return;
        }
    };
    let target_fps = runtime.config().display.target_fps;
    let mut sink = ScreenSink::default();
    let mut display = (runtime.config().display.width, runtime.config().display.height);

    loop {
        let frame_start = get_time();

        // Render at the window size
        let screen = (screen_width() as usize, screen_height() as usize);
        if screen != display && screen.0 > 0 && screen.1 > 0 {
            if let Err(e) = runtime.resize(screen.0, screen.1) {
                tracing::error!(error = %e, "resize failed");
                break;
            }
            input.set_display(screen);
            display = screen;
        }

        let added = input.poll();
        if let Err(e) = runtime.add_devices(&added) {
            tracing::error!(error = %e, "failed to add player");
            break;
        }

        let dt = get_frame_time();
        if let Err(e) = runtime.frame(dt, input.devices()) {
            tracing::error!(error = %e, "frame failed");
            break;
        }

        runtime.draw();
        sink.paused = runtime.is_paused();
        runtime.window.present_to(&mut sink);

        limit_frame_rate(frame_start, target_fps);
        next_frame().await;
    }
}
