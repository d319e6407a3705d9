mod shared;
mod tui;
mod remote_api;
mod remote;
mod curve;
mod middle;
mod pipeline;

use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use curve::SurfaceSize;
use middle::Middle;
use pipeline::persistence;
use shared::InputEvent;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let session_dir: PathBuf = std::env::current_dir().unwrap_or_default();
    init_logging(&session_dir);

    let mut config = persistence::load_config(&session_dir).unwrap_or_default();
    // usage: pulsetty [server_url] [device_id]; arguments win over the saved config
    if let Some(url) = std::env::args().nth(1) {
        config.server_url = url;
    }
    if let Some(device) = std::env::args().nth(2) {
        config.device_id = device;
    }
    tracing::info!(server = %config.server_url, device = %config.device_id, "starting");

    let remote = remote::start_remote(&config.server_url)?;

    terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    let _guard = RawModeGuard; // auto drops when out of scope

    // placeholder surface until the first frame reports the real pane size
    let mut middle = Middle::with_config(config, SurfaceSize::new(80.0, 24.0));

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let mut last_tick = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let ds = middle.display_state();
        tui_state.renaming = ds.renaming;

        term.draw(|frame| {
            let area = frame.area();
            tui::view::render(frame, area, &ds, &mut tui_state);
        })?;

        // the renderer just measured the curve pane; keep the session
        // surface in step with it (terminal resizes included)
        if let Some(area) = tui_state.curve_area {
            let surface = SurfaceSize::new(area.width as f64, area.height as f64);
            if surface != ds.surface {
                middle.handle_input(InputEvent::SurfaceResized(surface));
            }
        }

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                // save the editor setup before quitting
                let _ = persistence::save_config(&session_dir, &middle.config());
                drop(term);
                return Ok(());
            }
            let cmds = middle.handle_input(event);
            for cmd in cmds {
                remote.send(cmd);
            }
        }

        while let Some(reply) = remote.poll_reply() {
            middle.on_remote_reply(reply);
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        middle.tick(elapsed);
    }
}

// the TUI owns the terminal, so logs go to a file next to the config
fn init_logging(session_dir: &Path) {
    let log_dir = session_dir.join(".pulsetty");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(log_dir.join("pulsetty.log")) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
        let _ = terminal::disable_raw_mode();
    }
}
