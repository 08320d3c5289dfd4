//! Drawerstack TUI: itinerary with stacked drawers.
//!
//! Drawers open as a bottom sheet on narrow terminals and as a side panel on
//! wide ones; the hotel picker always goes fullscreen. Resize the terminal
//! across 96 columns to watch open drawers switch mode.

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::Level;

use drawerstack_core::{session, DrawerConfig, DrawerController};
use drawerstack_tui::app::AppState;
use drawerstack_tui::content::{self, TuiController};
use drawerstack_tui::geometry::cols_to_px;
use drawerstack_tui::{input, logging, ui};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);
        default_hook(info);
    }));

    let log_path = logging::app_path("drawerstack.log");
    logging::init(&log_path, Level::DEBUG)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let config_path = logging::app_path("config.toml");
    let config = if config_path.exists() {
        DrawerConfig::load(&config_path)?
    } else {
        DrawerConfig::default()
    };
    tracing::info!(path = %config_path.display(), "configuration loaded");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    let mut app = AppState::new();
    app.screen = Rect::new(0, 0, size.width, size.height);

    let mut ctl: TuiController =
        DrawerController::new(config, content::registry(), cols_to_px(size.width));
    app.attach(&mut ctl);
    session::install(ctl);

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    if let Some(ctl) = session::uninstall::<dyn content::TuiContent>() {
        tracing::info!(
            transitions = ctl.store().transitions_recorded(),
            "session ended"
        );
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        // 1. Advance drawer transitions by real elapsed time
        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;
        session::with(|ctl: &mut TuiController| ctl.tick(dt))?;

        // 2. Render
        session::with(|ctl: &mut TuiController| {
            terminal.draw(|f| ui::draw(f, app, ctl)).map(|_| ())
        })??;

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    session::with(|ctl: &mut TuiController| input::handle_key(app, ctl, key))?;
                }
                Event::Mouse(mouse) => {
                    let now_ms = app.now_ms();
                    session::with(|ctl: &mut TuiController| {
                        input::handle_mouse(app, ctl, mouse, now_ms)
                    })?;
                }
                Event::Resize(width, height) => {
                    app.screen = Rect::new(0, 0, width, height);
                    let px = cols_to_px(width);
                    session::with(|ctl: &mut TuiController| ctl.set_viewport(px))?;
                    tracing::debug!(width, height, px, "terminal resized");
                }
                _ => {}
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
