//! usrdir - Terminal User Directory
//!
//! A terminal user-management table. Users can be added, edited and
//! deleted through a popup form; every change goes through a simulated
//! backend with a fixed delay and is confirmed by a transient notification.

use std::io;
use std::rc::Rc;
use std::time::Duration;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use usrdir::application::{App, AppMode, DirectoryMachine, SystemClock};
use usrdir::infrastructure::{ConfigRepository, MockUserService, DEFAULT_CONFIG_FILE, init_logging};
use usrdir::presentation::{render_ui, InputHandler};

const TICK: Duration = Duration::from_millis(50);

/// Entry point for the usrdir terminal application.
///
/// Loads `usrdir.json` (if present), sets up logging and the terminal,
/// and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, if terminal setup
/// fails, or if the terminal interface fails during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ConfigRepository::load(DEFAULT_CONFIG_FILE)?;
    if let Some(ref path) = settings.log_file {
        init_logging(path)?;
    }
    info!(latency_ms = settings.latency_ms, seed = settings.seed.len(), "starting usrdir");

    let service = MockUserService::new(settings.latency(), settings.seed.clone())
        .with_failures(settings.fail_every);
    let machine = DirectoryMachine::new(Box::new(service));
    let mut app = App::new(
        machine,
        Rc::new(SystemClock),
        settings.toast_duration(),
        settings.max_toasts,
    );
    app.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    info!("usrdir stopped");

    Ok(())
}

/// Main application event loop.
///
/// Redraws, waits briefly for a key, and advances simulated requests and
/// notifications on every pass so they progress without input. Quits on
/// 'q' when neither the form nor the help screen is open.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let can_quit = matches!(app.mode, AppMode::Normal) && !app.is_form_open();
                    match key.code {
                        KeyCode::Char('q') if can_quit => return Ok(()),
                        _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                    }
                }
            }
        }

        app.tick();
    }
}
