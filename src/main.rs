//! MicroZaim - terminal microloan demo
//!
//! Loan calculator, mock sign-in, loan applications and a personal
//! dashboard, all held in memory for the lifetime of the process.

use std::io;
use std::process;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use microloan::application::App;
use microloan::config::Config;
use microloan::infrastructure::init_tracing;
use microloan::presentation::{render_ui, InputHandler};

/// Entry point for the MicroZaim terminal application.
///
/// Loads configuration, starts file logging, sets up the terminal and runs
/// the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("microloan: {err}");
            process::exit(2);
        }
    };

    if let Err(err) = init_tracing(&config) {
        eprintln!("microloan: logging disabled: {err}");
    }
    info!(
        annual_rate = config.annual_rate,
        premium_fee = config.premium_fee,
        "starting"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.policy(), config.export_dir.clone());
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

    info!("stopped");
    Ok(())
}

/// Main application event loop. Runs until Ctrl+C, or `q` on the
/// calculator or dashboard.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if InputHandler::is_quit(app, key.code, key.modifiers) {
                    return Ok(());
                }
                InputHandler::handle_key_event(app, key.code, key.modifiers);
            }
        }
    }
}
