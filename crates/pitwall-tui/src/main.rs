//! pitwall-tui - terminal dashboard for F1 results data
//!
//! Tabs for browsing backend tables and for the leaderboard, constructor
//! points and driver stats views. The backend URL comes from
//! `PITWALL_URL` or the shared config file.

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::CrosstermBackend;
use std::io::{self, stdout};

use pitwall_core::storage::config::Config;
use pitwall_core::utils::logging::{default_log_path, init_file_logging};

mod app;
mod components;
mod error;
mod event;
mod layout;

use app::App;
use error::TuiResult;

const LOG_FILE: &str = "pitwall-tui.log";

/// Logs go to a file so they never draw over the UI. Off unless `RUST_LOG`
/// is set.
fn setup_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    match default_log_path(LOG_FILE) {
        Ok(path) => {
            if let Err(e) = init_file_logging(&path) {
                eprintln!("Warning: file logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("Warning: file logging disabled: {}", e),
    }
}

#[tokio::main]
async fn main() -> TuiResult<()> {
    setup_logging();

    let config = Config::load(None).map_err(pitwall_core::AppError::from)?;
    let mut app = App::new(&config, None)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = app.run_async(&mut terminal).await;

    restore_terminal()?;

    if let Err(ref err) = result {
        eprintln!("Application error: {:?}", err);
    }

    Ok(result?)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
