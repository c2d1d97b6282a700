//! influencer-hub binary entry point.
//!
//! Parses options, sets up logging and config, initializes the terminal in
//! raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use influencer_hub::app::{self, AppState};
use influencer_hub::cli::Cli;
use influencer_hub::logging;
use influencer_hub::seed::sample_influencers;
use influencer_hub::store::DirectoryStore;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn build_state(cli: &Cli) -> Result<AppState> {
    let paths = cli.config_paths()?;
    logging::init(&cli.log_path(&paths), &cli.log_level)?;

    let store = if cli.empty {
        DirectoryStore::new()
    } else {
        DirectoryStore::from_records(sample_influencers()).context("Invalid sample data")?
    };
    info!(records = store.len(), "starting influencer-hub");
    Ok(AppState::with_config(store, &paths, cli.theme))
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut state = build_state(&cli)?;

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        error!(error = %format!("{err:#}"), "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
