//! questlog
//!
//! A terminal front-end for tracking a personal game library. Browse
//! featured games, search the catalog, and file games under a status.

mod app;
mod requests;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use questlog_catalog::CatalogClient;
use questlog_config::{AppConfig, LoggingConfig};
use questlog_library::{FileSlot, LibraryStore, MemorySlot, Slot};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "questlog", version, about = "Track your personal game library")]
struct Args {
    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the library in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,
}

/// Initialize logging into the log file
///
/// The terminal belongs to the UI, so nothing is logged to stdout.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let path = config.resolved_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    match &args.config {
        Some(path) => {
            let mut config = AppConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            config.apply_overrides(|name| std::env::var(name).ok());
            Ok(config)
        }
        None => Ok(AppConfig::load_default()?),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.logging)?;

    info!("questlog starting...");

    let runtime = Runtime::new()?;
    let client = CatalogClient::new(config.catalog.clone())?;
    info!("Using catalog at {}", client.config().base_url);
    if client.config().api_key.trim().is_empty() {
        warn!("No catalog API key configured; catalog lookups will fail");
    }

    let result = if args.ephemeral {
        info!("Using in-memory library");
        run(LibraryStore::open(MemorySlot::new()), client, &runtime)
    } else {
        let path = config.library.resolved_path();
        info!("Using library at {}", path.display());
        run(LibraryStore::open(FileSlot::new(path)), client, &runtime)
    };

    if let Err(e) = &result {
        error!("questlog failed: {:#}", e);
    }
    info!("questlog exiting");
    result
}

/// Run the UI until the user quits, restoring the terminal either way
fn run<S: Slot>(store: LibraryStore<S>, client: CatalogClient, runtime: &Runtime) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, client, runtime.handle().clone());
    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<S: Slot>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw_ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.poll();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
