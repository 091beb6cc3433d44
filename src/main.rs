//! Skycast - terminal weather client
//!
//! A terminal UI application showing current conditions and forecasts
//! from OpenWeatherMap, with an offline cache that serves the last-seen
//! data when the network is gone.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use skycast::app::App;
use skycast::cli::{Cli, StartupConfig};
use skycast::config::{self, Config};
use skycast::stores::KvStore;
use skycast::ui::render_app;
use skycast::worker::{CacheStorage, FetchGateway, GatewayConfig, HttpFetcher};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Initializes file-based logging. Stdout belongs to the TUI, so log
/// output goes to a rolling file under the platform state directory.
/// The returned guard must stay alive for the writer to flush.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config::log_dir()?;
    let appender = tracing_appender::rolling::daily(log_dir, "skycast.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skycast=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> ExitCode {
    // A .env file may carry the API key
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging();

    match run(config, startup).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("skycast: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, startup: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Cache and KV storage land in the platform cache/config dirs,
    // falling back to a temp dir when no home can be determined
    let storage = CacheStorage::new()
        .unwrap_or_else(|| CacheStorage::with_dir(std::env::temp_dir().join("skycast-cache")));
    let kv = KvStore::new()
        .unwrap_or_else(|| KvStore::with_path(std::env::temp_dir().join("skycast-store.json")));

    let gateway_config = match &config.shell_origin {
        Some(origin) => GatewayConfig::with_shell_origin(origin),
        None => GatewayConfig::default(),
    };
    let gateway = Arc::new(FetchGateway::new(
        HttpFetcher::new(),
        storage,
        gateway_config,
    ));

    // Install pre-caches the shell manifest; only a successful install
    // lets the new bucket generation take over and old ones be dropped
    match gateway.install().await {
        Ok(()) => match gateway.activate() {
            Ok(removed) if removed > 0 => {
                tracing::info!(removed, "removed superseded cache buckets")
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "cache activation failed"),
        },
        Err(err) => tracing::warn!(error = %err, "cache install failed, keeping old buckets"),
    }

    let mut app = App::new(gateway, &config.api_key, kv, startup);

    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial render shows the loading state before the first fetch
    terminal.draw(|f| render_app(f, &app))?;
    app.process_pending().await;

    // Main event loop
    loop {
        terminal.draw(|f| render_app(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        app.drain_store_events();
        if app.has_pending() {
            app.process_pending().await;
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
