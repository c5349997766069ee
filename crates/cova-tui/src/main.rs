//! COVA - a terminal front end for the COVA restaurant.
//!
//! Browse the menu and bestsellers, book a table, place an order and manage
//! the signed-in session from the keyboard.

mod app;
mod form;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cova_core::auth::open_store;
use cova_core::{ApiClient, Config, MemoryTokenStore, TokenStore};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Prefix of the daily log files in the cache directory
const LOG_FILE_PREFIX: &str = "cova.log";

fn env_filter() -> EnvFilter {
    // RUST_LOG controls the level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to a daily file while the terminal belongs to the UI.
/// The returned guard flushes the writer when dropped.
fn init_file_tracing(config: &Config) -> Option<WorkerGuard> {
    let log_dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Some(guard)
}

/// CLI commands log to stderr
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Command line switches
#[derive(Debug, Default)]
struct Args {
    dump_menu: bool,
    login: bool,
    logout: bool,
    ephemeral: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args::default();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--dump-menu" => args.dump_menu = true,
                "--login" => args.login = true,
                "--logout" => args.logout = true,
                "--ephemeral" => args.ephemeral = true,
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => anyhow::bail!("Unknown argument: {} (try --help)", other),
            }
        }
        Ok(args)
    }

    fn is_command(&self) -> bool {
        self.dump_menu || self.login || self.logout
    }
}

fn print_usage() {
    println!("Usage: cova [--ephemeral] [--dump-menu | --login | --logout]");
    println!();
    println!("  --dump-menu   Print the menu as JSON");
    println!("  --login       Sign in from the terminal and store the session");
    println!("  --logout      Forget the stored session");
    println!("  --ephemeral   Keep the session in memory for this run only");
    println!();
    println!("The backend address comes from COVA_BACKEND_URL, then the config file.");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse()?;
    let config_path = Config::config_path().ok();
    let config = match config_path {
        Some(ref path) => Config::load_from(path)?,
        None => Config::default(),
    };

    let store: Arc<dyn TokenStore> = if args.ephemeral {
        Arc::new(MemoryTokenStore::new())
    } else {
        let data_dir = config.data_dir()?;
        open_store(config.token_storage, &data_dir)
    };
    let api = ApiClient::from_config(&config, store)?;

    if args.is_command() {
        init_stderr_tracing();
        if args.dump_menu {
            return dump_menu(&api).await;
        }
        if args.login {
            return login(&api, config, config_path).await;
        }
        return logout(&api);
    }

    // Initialize logging
    let _log_guard = init_file_tracing(&config);
    info!(backend = api.base_url(), "COVA starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, config_path, api);
    app.load_initial_data();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("COVA shutting down");
    Ok(())
}

/// Print the menu to stdout as JSON
async fn dump_menu(api: &ApiClient) -> Result<()> {
    eprintln!("Fetching menu from {}...", api.base_url());
    let menu = api.fetch_menu().await?;
    println!("{}", serde_json::to_string_pretty(&menu)?);
    eprintln!("{} items, {} bestsellers", menu.len(), cova_core::models::bestsellers(&menu).len());
    Ok(())
}

fn prompt_email(default: Option<&str>) -> Result<String> {
    match default {
        Some(email) => print!("Email [{}]: ", email),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = email.trim();
    Ok(match (email.is_empty(), default) {
        (true, Some(default)) => default.to_string(),
        _ => email.to_string(),
    })
}

/// Sign in from the terminal and store the session
async fn login(api: &ApiClient, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let form = cova_core::forms::SignInForm {
        email: prompt_email(config.last_email.as_deref())?,
        password: rpassword::prompt_password("Password: ")?,
    };
    let (email, password) = form.validate()?;

    let session = api
        .authenticate(&email, &password)
        .await
        .context("Sign in failed")?;
    if session.token().is_none() {
        anyhow::bail!("Sign in failed: the server returned no access token");
    }

    config.last_email = Some(email);
    if let Some(path) = config_path {
        config.save_to(&path)?;
    }
    eprintln!("Signed in successfully");
    Ok(())
}

fn logout(api: &ApiClient) -> Result<()> {
    api.logout()?;
    eprintln!("Signed out");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
