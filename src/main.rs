use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use lifeos::cli::{self, Cli, Commands};
use lifeos::client::{LocalBackend, RemoteBackend, Store};
use lifeos::server::{self, AppState};
use lifeos::{Config, Database, Profile, utils};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr
fn init_stderr_tracing(default: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre!("failed to initialize tracing: {e}"))
}

/// Log to a daily file so the dashboard's terminal stays clean
fn init_file_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir).wrap_err("failed to create log directory")?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "lifeos.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| eyre!("failed to initialize tracing: {e}"))?;
    Ok(guard)
}

fn open_store(config: &Config) -> Result<Store<RemoteBackend>> {
    let remote = RemoteBackend::new(&config.api_base_url, config.request_timeout())?;
    let local = LocalBackend::open(config.get_local_store_dir())?;
    let mut store = Store::new(remote, local).with_refresh_interval(config.refresh_interval());
    store.load();
    Ok(store)
}

fn serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let ip: IpAddr = host.parse().wrap_err_with(|| format!("invalid host '{}'", host))?;
    let addr = SocketAddr::new(ip, port.unwrap_or(config.server.port));

    let db = Database::new(&config.get_database_path())?;
    if config.seed_sample_data {
        let seeded = db.seed_sample_data(chrono::Utc::now())?;
        if seeded > 0 {
            tracing::info!(records = seeded, "seeded sample data");
        }
    }
    let state = Arc::new(AppState::new(db));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(state, addr))?;
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev switches to the separate lifeos-dev config and data directories
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };
    let config_path = cli.config.as_deref().map(utils::expand_path);
    let config = Config::load_with_profile(profile, config_path.as_deref())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Serve { host, port } => {
            init_stderr_tracing("info")?;
            serve(&config, host, port)?;
        }
        Commands::Tui => {
            let log_dir = utils::get_data_dir(profile)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("logs");
            let _guard = init_file_tracing(&log_dir)?;
            let app = lifeos::tui::App::new(config.clone(), open_store(&config)?);
            lifeos::tui::run_event_loop(app)?;
        }
        command => {
            init_stderr_tracing("error")?;
            let mut store = open_store(&config)?;
            match command {
                Commands::AddTask { title, priority, due, description } => {
                    cli::handle_add_task(title, priority, due, description, &mut store)?;
                }
                Commands::AddNote { title, content, tags } => {
                    cli::handle_add_note(title, content, tags, &mut store)?;
                }
                Commands::LogMood { mood, focus, notes } => {
                    cli::handle_log_mood(mood, focus, notes, &mut store)?;
                }
                Commands::Chat { message } => cli::handle_chat(message, &mut store)?,
                Commands::Prioritize => cli::handle_prioritize(&mut store)?,
                Commands::Stats => cli::handle_stats(&mut store)?,
                Commands::Serve { .. } | Commands::Tui => {}
            }
        }
    }

    Ok(())
}
