use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use querydesk_application::{ChatUseCase, LoginGate};
use querydesk_core::backend::QueryBackend;
use querydesk_core::config::ClientConfig;
use querydesk_core::session::{SessionRepository, SessionStore};
use querydesk_infrastructure::{
    ConfigService, JsonSessionRepository, QueryDeskPaths, XlsxSpreadsheetWriter,
};
use querydesk_interaction::HttpQueryBackend;

mod commands;
mod logging;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "querydesk", version)]
#[command(about = "QueryDesk - ask an analytics backend questions in plain language", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.toml)
    #[arg(long, env = "QUERYDESK_BACKEND_URL")]
    backend_url: Option<String>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding chats.json and titles.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory spreadsheet exports are written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    /// Flags and env take precedence over the config file.
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = Some(dir.clone());
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logs_dir = QueryDeskPaths::logs_dir()?;
    let _log_guard = logging::init(&logs_dir)?;
    tracing::info!("Starting querydesk v{}", env!("CARGO_PKG_VERSION"));

    // ===== Configuration =====
    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::default_location()?,
    };
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    cli.apply(&mut config);
    tracing::info!(backend = %config.backend_url, "Configuration loaded");

    // ===== Components =====
    let repository: Arc<dyn SessionRepository> = Arc::new(match &config.data_dir {
        Some(dir) => JsonSessionRepository::new(dir),
        None => JsonSessionRepository::default_location()?,
    });
    let session = SessionStore::load(repository).into_handle();

    let backend: Arc<dyn QueryBackend> = Arc::new(HttpQueryBackend::from_config(&config)?);
    let export_dir = config
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let usecase = ChatUseCase::new(
        session,
        backend.clone(),
        Arc::new(XlsxSpreadsheetWriter::new()),
        export_dir,
    );
    let gate = LoginGate::new(backend);

    repl::Repl::new(usecase, gate)?.run().await?;

    tracing::info!("Exiting");
    Ok(())
}
