use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompting_api::config::Config;
use prompting_api::context::roles::load_roles;
use prompting_api::context::SqlContextStore;
use prompting_api::db::create_lazy_pool;
use prompting_api::llm_client::OllamaClient;
use prompting_api::report::PdfRenderer;
use prompting_api::routes::build_router;
use prompting_api::state::AppState;

const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Art Of Prompting API v{}", env!("CARGO_PKG_VERSION"));

    // Role catalog: a missing file degrades to no roles, a missing column is fatal
    let roles = load_roles(&config.roles_path, &config.roles_column).with_context(|| {
        format!(
            "Failed to load roles from {} (column '{}')",
            config.roles_path.display(),
            config.roles_column
        )
    })?;

    // MySQL pool, connected lazily; context lookups degrade to empty when unreachable
    let pool = match create_lazy_pool(&config.database_url, DB_ACQUIRE_TIMEOUT) {
        Ok(pool) => {
            check_database(&pool).await;
            Some(pool)
        }
        Err(e) => {
            warn!("Could not create database pool: {e}. Context lookups will return empty text.");
            None
        }
    };
    let contexts = Arc::new(SqlContextStore::new(pool, &config.context_table));

    let llm = OllamaClient::new(
        &config.ollama_host,
        config.max_tokens,
        config.generation_timeout,
    )?;
    info!(
        "Inference host {} (models: {}, {})",
        config.ollama_host, config.mistral_model, config.qwen_model
    );

    let pdf = PdfRenderer::detect(&config.pdf_renderer);
    match pdf.program() {
        Some(program) => info!("PDF renderer: {}", program.display()),
        None => warn!(
            "PDF renderer '{}' not found; PDF reports are unavailable",
            config.pdf_renderer
        ),
    }

    let state = AppState {
        roles: Arc::new(roles),
        contexts,
        llm,
        pdf,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Probes the database once so a misconfiguration shows up in the startup log.
async fn check_database(pool: &MySqlPool) {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => info!("MySQL reachable"),
        Err(e) => warn!("MySQL not reachable yet: {e}. Context lookups will return empty text."),
    }
}
