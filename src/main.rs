//! Bid Analyzer API server.
//!
//! Reads configuration from the environment (see `config`), wires adapters
//! into the application state and serves the axum router until SIGINT or
//! SIGTERM.

use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bid_analyzer::adapters::ai::{AnthropicConfig, AnthropicProvider};
use bid_analyzer::adapters::auth::{JwksConfig, JwksSessionValidator};
use bid_analyzer::adapters::http::middleware::AuthState;
use bid_analyzer::adapters::http::{app_router, AppState};
use bid_analyzer::adapters::tiers::{InMemoryTierDirectory, RedisTierDirectory};
use bid_analyzer::adapters::usage::{InMemoryUsageStore, RedisUsageStore};
use bid_analyzer::config::{AppConfig, ConfigError, ValidationError};
use bid_analyzer::domain::flags::FlagResolver;
use bid_analyzer::domain::foundation::AuthError;
use bid_analyzer::domain::gate::ApiGate;
use bid_analyzer::domain::usage::UsageLedger;
use bid_analyzer::ports::{AIError, AIProvider, TierDirectory, UsageCounterStore};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis connection timed out after {0}s")]
    RedisTimeout(u64),

    #[error("session validator: {0}")]
    Auth(#[from] AuthError),

    #[error("AI provider: {0}")]
    Ai(#[from] AIError),

    #[error("server address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration rejected");
        return Err(e.into());
    }

    let environment = config.server.environment;
    tracing::info!(?environment, "Starting bid analyzer");

    let (usage_store, tiers) = stores(&config).await?;

    let mut resolver = FlagResolver::new(config.features.flag_defaults()?);
    if let Some(codec) = config.features.override_codec(environment) {
        tracing::warn!(
            signed = codec.requires_signature(),
            "Debug flag overrides are enabled"
        );
        resolver = resolver.with_overrides(codec);
    }

    let gate = ApiGate::new(Arc::new(resolver), tiers.clone(), UsageLedger::new(usage_store));

    let validator: Option<AuthState> = if config.auth.is_configured() {
        let jwks = JwksConfig::new(&config.auth.issuer_url, &config.auth.audience)
            .with_cache_duration(config.auth.jwks_cache_ttl());
        tracing::info!(issuer = %config.auth.issuer_url, "Validating session tokens against issuer JWKS");
        Some(Arc::new(JwksSessionValidator::new(jwks)?))
    } else {
        tracing::warn!("No auth issuer configured, all requests are anonymous");
        None
    };

    let ai_provider: Option<Arc<dyn AIProvider>> = match config.ai.api_key() {
        Some(key) => {
            let anthropic = AnthropicConfig::from_secret(key.clone())
                .with_model(&config.ai.model)
                .with_base_url(&config.ai.base_url)
                .with_timeout(config.ai.timeout())
                .with_max_retries(config.ai.max_retries);
            tracing::info!(model = %config.ai.model, "Anthropic provider configured");
            Some(Arc::new(AnthropicProvider::new(anthropic)?))
        }
        None => {
            tracing::warn!("No Anthropic API key, analysis and summary endpoints will answer 503");
            None
        }
    };

    if config.billing.webhook_secret.is_none() {
        tracing::warn!("No billing webhook secret, webhook endpoint will answer 503");
    }

    let state = AppState {
        gate: Arc::new(gate),
        tiers,
        ai_provider,
        webhook_secret: config.billing.webhook_secret.clone(),
        summary: config.summary.clone(),
        verbose_errors: config.features.verbose_errors(environment),
    };

    let app = app_router(state, validator, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn stores(
    config: &AppConfig,
) -> Result<(Arc<dyn UsageCounterStore>, Arc<dyn TierDirectory>), StartupError> {
    if !config.redis.is_configured() {
        tracing::warn!("No Redis URL, using in-memory usage counters and tiers");
        return Ok((
            Arc::new(InMemoryUsageStore::new()),
            Arc::new(InMemoryTierDirectory::new()),
        ));
    }

    let client = redis::Client::open(config.redis.url.as_str())?;
    let conn = tokio::time::timeout(
        config.redis.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| StartupError::RedisTimeout(config.redis.timeout_secs))??;

    tracing::info!("Connected to Redis");
    Ok((
        Arc::new(RedisUsageStore::new(conn.clone())),
        Arc::new(RedisTierDirectory::new(conn)),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}
