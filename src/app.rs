/*
 * Responsibility
 * - load Config → build dependencies → assemble the Router
 * - apply middleware (request id / tracing / response headers)
 * - start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::repos::{InMemoryUserStore, PgUserStore, UserStore};
use crate::services::auth::{
    CredentialValidator, EnvSecret, Hs256Signer, IssuanceLogPolicy, SigninService, TokenIssuer,
};
use crate::services::metrics::{SigninCounters, install_prometheus_recorder};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,signin_service=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they don't get lost.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        // Production: default behavior, the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting signin service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Process-level services are built once here and injected into the state.
    let store = build_user_store(config).await?;

    let issuer = TokenIssuer::new(
        config.issuer.clone(),
        config.audience.clone(),
        config.access_token_ttl_seconds.into(),
        Arc::new(Hs256Signer),
        Arc::new(EnvSecret::new(config.secret_env_var.clone())),
    );
    tracing::info!(
        issuer = issuer.issuer(),
        audience = issuer.audience(),
        ttl_seconds = issuer.ttl_seconds(),
        "token issuer ready"
    );

    let signin = SigninService::new(
        CredentialValidator::new(store),
        issuer,
        IssuanceLogPolicy {
            raw_token: config.log_raw_token,
            identifier: config.log_identifier,
        },
    );

    if config.metrics_enabled {
        let handle = install_prometheus_recorder().context("failed to install metrics recorder")?;
        let state = AppState::new(Arc::new(signin), SigninCounters::registered());
        Ok(state.with_prometheus(handle))
    } else {
        let (counters, _probe) = SigninCounters::detached();
        Ok(AppState::new(Arc::new(signin), counters))
    }
}

async fn build_user_store(config: &Config) -> Result<Arc<dyn UserStore>> {
    if let Some(url) = config.database_url.as_deref() {
        let store = PgUserStore::connect(url)
            .await
            .context("failed to connect to the users database")?;
        tracing::info!(backend = store.backend_name(), "user store ready");
        return Ok(Arc::new(store));
    }

    let store = match config.users_file.as_deref() {
        Some(path) => InMemoryUserStore::from_json_file(path)
            .await
            .with_context(|| format!("failed to load users from {}", path.display()))?,
        None => {
            tracing::warn!(
                "neither DATABASE_URL nor USERS_FILE is set; every sign-in will be rejected"
            );
            InMemoryUserStore::default()
        }
    };
    tracing::info!(
        backend = store.backend_name(),
        users = store.len(),
        "user store ready"
    );
    Ok(Arc::new(store))
}

/// Full router with middleware. Also used by the HTTP tests.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/metrics", get(api::v1::handlers::metrics::metrics))
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router)
}
