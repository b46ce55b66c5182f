//! Innomart Catalog - local product catalog service.
//!
//! Serves `GET /api/products?page&limit` on port 3000 from a static JSON
//! document, for the storefront client's product feed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use innomart_catalog::config::CatalogConfig;
use innomart_catalog::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "innomart_catalog=info,tower_http=debug";

/// Set up Sentry (when a DSN is configured) and the tracing subscriber.
///
/// The returned guard flushes pending Sentry events when dropped.
fn init_telemetry(config: &CatalogConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config.sentry_environment.clone().map(Cow::Owned),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(|metadata| sentry_level(*metadata.level())))
        .init();

    if guard.is_some() {
        tracing::info!("Sentry enabled");
    }
    guard
}

/// Warnings and errors become Sentry events; info and debug become
/// breadcrumbs on the next event.
const fn sentry_level(level: Level) -> EventFilter {
    match level {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = CatalogConfig::from_env().expect("invalid catalog configuration");
    let _telemetry = init_telemetry(&config);

    let addr = config.socket_addr();
    tracing::info!(
        %addr,
        products_file = %config.products_file.display(),
        cache_ttl_secs = config.cache_ttl.map(|ttl| ttl.as_secs()),
        "Starting catalog service"
    );

    let app = innomart_catalog::app(AppState::new(config))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind catalog address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("catalog server failed");

    tracing::info!("Catalog service stopped");
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect("cannot listen for SIGTERM");
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Ctrl+C listener failed");
                }
            }
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl+C listener failed");
    }

    tracing::info!("Shutting down");
}
