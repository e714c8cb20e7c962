//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::clock::{Clock, SystemClock};
use platform::rate_limit::RateLimitConfig;
use referral::application::config::ResolutionPolicy;
use referral::{InMemoryReferralRepository, MockDeferredLinkVendor, ReferralConfig};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}

fn referral_config() -> anyhow::Result<ReferralConfig> {
    let mut config = if cfg!(debug_assertions) {
        ReferralConfig::development()
    } else {
        ReferralConfig::default()
    };

    if let Some(secs) = env_parse::<u64>("REFERRAL_LINK_TTL_SECS")? {
        config.link_ttl = Duration::from_secs(secs);
    }
    if let Some(ms) = env_parse::<u64>("VENDOR_TIMEOUT_MS")? {
        config.vendor_timeout = Duration::from_millis(ms);
    }
    if env_parse::<bool>("REFRESH_EXISTING_SUMMARY")?.unwrap_or(false) {
        config.resolution_policy = ResolutionPolicy::RefreshExisting;
    }

    let max_requests =
        env_parse::<u32>("RATE_LIMIT_MAX_REQUESTS")?.unwrap_or(config.rate_limit.max_requests);
    let window_secs = env_parse::<u64>("RATE_LIMIT_WINDOW_SECS")?
        .unwrap_or(config.rate_limit.window.as_secs());
    config.rate_limit = RateLimitConfig::new(max_requests, window_secs);

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,referral=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = referral_config()?;
    tracing::info!(
        link_ttl_secs = config.link_ttl.as_secs(),
        vendor_timeout_ms = config.vendor_timeout.as_millis() as u64,
        rate_limit_max_requests = config.rate_limit.max_requests,
        rate_limit_window_secs = config.rate_limit.window.as_secs(),
        resolution_policy = ?config.resolution_policy,
        "Referral configuration loaded"
    );

    // Storage lives for the lifetime of the process
    let repo = InMemoryReferralRepository::new();

    let seed = env_parse::<bool>("SEED_DEMO_DATA")?.unwrap_or(cfg!(debug_assertions));
    if seed {
        referral::seed_demo_data(&repo, SystemClock.now()).await?;
    }

    let vendor = match env::var("VENDOR_BASE_URL") {
        Ok(base_url) => MockDeferredLinkVendor::new(base_url),
        Err(_) => MockDeferredLinkVendor::default(),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    // Build router
    let app = Router::new()
        .merge(referral::referral_router(repo, vendor, config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr =
        env_parse("BIND_ADDR")?.unwrap_or(SocketAddr::from(([0, 0, 0, 0], 31113)));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
