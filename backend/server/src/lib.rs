//! Documentation of a personal habit tracking backend.
//!
//! Trackables are habits we want to do (`good`) or behaviors we want to avoid (`bad`). Pages are
//! rendered by the frontend, the backend answers the few questions that need a single source of
//! truth.
//!
//!
//!
//! # General Infrastructure
//! - Frontend and backend sit behind the same reverse proxy, so cookies are shared
//! - Reverse proxy sets `X-Forwarded-Host` and `X-Forwarded-Proto`, redirects are built from them
//! - Sessions belong to Supabase Auth, the backend never stores one
//! - Push delivery and the database live with their hosted providers
//!
//!
//!
//! # Routes
//!
//! | Method     | Path                          | Purpose                                   |
//! |------------|-------------------------------|-------------------------------------------|
//! | GET, POST  | `/auth/signout`               | End the session, 302 to `/login`          |
//! | GET        | `/api/trackables/status`      | Verdict and label for `type` and `count`  |
//! | GET        | `/api/preferences/dashboard`  | Dashboard version from cookies            |
//! | GET        | `/api/debug/env`              | Which secrets are configured              |
//!
//!
//!
//! # Configuration
//!
//! | Variable            | Default            | Notes                                  |
//! |---------------------|--------------------|----------------------------------------|
//! | `RUST_PORT`         | `1111`             |                                        |
//! | `SUPABASE_URL`      |                    | env or `/run/secrets/SUPABASE_URL`     |
//! | `SUPABASE_ANON_KEY` |                    | env or `/run/secrets/SUPABASE_ANON_KEY`|
//! | `SESSION_COOKIE`    | `sb-access-token`  | cookie carrying the access token       |
//! | `PUBLIC_URL`        |                    | origin used when no host header exists |
//! | `AUTH_TIMEOUT_MS`   | `5000`             | per call to the auth provider          |
//! | `RUST_LOG`          |                    | tracing filter                         |
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run locally.
//! ```sh
//! RUST_LOG=info cargo run -p trackables
//! ```
//!
//! Smoke test a running server.
//! ```sh
//! cargo run -p tester -- --base-url http://localhost:1111
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod preferences;
pub mod routes;
pub mod state;

use routes::{dashboard_handler, debug_env_handler, signout_handler, status_handler};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/auth/signout", get(signout_handler).post(signout_handler))
        .route("/api/trackables/status", get(status_handler))
        .route("/api/preferences/dashboard", get(dashboard_handler))
        .route("/api/debug/env", get(debug_env_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
