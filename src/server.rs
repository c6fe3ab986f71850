//! HTTP server configuration and request routing.
//!
//! Requests flow through middleware in order:
//! 1. Request/response tracing
//! 2. Panic recovery (converted into a 500 JSON body)
//! 3. API key check (invoice and inquiry routes only)
//! 4. Handler execution

use std::{any::Any, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{auth::require_api_key, config::Config, db::Database, handlers};

/// State shared by every handler: the store and the expected API key.
#[derive(Clone)]
pub struct AppState {
    db: Database,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            api_key: Arc::from(config.api_key.as_str()),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Creates the router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/invoices", post(handlers::create_invoice).delete(handlers::delete_invoices))
        .route("/invoices/top", get(handlers::get_top_invoices))
        .route("/invoices/highest_balance", get(handlers::get_highest_balance_invoice))
        .route("/invoices/search", get(handlers::search_invoices))
        .route("/invoices/update_balance/{id}", put(handlers::update_invoice_balance))
        .route("/invoices/total_amount", get(handlers::get_total_amount))
        .route("/invoices/count", get(handlers::count_invoices))
        .route("/inquiries", get(handlers::handle_inquiry))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    let routes = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api_routes);

    with_middleware(routes, state)
}

/// Wraps `routes` in the JSON 404 fallback, panic recovery and request tracing.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Starts the HTTP server and serves until CTRL+C or SIGTERM.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received CTRL+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
