//! Invoice HTTP service.
//!
//! A small JSON API over a single SQLite table of invoice rows, guarded by a
//! shared API key. The `seed` binary fills the table with fixture rows.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod server;

pub use server::{AppState, create_router, start_server};

/// Install the `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
