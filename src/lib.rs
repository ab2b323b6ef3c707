//! Tally is a small REST service for recording financial transactions.
//!
//! Transactions are flat records (amount, description, type, timestamp) held
//! in an in-memory, thread-safe store. The service layers business rules on
//! top of the store: amounts must be positive, and a create request that
//! matches an existing record (same amount, description, and type) within a
//! trailing time window is rejected as a duplicate.
//!
//! This library provides the store, the business rules, and a JSON API served
//! with axum. The `server` binary wires them together.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod endpoints;
mod error;
mod logging;
mod routing;
pub mod transaction;

pub use app_state::{AppState, DEFAULT_DUPLICATE_WINDOW};
pub use error::{Error, ErrorBody};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
