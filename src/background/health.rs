//! Liveness endpoint.
//!
//! Answers every request, whatever the method or path, with `200 OK`.

use axum::Router;

use crate::utils::log::Logger;

async fn health_check() -> &'static str {
    "OK"
}

/// Router that answers any request with the liveness body.
pub fn router() -> Router {
    Router::new().fallback(health_check)
}

/// Serve the liveness endpoint on all interfaces until the process exits.
pub async fn serve(port: u16, logger: Logger) {
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            logger.debug(&format!("Health server could not bind port {port}: {e}"));
            return;
        }
    };

    if let Err(e) = axum::serve(listener, router()).await {
        logger.debug(&format!("Health server stopped: {e}"));
    }
}
