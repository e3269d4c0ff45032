/// Fax record details route.
mod details;

/// Dashboard fax listing route.
mod list;

/// Inbound fax creation webhook.
mod received;

/// Outbound fax submission route.
mod send;

/// Inbound delivery instruction webhook.
mod sent;

/// Provider status callback webhook.
mod status_callback;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use db::DatabaseConnection;

/// Create a router that provides an API server with authenticated
/// fax submission and dashboard routes.
pub(crate) fn routes() -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/", post(send::send).get(list::list))
        .route("/:uuid", get(details::details))
}

/// Create a router with the provider-facing webhook routes.
///
/// These are called by the telephony provider, not by users, and carry
/// no authentication: the callback URL itself is the shared secret.
pub(crate) fn callback_routes() -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/status/:uuid", post(status_callback::status_callback))
        .route("/sent", post(sent::sent))
        .route("/received", post(received::received))
}
