/// User login route.
mod login;

/// User logout route.
mod logout;

use std::sync::Arc;

use axum::{routing::post, Router};
use db::DatabaseConnection;

/// Create a router that provides an API server with public authentication routes.
pub(crate) fn routes() -> Router<Arc<DatabaseConnection>> {
    Router::new().route("/login", post(login::login))
}

/// Create a router with authentication routes that themselves require
/// an authenticated caller.
pub(crate) fn protected_routes() -> Router<Arc<DatabaseConnection>> {
    Router::new().route("/logout", post(logout::logout))
}
