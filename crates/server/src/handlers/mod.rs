/// Authentication-related routes.
pub(crate) mod auth;

/// Fax submission, dashboard and provider webhook routes.
pub(crate) mod fax;
