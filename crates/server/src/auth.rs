use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts, State},
    headers::{authorization::Bearer, Authorization},
    http::{
        header::USER_AGENT, request::Parts, Extensions, HeaderMap, Request, StatusCode,
    },
    middleware::Next,
    response::Response,
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use common::hash;
use db::{token, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use derive_more::{Display, Error, From};
use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuthenticatedUserId(i64);

impl AuthenticatedUserId {
    /// Get raw user identifier value.
    pub fn id(&self) -> i64 {
        self.0
    }
}

/// Client identity fingerprint that authentication tokens are bound to.
///
/// The IP address is taken from the first `x-forwarded-for` entry,
/// falling back to the socket peer address. Only a hash of it is ever
/// compared against or persisted.
pub(crate) struct ClientFingerprint {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    fn from_headers(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let ip = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|ip| ip.trim().to_string())
            .or_else(|| {
                extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            });

        ClientFingerprint { ip, user_agent }
    }

    /// Hex-encoded SHA-512 hash of the client IP address, if one is known.
    pub(crate) fn ip_address_hash(&self) -> Option<String> {
        self.ip.as_deref().map(hash::sha512_hex)
    }
}

#[async_trait]
impl<S: Sync> FromRequestParts<S> for ClientFingerprint {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        Ok(ClientFingerprint::from_headers(
            &parts.headers,
            &parts.extensions,
        ))
    }
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid authentication token was provided")]
    InvalidAuthenticationToken,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "user inactive or deleted")]
    InactiveUser,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "token client ip and user-agent mismatch")]
    ClientMismatch,
}

/// Bearer token authentication middleware.
///
/// Tokens are soft-bound to the client fingerprint captured on login:
/// a single mismatched factor (IP address or user agent) is tolerated
/// as legitimate drift and only logged, while both factors changing at
/// once rejects the request as likely token theft.
pub(super) async fn require_authentication<B>(
    State(db): State<Arc<DatabaseConnection>>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let fingerprint = ClientFingerprint::from_headers(req.headers(), req.extensions());

    let (token, user) = token::Entity::find()
        .filter(token::Column::Key.eq(authorization.token()))
        .find_also_related(user::Entity)
        .one(&*db)
        .await?
        .ok_or(AuthenticationError::InvalidAuthenticationToken)?;

    let user = user.ok_or(AuthenticationError::InvalidAuthenticationToken)?;

    if !user.is_active {
        return Err(AuthenticationError::InactiveUser);
    }

    let user_agent_matches = token.user_agent == fingerprint.user_agent;
    if !user_agent_matches {
        warn!(user = user.id, "token user-agent mismatch");
    }

    let client_ip_matches = token.ip_address_hash == fingerprint.ip_address_hash();
    if !client_ip_matches {
        warn!(user = user.id, "token client ip mismatch");
    }

    if !user_agent_matches && !client_ip_matches {
        return Err(AuthenticationError::ClientMismatch);
    }

    req.extensions_mut().insert(AuthenticatedUserId(user.id));

    Ok(next.run(req).await)
}
