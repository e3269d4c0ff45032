use std::sync::Arc;

use axum::{extract::State, Extension};
use axum_derive_error::ErrorResponse;
use db::{token, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use derive_more::{Display, Error, From};

use crate::auth::AuthenticatedUserId;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum LogoutError {
    DatabaseError(DbErr),
}

/// User logout handler.
///
/// Deletes the caller's authentication token; any subsequent request
/// with the same key is rejected by the authentication middleware.
pub(super) async fn logout(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<(), LogoutError> {
    token::Entity::delete_many()
        .filter(token::Column::UserId.eq(current_user.id()))
        .exec(&*db)
        .await?;

    Ok(())
}
