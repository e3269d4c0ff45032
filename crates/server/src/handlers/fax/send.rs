use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use common::{config::Config, phone, s3};
use db::{
    fax, job, user, DatabaseConnection, DbErr, EntityTrait, QuerySelect, SelectExt,
    TransactionErrorExt, TransactionTrait, Uuid,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{auth::AuthenticatedUserId, storage::MediaStore};

/// Errors that may occur during an outbound fax submission.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum SendFaxError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// AWS S3-related error.
    S3Error(s3::Error),

    /// `multipart/form-data` request handling error.
    MultipartError(MultipartError),

    /// Request didn't have a destination number field in it.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "no destination number was provided")]
    MissingToNumber,

    /// Destination number cannot be normalized as a US number.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    InvalidPhoneNumber(phone::InvalidPhoneNumber),

    /// Request didn't have any file uploads in it.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "no file upload was found")]
    NoFileUpload,

    /// Destination number is the number faxes are sent from.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "sending fax to self is disallowed")]
    SelfFax,

    /// Deleted user attempted to submit a fax.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "non-existent user")]
    NonExistentUser,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct SendFaxResponse {
    /// Created fax record identifier.
    uuid: Uuid,
}

/// Outbound fax submission handler.
///
/// Accepts a `multipart/form-data` form with a `to` text field and a
/// `content` file field. The media is stored first, then the record and
/// its send job are committed together, so the background worker never
/// sees a record whose media is missing. The actual provider request
/// happens asynchronously in the worker.
pub(super) async fn send(
    Extension(current_user): Extension<AuthenticatedUserId>,
    Extension(config): Extension<Arc<Config>>,
    Extension(store): Extension<Arc<dyn MediaStore>>,
    State(db): State<Arc<DatabaseConnection>>,
    mut data: Multipart,
) -> Result<Json<SendFaxResponse>, SendFaxError> {
    let mut to = None;
    let mut content = None;

    while let Some(field) = data.next_field().await? {
        match field.name() {
            Some("to") => to = Some(field.text().await?),
            Some("content") => content = Some(field.bytes().await?),
            _ => {}
        }
    }

    let to = to.ok_or(SendFaxError::MissingToNumber)?;
    let to = phone::e164(&to)?;

    if to == config.twilio.from_number {
        return Err(SendFaxError::SelfFax);
    }

    let content = content
        .filter(|bytes| !bytes.is_empty())
        .ok_or(SendFaxError::NoFileUpload)?;

    db.transaction(|txn| {
        Box::pin(async move {
            let user_exists = user::Entity::find_by_id(current_user.id())
                .select_only()
                .exists(txn)
                .await?;

            if !user_exists {
                return Err(SendFaxError::NonExistentUser);
            }

            let (model, uuid) =
                fax::new_outbound(current_user.id(), config.twilio.from_number.clone(), to);

            store
                .upload_media(&fax::content_key(uuid), content.to_vec())
                .await?;

            fax::Entity::insert(model).exec_without_returning(txn).await?;

            job::Entity::insert(job::enqueue(uuid, job::Kind::SendFax))
                .exec_without_returning(txn)
                .await?;

            Ok(Json(SendFaxResponse { uuid }))
        })
    })
    .await
    .into_raw_result()
}
