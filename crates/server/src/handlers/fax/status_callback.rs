use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form,
};
use axum_derive_error::ErrorResponse;
use db::{
    fax, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    TransactionErrorExt, TransactionTrait, Uuid,
};
use derive_more::{Display, Error, From};
use serde_json::Value;
use tracing::info;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum StatusCallbackError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "fax was not found")]
    FaxNotFound,

    /// Callback payload is missing a required field.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "missing {} field", "_0")]
    MissingField(#[error(not(source))] &'static str),
}

fn require<'p>(
    payload: &'p HashMap<String, String>,
    field: &'static str,
) -> Result<&'p str, StatusCallbackError> {
    payload
        .get(field)
        .map(String::as_str)
        .ok_or(StatusCallbackError::MissingField(field))
}

/// Provider status callback handler.
///
/// The provider posts transmission progress for an outbound fax as an
/// urlencoded form. Statuses are overwritten verbatim with no ordering
/// guard: callbacks may arrive out of order and the last write wins.
/// The raw payload is appended to the record's audit metadata.
pub(super) async fn status_callback(
    Path(uuid): Path<Uuid>,
    State(db): State<Arc<DatabaseConnection>>,
    Form(payload): Form<HashMap<String, String>>,
) -> Result<(), StatusCallbackError> {
    let status = require(&payload, "Status")?.to_string();
    let fax_status = require(&payload, "FaxStatus")?.to_string();

    // A callback without an error description keeps the stored one.
    let error_message = payload
        .get("ErrorMessage")
        .filter(|message| !message.is_empty())
        .cloned();

    db.transaction(|txn| {
        Box::pin(async move {
            let model = fax::Entity::find_by_id(uuid)
                .one(txn)
                .await?
                .ok_or(StatusCallbackError::FaxNotFound)?;

            info!(
                %uuid,
                %status,
                %fax_status,
                "received a provider status callback"
            );

            let mut metadata = match model.twilio_metadata.clone() {
                Value::Array(entries) => entries,
                other => vec![other],
            };
            metadata.push(serde_json::to_value(&payload).map_err(|e| {
                DbErr::Custom(format!("unable to serialize callback payload: {e}"))
            })?);

            let mut active: fax::ActiveModel = model.into();
            active.status = ActiveValue::Set(status);
            active.fax_status = ActiveValue::Set(fax_status);
            if let Some(message) = error_message {
                active.error_message = ActiveValue::Set(Some(message));
            }
            active.twilio_metadata = ActiveValue::Set(Value::Array(metadata));
            active.update(txn).await?;

            Ok(())
        })
    })
    .await
    .into_raw_result()
}
