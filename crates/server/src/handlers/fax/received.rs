use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, http::StatusCode, Form};
use axum_derive_error::ErrorResponse;
use db::{fax, job, DatabaseConnection, DbErr, EntityTrait, TransactionErrorExt, TransactionTrait};
use derive_more::{Display, Error, From};
use tracing::info;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ReceivedWebhookError {
    DatabaseError(DbErr),

    /// Webhook payload is missing a required field.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "missing {} field", "_0")]
    MissingField(#[error(not(source))] &'static str),
}

fn require(
    payload: &HashMap<String, String>,
    field: &'static str,
) -> Result<String, ReceivedWebhookError> {
    payload
        .get(field)
        .cloned()
        .ok_or(ReceivedWebhookError::MissingField(field))
}

/// Inbound fax creation webhook handler.
///
/// The provider posts the outcome of an inbound transmission here.
/// A fax record is created from the payload and a receive job is
/// enqueued in the same transaction, so the media download never
/// starts before the record it belongs to is visible.
pub(super) async fn received(
    State(db): State<Arc<DatabaseConnection>>,
    Form(payload): Form<HashMap<String, String>>,
) -> Result<(), ReceivedWebhookError> {
    let sid = require(&payload, "FaxSid")?;
    let from_number = require(&payload, "From")?;
    let to_number = require(&payload, "To")?;
    let status = require(&payload, "Status")?;
    let fax_status = require(&payload, "FaxStatus")?;

    let raw_payload = serde_json::to_value(&payload)
        .map_err(|e| DbErr::Custom(format!("unable to serialize webhook payload: {e}")))?;

    db.transaction(|txn| {
        Box::pin(async move {
            let (model, uuid) =
                fax::new_inbound(sid.clone(), from_number, to_number, status, fax_status, raw_payload);

            fax::Entity::insert(model).exec_without_returning(txn).await?;

            job::Entity::insert(job::enqueue(uuid, job::Kind::ReceiveFax))
                .exec_without_returning(txn)
                .await?;

            info!(%uuid, %sid, "created an inbound fax record");

            Ok(())
        })
    })
    .await
    .into_raw_result()
}
