use db::{fax, ActiveModelTrait, ActiveValue, DatabaseTransaction, EntityTrait, Uuid};
use tracing::{info, warn};

use crate::{
    jobs::JobError,
    provider::{FaxProvider, MediaStore},
};

/// Submit an outbound fax to the telephony provider.
///
/// The stored media is exposed through a pre-signed URL and handed to
/// the provider together with a status callback URL pointing back at
/// the API server. On success the provider-assigned sid and initial
/// status are persisted on the fax record.
///
/// A record that already carries a sid was submitted before; running
/// the job again is a no-op, so a stray duplicate job can never cause
/// a double transmission.
pub(crate) async fn run<P, S>(
    txn: &DatabaseTransaction,
    provider: &P,
    store: &S,
    public_url: &str,
    fax_uuid: Uuid,
) -> Result<(), JobError>
where
    P: FaxProvider,
    S: MediaStore,
{
    let fax = fax::Entity::find_by_id(fax_uuid)
        .one(txn)
        .await?
        .ok_or(JobError::MissingFax(fax_uuid))?;

    if fax.direction == fax::Direction::Inbound {
        warn!(%fax_uuid, "send job enqueued for an inbound fax");
        return Ok(());
    }

    if fax.sid.is_some() {
        warn!(%fax_uuid, "fax was already submitted to the provider");
        return Ok(());
    }

    let content_key = fax
        .content_key
        .as_deref()
        .ok_or(JobError::MissingContentKey)?;

    let media_url = store.media_url(content_key).await?;
    let status_callback = format!("{public_url}/fax/callbacks/status/{fax_uuid}");

    let resource = provider
        .create_fax(&fax.from_number, &fax.to_number, &media_url, &status_callback)
        .await?;

    info!(%fax_uuid, sid = %resource.sid, "fax submitted to the provider");

    let mut active: fax::ActiveModel = fax.into();
    active.sid = ActiveValue::Set(Some(resource.sid));
    active.status = ActiveValue::Set(resource.status);
    active.update(txn).await?;

    Ok(())
}
