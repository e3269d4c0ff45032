use db::{fax, ActiveModelTrait, ActiveValue, DatabaseTransaction, EntityTrait, Uuid};
use tracing::info;

use crate::{
    jobs::JobError,
    provider::{FaxProvider, MediaStore},
};

/// Retrieve the media of a received inbound fax.
///
/// The fax resource is fetched from the provider by sid, its media is
/// downloaded and stored in the media store, and the object key is
/// persisted on the fax record. The fax record keeps a `None` content
/// key until the media is safely stored, so a failed download leaves
/// the record observably media-less.
pub(crate) async fn run<P, S>(
    txn: &DatabaseTransaction,
    provider: &P,
    store: &S,
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

    if fax.direction == fax::Direction::Outbound {
        info!(%fax_uuid, "receive job enqueued for an outbound fax");
        return Ok(());
    }

    let sid = fax.sid.as_deref().ok_or(JobError::MissingSid)?;

    let resource = provider.get_fax(sid).await?;
    let media_url = resource.media_url.ok_or(JobError::MissingMediaUrl)?;

    let media = provider.download_media(&media_url).await?;

    let key = fax::content_key(fax.uuid);
    store.upload_media(&key, media).await?;

    info!(%fax_uuid, %key, "stored inbound fax media");

    let mut active: fax::ActiveModel = fax.into();
    active.content_key = ActiveValue::Set(Some(key));
    active.update(txn).await?;

    Ok(())
}
