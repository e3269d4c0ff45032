//! Fax job claim loop.
//!
//! Each worker repeatedly claims one pending job inside a transaction
//! using a skip-locked row lock, runs it and marks it `completed` or
//! `failed` before the transaction commits. Failed jobs are left for
//! manual reconciliation and are never retried automatically.

/// Inbound fax media retrieval job.
pub(crate) mod receive;

/// Outbound fax submission job.
pub(crate) mod send;

use std::{sync::Arc, time::Duration};

use common::{config, s3, twilio};
use db::{
    job,
    sea_query::{LockBehavior, LockType},
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QuerySelect, TransactionErrorExt, TransactionTrait, Uuid,
};
use derive_more::{Display, Error, From};
use tracing::{error, info, instrument};

use crate::provider::{FaxProvider, MediaStore};

/// Fax job processing errors.
#[derive(Debug, Display, Error, From)]
pub(crate) enum JobError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Telephony provider request error.
    ProviderError(twilio::Error),

    /// Media store request error.
    StorageError(s3::Error),

    /// Job points at a fax record that does not exist.
    #[display(fmt = "missing fax record {}", _0)]
    MissingFax(#[error(not(source))] Uuid),

    /// Outbound fax record has no media content key.
    #[display(fmt = "missing media content key")]
    MissingContentKey,

    /// Inbound fax record has no provider sid.
    #[display(fmt = "missing provider sid")]
    MissingSid,

    /// Provider has no media for a received fax.
    #[display(fmt = "missing media url")]
    MissingMediaUrl,
}

/// Repeatedly claim and run pending fax jobs.
///
/// The loop sleeps for the configured poll period whenever the job
/// queue is empty, and keeps going when an individual claim attempt
/// errors out.
#[instrument(skip_all)]
pub(crate) async fn spawn(
    twilio_config: Arc<config::Twilio>,
    storage_config: Arc<config::Storage>,
    worker_config: Arc<config::Worker>,
    db: Arc<DatabaseConnection>,
) {
    loop {
        let outcome = run_next(&twilio_config, &storage_config, &worker_config, &db).await;

        match outcome {
            Ok(empty) if empty => {
                tokio::time::sleep(Duration::from_secs(worker_config.poll_period)).await
            }
            Err(error) => error!(%error, "worker error"),
            _ => {}
        }
    }
}

/// Claim and run a single pending job with production clients.
async fn run_next(
    twilio_config: &Arc<config::Twilio>,
    storage_config: &Arc<config::Storage>,
    worker_config: &Arc<config::Worker>,
    db: &DatabaseConnection,
) -> Result<bool, JobError> {
    db.transaction::<_, bool, JobError>(|txn| {
        let twilio_config = twilio_config.clone();
        let storage_config = storage_config.clone();
        let worker_config = worker_config.clone();

        Box::pin(async move {
            let provider = twilio::ConfiguredClient::new(&twilio_config);
            let store = s3::ConfiguredClient::new(&storage_config).await;

            process_next(txn, &provider, &store, &worker_config.public_url).await
        })
    })
    .await
    .into_raw_result()
}

/// Claim and run a single pending job inside the provided transaction.
///
/// Returns `true` when the job queue was empty. Job errors other than
/// database ones are absorbed into the `failed` job status, so a
/// misbehaving provider never wedges the queue.
pub(crate) async fn process_next<P, S>(
    txn: &DatabaseTransaction,
    provider: &P,
    store: &S,
    public_url: &str,
) -> Result<bool, JobError>
where
    P: FaxProvider,
    S: MediaStore,
{
    let mut job_query = job::Entity::find().filter(job::Column::Status.eq(job::Status::New));

    QuerySelect::query(&mut job_query)
        .lock_with_behavior(LockType::NoKeyUpdate, LockBehavior::SkipLocked);

    let Some(job) = job_query.one(txn).await? else {
        return Ok(true);
    };

    let outcome = match job.kind {
        job::Kind::SendFax => send::run(txn, provider, store, public_url, job.fax_uuid).await,
        job::Kind::ReceiveFax => receive::run(txn, provider, store, job.fax_uuid).await,
    };

    let status = match outcome {
        Ok(()) => job::Status::Completed,
        Err(JobError::DatabaseError(err)) => return Err(err.into()),
        Err(error) => {
            info!(job = job.id, %error, "fax job error");

            job::Status::Failed
        }
    };

    job::Entity::update_many()
        .filter(job::Column::Id.eq(job.id))
        .col_expr(job::Column::Status, status.into())
        .exec(txn)
        .await?;

    Ok(false)
}
