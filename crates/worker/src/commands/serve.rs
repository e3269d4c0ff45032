use std::sync::Arc;

use common::config;
use db::DatabaseConnection;
use futures_util::{stream::FuturesUnordered, FutureExt, StreamExt};
use tracing::{info, instrument};

use crate::jobs;

/// Spawn fax job workers to handle pending jobs.
#[instrument(skip_all)]
pub(crate) async fn serve(
    worker_config: config::Worker,
    storage_config: config::Storage,
    twilio_config: config::Twilio,
    database: DatabaseConnection,
) {
    let worker_config = Arc::new(worker_config);
    let storage_config = Arc::new(storage_config);
    let twilio_config = Arc::new(twilio_config);
    let database = Arc::new(database);

    info!(
        worker_count = worker_config.worker_count,
        "started fax job processing"
    );

    (0..worker_config.worker_count)
        .map(|_| {
            tokio::spawn(jobs::spawn(
                twilio_config.clone(),
                storage_config.clone(),
                worker_config.clone(),
                database.clone(),
            ))
            .map(|_| ())
        })
        .collect::<FuturesUnordered<_>>()
        .collect::<()>()
        .await;
}
