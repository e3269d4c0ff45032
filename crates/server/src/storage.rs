use std::sync::Arc;

use axum::async_trait;
use common::{config::Config, s3};

/// Media store seam used by the fax submission handler.
///
/// Uploads go through this trait so that handler logic can be
/// exercised against an in-memory store in tests.
#[async_trait]
pub(crate) trait MediaStore: Send + Sync {
    /// Store fax media under the provided object key.
    async fn upload_media(&self, key: &str, file: Vec<u8>) -> Result<(), s3::Error>;
}

/// S3-backed media store.
pub(crate) struct S3MediaStore {
    config: Arc<Config>,
}

impl S3MediaStore {
    pub(crate) fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload_media(&self, key: &str, file: Vec<u8>) -> Result<(), s3::Error> {
        s3::ConfiguredClient::new(&self.config.storage)
            .await
            .upload_media(key, file)
            .await
    }
}
