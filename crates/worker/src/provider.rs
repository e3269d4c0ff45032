//! Seams between fax jobs and the outside world.
//!
//! Jobs talk to the telephony provider and the media store through
//! these traits so that job logic can be exercised against in-memory
//! fakes. Production code uses the configured clients from the
//! `common` crate.

use async_trait::async_trait;
use common::{s3, twilio};

/// Telephony provider operations used by fax jobs.
#[async_trait]
pub(crate) trait FaxProvider: Sync {
    /// Request an outbound fax transmission.
    async fn create_fax(
        &self,
        from: &str,
        to: &str,
        media_url: &str,
        status_callback: &str,
    ) -> Result<twilio::FaxResource, twilio::Error>;

    /// Fetch a fax resource by its provider sid.
    async fn get_fax(&self, sid: &str) -> Result<twilio::FaxResource, twilio::Error>;

    /// Download fax media from a provider-supplied URL.
    async fn download_media(&self, media_url: &str) -> Result<Vec<u8>, twilio::Error>;
}

#[async_trait]
impl FaxProvider for twilio::ConfiguredClient<'_> {
    async fn create_fax(
        &self,
        from: &str,
        to: &str,
        media_url: &str,
        status_callback: &str,
    ) -> Result<twilio::FaxResource, twilio::Error> {
        twilio::ConfiguredClient::create_fax(self, from, to, media_url, status_callback).await
    }

    async fn get_fax(&self, sid: &str) -> Result<twilio::FaxResource, twilio::Error> {
        twilio::ConfiguredClient::get_fax(self, sid).await
    }

    async fn download_media(&self, media_url: &str) -> Result<Vec<u8>, twilio::Error> {
        twilio::ConfiguredClient::download_media(self, media_url).await
    }
}

/// Media store operations used by fax jobs.
#[async_trait]
pub(crate) trait MediaStore: Sync {
    /// Get a publicly fetchable URL for stored media.
    async fn media_url(&self, key: &str) -> Result<String, s3::Error>;

    /// Store media under the provided object key.
    async fn upload_media(&self, key: &str, file: Vec<u8>) -> Result<(), s3::Error>;
}

#[async_trait]
impl MediaStore for s3::ConfiguredClient<'_> {
    async fn media_url(&self, key: &str) -> Result<String, s3::Error> {
        Ok(self.get_media(key).await?.uri().to_string())
    }

    async fn upload_media(&self, key: &str, file: Vec<u8>) -> Result<(), s3::Error> {
        s3::ConfiguredClient::upload_media(self, key, file).await
    }
}
