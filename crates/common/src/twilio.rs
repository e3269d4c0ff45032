//! Twilio Programmable Fax REST client.
//!
//! Only the small subset of the API that the fax lifecycle needs is
//! covered: creating an outbound fax, fetching a fax resource by sid
//! and downloading received media.

use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::config;

/// Twilio Programmable Fax API base URL.
const FAX_API_URL: &str = "https://fax.twilio.com/v1/Faxes";

/// Telephony provider request errors.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Transport-level error.
    HttpError(reqwest::Error),

    /// Provider responded with a non-success status code.
    #[display(fmt = "provider responded with status {}", _0)]
    #[from(ignore)]
    ApiError(#[error(not(source))] u16),

    /// Media URL responded with a non-success status code.
    #[display(fmt = "media fetch responded with status {}", _0)]
    #[from(ignore)]
    MediaFetchError(#[error(not(source))] u16),
}

/// Fax resource, as returned by the provider.
///
/// `media_url` is only present on faxes that the provider
/// has finished receiving.
#[derive(Debug, Deserialize)]
pub struct FaxResource {
    /// Provider-assigned fax sid.
    pub sid: String,

    /// Provider-level fax lifecycle status.
    pub status: String,

    /// URL the received fax media can be fetched from.
    #[serde(default)]
    pub media_url: Option<String>,
}

/// Configured telephony provider client.
pub struct ConfiguredClient<'a> {
    config: &'a config::Twilio,
    client: reqwest::Client,
}

impl<'a> ConfiguredClient<'a> {
    /// Create new [`ConfiguredClient`] from the provided [`Twilio`] configuration.
    ///
    /// [`Twilio`]: config::Twilio
    pub fn new(config: &'a config::Twilio) -> ConfiguredClient<'a> {
        ConfiguredClient {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Request an outbound fax transmission from the provider.
    ///
    /// `media_url` has to be publicly fetchable, `status_callback` receives
    /// form-encoded lifecycle updates for the created fax resource.
    pub async fn create_fax(
        &self,
        from: &str,
        to: &str,
        media_url: &str,
        status_callback: &str,
    ) -> Result<FaxResource, Error> {
        let response = self
            .client
            .post(FAX_API_URL)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", from),
                ("To", to),
                ("MediaUrl", media_url),
                ("StatusCallback", status_callback),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Fetch a fax resource by its provider sid.
    pub async fn get_fax(&self, sid: &str) -> Result<FaxResource, Error> {
        let response = self
            .client
            .get(format!("{FAX_API_URL}/{sid}"))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Download fax media from a provider-supplied URL.
    pub async fn download_media(&self, media_url: &str) -> Result<Vec<u8>, Error> {
        let response = self.client.get(media_url).send().await?;

        if !response.status().is_success() {
            return Err(Error::MediaFetchError(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
