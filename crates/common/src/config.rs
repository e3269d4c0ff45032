use std::{net::SocketAddr, path::PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing_subscriber::filter::LevelFilter;

/// Database configuration.
#[derive(Deserialize)]
pub struct Database {
    /// Database URL string.
    pub url: String,
}

/// HTTP server configuration.
#[derive(Deserialize)]
pub struct Server {
    /// Address, that HTTP server will listen on.
    pub address: SocketAddr,

    /// Publicly reachable base URL of this deployment, without a trailing slash.
    ///
    /// Used to construct status callback and inbound delivery URLs
    /// that are passed to the telephony provider.
    pub public_url: String,
}

/// Implementation of [`serde`]'s deserializer for [`FromStr`] types.
#[cfg(feature = "logging")]
fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error,
    D: serde::de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
}

/// Logging configuration.
#[cfg(feature = "logging")]
#[derive(Deserialize)]
pub struct Logging {
    /// Log level.
    #[serde(deserialize_with = "deserialize_from_str")]
    pub level: LevelFilter,
}

#[cfg(feature = "logging")]
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
        }
    }
}

/// Background fax job worker configuration.
#[derive(Deserialize)]
pub struct Worker {
    /// Publicly reachable base URL of the API server, without a trailing slash.
    ///
    /// Status callback URLs passed to the telephony provider point at it.
    pub public_url: String,

    /// Total count of workers started for job processing.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Delay between empty job queue polls, in seconds.
    #[serde(default = "default_poll_period")]
    pub poll_period: u64,
}

// Default values used for worker configuration.
fn default_worker_count() -> usize {
    1
}

fn default_poll_period() -> u64 {
    5
}

/// AWS S3-compatible storage configuration.
#[derive(Deserialize)]
pub struct Storage {
    /// Access key identifier.
    pub access_key_id: String,

    /// Secret access key.
    pub secret_access_key: String,

    /// S3 region name.
    pub region: String,

    /// S3 endpoint URL.
    pub endpoint_url: String,

    /// S3 bucket name for fax media storage.
    pub media_bucket: String,
}

/// Telephony provider configuration.
#[derive(Deserialize)]
pub struct Twilio {
    /// Twilio account sid.
    pub account_sid: String,

    /// Twilio auth token.
    pub auth_token: String,

    /// E.164 number that outbound faxes are sent from.
    pub from_number: String,
}

/// General configuration.
#[derive(Deserialize)]
pub struct Config {
    /// General database configuration.
    pub database: Database,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: Option<Server>,

    /// Logging configuration.
    #[cfg(feature = "logging")]
    #[serde(default)]
    pub logging: Logging,

    /// Background worker configuration.
    #[serde(default)]
    pub worker: Option<Worker>,

    /// Storage configuration.
    pub storage: Storage,

    /// Telephony provider configuration.
    pub twilio: Twilio,
}

impl Config {
    /// Create new config using default configuration file or environment variables.
    ///
    /// See [`Env`] for more details on how to use environment variables configuration.
    ///
    /// [`Env`]: figment::providers::Env
    pub fn new(path: Option<PathBuf>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.unwrap_or(PathBuf::from("Config.toml"))))
            .merge(Env::prefixed("CONFIG_").split("_"))
            .extract()
    }

    /// Create new config suitable for running unit tests.
    #[cfg(feature = "test-utils")]
    pub fn for_tests() -> Self {
        Self {
            database: Database {
                url: String::from("sqlite::memory:"),
            },
            server: Some(Server {
                address: "127.0.0.1:3000".parse().unwrap(),
                public_url: String::from("http://localhost:3000"),
            }),
            logging: Logging::default(),
            worker: None,
            storage: Storage {
                access_key_id: String::new(),
                secret_access_key: String::new(),
                region: String::new(),
                endpoint_url: String::new(),
                media_bucket: String::new(),
            },
            twilio: Twilio {
                account_sid: String::new(),
                auth_token: String::new(),
                from_number: String::from("+18728147688"),
            },
        }
    }
}
