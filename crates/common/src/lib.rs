pub mod config;
pub mod hash;
pub mod phone;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "twilio")]
pub mod twilio;
