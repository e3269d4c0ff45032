use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use common::{s3, twilio};
use db::{user, ActiveValue, Database, DatabaseConnection, EntityTrait};
use migration::MigratorTrait;

use crate::provider::{FaxProvider, MediaStore};

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Insert a user record, returning its identifier.
pub(crate) async fn create_user(db: &DatabaseConnection, phone_number: &str) -> i64 {
    user::Entity::insert(user::ActiveModel {
        phone_number: ActiveValue::Set(phone_number.to_string()),
        email: ActiveValue::Set(None),
        password: ActiveValue::Set(None),
        is_active: ActiveValue::Set(true),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("unable to insert test user")
    .last_insert_id
}

/// Telephony provider fake with canned responses.
///
/// `download_media` responds with a 404 media fetch error when no
/// canned media is configured.
pub(crate) struct FakeProvider {
    pub(crate) sid: &'static str,
    pub(crate) status: &'static str,
    pub(crate) media_url: Option<&'static str>,
    pub(crate) media: Option<&'static [u8]>,
    pub(crate) create_calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            sid: "FXabc123",
            status: "queued",
            media_url: None,
            media: None,
            create_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    fn resource(&self) -> twilio::FaxResource {
        twilio::FaxResource {
            sid: self.sid.to_string(),
            status: self.status.to_string(),
            media_url: self.media_url.map(String::from),
        }
    }
}

#[async_trait]
impl FaxProvider for FakeProvider {
    async fn create_fax(
        &self,
        _from: &str,
        _to: &str,
        _media_url: &str,
        _status_callback: &str,
    ) -> Result<twilio::FaxResource, twilio::Error> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self.resource())
    }

    async fn get_fax(&self, _sid: &str) -> Result<twilio::FaxResource, twilio::Error> {
        Ok(self.resource())
    }

    async fn download_media(&self, _media_url: &str) -> Result<Vec<u8>, twilio::Error> {
        self.media
            .map(<[u8]>::to_vec)
            .ok_or(twilio::Error::MediaFetchError(404))
    }
}

/// Media store fake that records uploads in memory.
#[derive(Default)]
pub(crate) struct FakeStore {
    pub(crate) uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl MediaStore for FakeStore {
    async fn media_url(&self, key: &str) -> Result<String, s3::Error> {
        Ok(format!("https://media.test/{key}"))
    }

    async fn upload_media(&self, key: &str, file: Vec<u8>) -> Result<(), s3::Error> {
        self.uploads.lock().unwrap().push((key.to_string(), file));

        Ok(())
    }
}
