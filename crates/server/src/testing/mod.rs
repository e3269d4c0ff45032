use std::{error::Error, sync::Mutex};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{async_trait, body::Body, http::Request, Router};
use common::s3;
use db::{user, ActiveValue, Database, DatabaseConnection, EntityTrait};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde::Serialize;
use serde_json::json;
use tower::Service;

use crate::storage::MediaStore;

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
pub(crate) async fn create_user(
    db: &DatabaseConnection,
    phone_number: &str,
    password: Option<&str>,
    is_active: bool,
) -> i64 {
    let password = password.map(|password| {
        Argon2::default()
            .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))
            .expect("unable to hash password")
            .to_string()
    });

    user::Entity::insert(user::ActiveModel {
        phone_number: ActiveValue::Set(phone_number.to_string()),
        email: ActiveValue::Set(None),
        password: ActiveValue::Set(password),
        is_active: ActiveValue::Set(is_active),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("unable to insert test user")
    .last_insert_id
}

/// Log the default test user in and return the issued token key.
///
/// The user must already exist with the `+13182599773`/`hunter2`
/// credentials; requests authenticated with the returned key should
/// present the `10.0.0.1`/`agent-a` client fingerprint.
pub(crate) async fn authenticated_key(service: &mut Router) -> String {
    let response = service
        .call(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("Content-Type", "application/json")
                .header("X-Forwarded-For", "10.0.0.1")
                .header("User-Agent", "agent-a")
                .body(Body::from_json(json!({
                    "identifier": "+13182599773",
                    "password": "hunter2",
                })))
                .unwrap(),
        )
        .await
        .unwrap();

    response.json().await["token"]
        .as_str()
        .expect("no token in login response")
        .to_string()
}

/// Media store fake that records uploads in memory.
#[derive(Default)]
pub(crate) struct FakeMediaStore {
    pub(crate) uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload_media(&self, key: &str, file: Vec<u8>) -> Result<(), s3::Error> {
        self.uploads.lock().unwrap().push((key.to_string(), file));

        Ok(())
    }
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn text(self) -> String;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for hyper::Response<T>
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self.into_body())
            .await
            .expect("unable to convert to bytes")
    }

    async fn text(self) -> String {
        String::from_utf8(self.bytes().await.to_vec()).expect("unable to convert to text")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
