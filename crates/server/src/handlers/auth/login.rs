use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use common::phone;
use db::{
    sea_query::OnConflict, token, user, ActiveModelTrait, ActiveValue, ColumnTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{auth::ClientFingerprint, validation::ValidatedJson};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum LoginError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid login credentials")]
    InvalidCredentials,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "user inactive or deleted")]
    InactiveUser,
}

#[derive(Deserialize, Validate)]
pub(super) struct LoginRequest {
    /// Phone number or email address.
    #[validate(length(min = 1, max = 128))]
    identifier: String,

    #[validate(length(min = 1, max = 128))]
    password: String,
}

#[derive(Serialize)]
pub(super) struct LoginResponse {
    token: String,
}

/// User login handler.
///
/// The identifier is normalized as a US phone number first and treated
/// as an email address when normalization fails. On success the user's
/// authentication token is created if it did not exist yet and cycled:
/// a fresh key is generated and bound to the presented client
/// fingerprint, and any previously issued key stops authenticating.
pub(super) async fn login(
    State(db): State<Arc<DatabaseConnection>>,
    fingerprint: ClientFingerprint,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, LoginError> {
    let user = match phone::e164(&request.identifier) {
        Ok(phone_number) => {
            user::Entity::find()
                .filter(user::Column::PhoneNumber.eq(phone_number))
                .one(&*db)
                .await?
        }
        Err(_) => {
            user::Entity::find()
                .filter(user::Column::Email.eq(request.identifier.trim()))
                .one(&*db)
                .await?
        }
    }
    .ok_or(LoginError::InvalidCredentials)?;

    let password_hash = user.password.as_deref().ok_or(LoginError::InvalidCredentials)?;
    let parsed_hash = PasswordHash::new(password_hash).map_err(|_| LoginError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(request.password.as_bytes(), &parsed_hash)
        .map_err(|_| LoginError::InvalidCredentials)?;

    if !user.is_active {
        return Err(LoginError::InactiveUser);
    }

    let ip_address_hash = fingerprint.ip_address_hash();
    let user_agent = fingerprint.user_agent;
    let user_id = user.id;

    db.transaction(|txn| {
        Box::pin(async move {
            // Concurrent first logins race to this insert; the unique
            // constraint on the user id lets exactly one row survive and
            // everyone proceeds with the fetch below.
            token::Entity::insert(token::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                key: ActiveValue::Set(token::generate_key()),
                user_agent: ActiveValue::Set(None),
                ip_address_hash: ActiveValue::Set(None),
                created_at: ActiveValue::Set(db::now()),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::column(token::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await?;

            let model = token::Entity::find()
                .filter(token::Column::UserId.eq(user_id))
                .one(txn)
                .await?
                .ok_or_else(|| {
                    DbErr::RecordNotFound(String::from("authentication token"))
                })?;

            let (active, key) = token::cycle(model, ip_address_hash, user_agent);

            active.update(txn).await?;

            Ok(Json(LoginResponse { token: key }))
        })
    })
    .await
    .into_raw_result()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_database, create_user, RequestBodyExt, ResponseBodyExt};

    use assert_json::{assert_json, validators};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use db::token::KEY_LENGTH;
    use serde_json::json;
    use tower::{Service, ServiceExt};

    fn login_request(identifier: &str, password: &str, ip: &str, user_agent: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("Content-Type", "application/json")
            .header("X-Forwarded-For", ip)
            .header("User-Agent", user_agent)
            .body(Body::from_json(json!({
                "identifier": identifier,
                "password": password,
            })))
            .unwrap()
    }

    fn list_request(token: &str, ip: &str, user_agent: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/fax")
            .header("Authorization", format!("Bearer {token}"))
            .header("X-Forwarded-For", ip)
            .header("User-Agent", user_agent)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn successful() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let response = crate::app_router(db, Arc::new(Config::for_tests()))
            .oneshot(login_request("318 259 9773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        assert_json!(response.json().await, {
            "token": validators::string(|val| {
                (val.len() == KEY_LENGTH)
                    .then_some(())
                    .ok_or(String::from("invalid length"))
            })
        });
    }

    #[tokio::test]
    async fn email_identifier() {
        let db = Arc::new(create_database().await);

        let user_id = create_user(&db, "+13182599773", Some("hunter2"), true).await;

        use db::{ActiveValue, EntityTrait};
        let mut active: db::user::ActiveModel = db::user::Entity::find_by_id(user_id)
            .one(&*db)
            .await
            .unwrap()
            .unwrap()
            .into();
        active.email = ActiveValue::Set(Some(String::from("fax@example.com")));
        db::user::Entity::update(active).exec(&*db).await.unwrap();

        let response = crate::app_router(db, Arc::new(Config::for_tests()))
            .oneshot(login_request("fax@example.com", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let response = crate::app_router(db, Arc::new(Config::for_tests()))
            .oneshot(login_request("+13182599773", "wrong", "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_identifier() {
        let db = Arc::new(create_database().await);

        let response = crate::app_router(db, Arc::new(Config::for_tests()))
            .oneshot(login_request("+13182599773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn inactive_user() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), false).await;

        let response = crate::app_router(db, Arc::new(Config::for_tests()))
            .oneshot(login_request("+13182599773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn cycle_invalidates_previous_key() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let mut service = crate::app_router(db, Arc::new(Config::for_tests()));

        let first = service
            .call(login_request("+13182599773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap()
            .json()
            .await;
        let first_key = first["token"].as_str().unwrap().to_string();

        let second = service
            .call(login_request("+13182599773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap()
            .json()
            .await;
        let second_key = second["token"].as_str().unwrap().to_string();

        assert_ne!(first_key, second_key);

        let stale = service
            .call(list_request(&first_key, "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(stale.status(), StatusCode::FORBIDDEN);

        let fresh = service
            .call(list_request(&second_key, "10.0.0.1", "agent-a"))
            .await
            .unwrap();

        assert_eq!(fresh.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn single_fingerprint_mismatch_is_tolerated() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let mut service = crate::app_router(db, Arc::new(Config::for_tests()));

        let login = service
            .call(login_request("+13182599773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap()
            .json()
            .await;
        let key = login["token"].as_str().unwrap().to_string();

        let new_ip = service
            .call(list_request(&key, "10.9.9.9", "agent-a"))
            .await
            .unwrap();

        assert_eq!(new_ip.status(), StatusCode::OK);

        let new_user_agent = service
            .call(list_request(&key, "10.0.0.1", "agent-b"))
            .await
            .unwrap();

        assert_eq!(new_user_agent.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn double_fingerprint_mismatch_is_rejected() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let mut service = crate::app_router(db, Arc::new(Config::for_tests()));

        let login = service
            .call(login_request("+13182599773", "hunter2", "10.0.0.1", "agent-a"))
            .await
            .unwrap()
            .json()
            .await;
        let key = login["token"].as_str().unwrap().to_string();

        let response = service
            .call(list_request(&key, "10.9.9.9", "agent-b"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
