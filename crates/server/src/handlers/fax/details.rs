use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{fax, DatabaseConnection, DbErr, EntityTrait, Uuid};
use derive_more::{Display, Error, From};
use serde::Serialize;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum FaxDetailsError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "fax was not found")]
    FaxNotFound,
}

#[derive(Serialize)]
pub(super) struct FaxDetailsResponse {
    uuid: Uuid,
    direction: fax::Direction,
    from_number: String,
    to_number: String,
    status: String,
    fax_status: String,
    error_message: Option<String>,

    /// Whether media is stored for this record and can be fetched.
    has_content: bool,

    created_at: String,
}

/// Single fax record details handler.
pub(super) async fn details(
    Path(uuid): Path<Uuid>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<FaxDetailsResponse>, FaxDetailsError> {
    let model = fax::Entity::find_by_id(uuid)
        .one(&*db)
        .await?
        .ok_or(FaxDetailsError::FaxNotFound)?;

    Ok(Json(FaxDetailsResponse {
        uuid: model.uuid,
        direction: model.direction,
        from_number: common::phone::pretty(&model.from_number),
        to_number: common::phone::pretty(&model.to_number),
        status: model.status,
        fax_status: model.fax_status,
        error_message: model.error_message,
        has_content: model.content_key.is_some(),
        created_at: model.created_at.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{authenticated_key, create_database, create_user, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use db::{fax, EntityTrait, Uuid};
    use tower::Service;

    fn details_request(key: &str, uuid: Uuid) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(format!("/fax/{uuid}"))
            .header("Authorization", format!("Bearer {key}"))
            .header("X-Forwarded-For", "10.0.0.1")
            .header("User-Agent", "agent-a")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn successful() {
        let db = Arc::new(create_database().await);

        let user_id = create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let (model, uuid) = fax::new_outbound(
            user_id,
            String::from("+18728147688"),
            String::from("+13182599774"),
        );
        fax::Entity::insert(model)
            .exec_without_returning(&*db)
            .await
            .unwrap();

        let mut service = crate::app_router(db, Arc::new(Config::for_tests()));
        let key = authenticated_key(&mut service).await;

        let response = service.call(details_request(&key, uuid)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        assert_json!(response.json().await, {
            "uuid": uuid.to_string(),
            "direction": "outbound",
            "from_number": "+1 (872) 814 7688",
            "to_number": "+1 (318) 259 9774",
            "status": "queued",
            "fax_status": "queued",
            "error_message": null,
            "has_content": true,
        });
    }

    #[tokio::test]
    async fn unknown_fax() {
        let db = Arc::new(create_database().await);

        create_user(&db, "+13182599773", Some("hunter2"), true).await;

        let mut service = crate::app_router(db, Arc::new(Config::for_tests()));
        let key = authenticated_key(&mut service).await;

        let response = service
            .call(details_request(&key, Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
