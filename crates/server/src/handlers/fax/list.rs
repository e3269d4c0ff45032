use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    fax, sea_query::Condition, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{auth::AuthenticatedUserId, pagination::Pagination};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum FaxListError {
    DatabaseError(DbErr),
}

#[derive(Serialize)]
pub(super) struct FaxListEntry {
    uuid: db::Uuid,
    direction: fax::Direction,
    from_number: String,
    to_number: String,
    status: String,
    fax_status: String,
    created_at: String,
}

#[derive(Serialize)]
pub(super) struct FaxListResponse {
    faxes: Vec<FaxListEntry>,
}

/// Dashboard fax listing handler.
///
/// Shows the caller's own outbound faxes alongside every inbound fax,
/// newest first. Numbers are prettified for display.
pub(super) async fn list(
    Extension(current_user): Extension<AuthenticatedUserId>,
    Query(pagination): Query<Pagination>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<FaxListResponse>, FaxListError> {
    let faxes = fax::Entity::find()
        .filter(
            Condition::any()
                .add(fax::Column::CreatedBy.eq(current_user.id()))
                .add(fax::Column::Direction.eq(fax::Direction::Inbound)),
        )
        .order_by_desc(fax::Column::CreatedAt)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&*db)
        .await?
        .into_iter()
        .map(|model| FaxListEntry {
            uuid: model.uuid,
            direction: model.direction,
            from_number: common::phone::pretty(&model.from_number),
            to_number: common::phone::pretty(&model.to_number),
            status: model.status,
            fax_status: model.fax_status,
            created_at: model.created_at.to_string(),
        })
        .collect();

    Ok(Json(FaxListResponse { faxes }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{authenticated_key, create_database, create_user, ResponseBodyExt};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use db::{fax, job, EntityTrait};
    use serde_json::Value;
    use tower::Service;

    #[tokio::test]
    async fn lists_own_and_inbound_faxes() {
        let db = Arc::new(create_database().await);

        let user_id = create_user(&db, "+13182599773", Some("hunter2"), true).await;
        let other_id = create_user(&db, "+13182599774", None, true).await;

        let (own, _) = fax::new_outbound(
            user_id,
            String::from("+18728147688"),
            String::from("+13182599775"),
        );
        fax::Entity::insert(own).exec_without_returning(&*db).await.unwrap();

        let (foreign, _) = fax::new_outbound(
            other_id,
            String::from("+18728147688"),
            String::from("+13182599776"),
        );
        fax::Entity::insert(foreign)
            .exec_without_returning(&*db)
            .await
            .unwrap();

        let (inbound, _) = fax::new_inbound(
            String::from("FXin1"),
            String::from("+13182599773"),
            String::from("+18728147688"),
            String::from("received"),
            String::from("received"),
            Value::Object(Default::default()),
        );
        fax::Entity::insert(inbound)
            .exec_without_returning(&*db)
            .await
            .unwrap();

        // A job row should never leak into the dashboard listing.
        assert!(job::Entity::find().all(&*db).await.unwrap().is_empty());

        let mut service = crate::app_router(db, Arc::new(Config::for_tests()));
        let key = authenticated_key(&mut service).await;

        let response = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri("/fax")
                    .header("Authorization", format!("Bearer {key}"))
                    .header("X-Forwarded-For", "10.0.0.1")
                    .header("User-Agent", "agent-a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.json().await;
        let faxes = body["faxes"].as_array().unwrap();

        assert_eq!(faxes.len(), 2);
        assert!(faxes
            .iter()
            .any(|entry| entry["direction"] == "inbound"
                && entry["from_number"] == "+1 (318) 259 9773"));
        assert!(faxes
            .iter()
            .all(|entry| entry["to_number"] != "+1 (318) 259 9776"));
    }
}
