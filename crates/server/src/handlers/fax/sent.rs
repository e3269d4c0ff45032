use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderValue},
    Extension,
};
use axum_derive_error::ErrorResponse;
use common::config::Config;
use derive_more::{Display, Error};
use tracing::info;

#[derive(ErrorResponse, Display, Error)]
pub(super) enum SentWebhookError {
    /// Server was started without its public URL configured.
    #[display(fmt = "missing server configuration")]
    MissingServerConfig,
}

/// Inbound delivery instruction webhook handler.
///
/// The provider calls this when a fax is being sent to our number and
/// expects a TwiML document telling it what to do with the
/// transmission. The response instructs it to receive the fax and post
/// the result to the inbound creation webhook.
pub(super) async fn sent(
    Extension(config): Extension<Arc<Config>>,
) -> Result<(HeaderMap, String), SentWebhookError> {
    let server = config
        .server
        .as_ref()
        .ok_or(SentWebhookError::MissingServerConfig)?;

    let action = format!("{}/fax/callbacks/received", server.public_url);

    info!(%action, "instructing the provider to receive an inbound fax");

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/xml"));

    Ok((
        headers,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Receive action="{action}" /></Response>"#
        ),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_database, ResponseBodyExt};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use tower::ServiceExt;

    #[tokio::test]
    async fn returns_receive_instruction() {
        let db = Arc::new(create_database().await);

        let response = crate::app_router(db, Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/fax/callbacks/sent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/xml"
        );

        let body = response.text().await;

        assert!(body.contains(
            r#"<Receive action="http://localhost:3000/fax/callbacks/received" />"#
        ));
    }
}
