use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest},
    http::{Request, StatusCode},
    Json,
};
use axum_derive_error::ErrorResponse;
use derive_more::{Display, Error, From};
use validator::{Validate, ValidationErrors};

/// JSON request body validation errors.
#[derive(ErrorResponse, Display, Error, From)]
pub enum ValidatedJsonRejection {
    /// Request body is not a parseable JSON value.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    JsonParsingError(JsonRejection),

    /// Parsed value violates its field constraints.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    ValidationError(ValidationErrors),
}

/// JSON extractor that runs [`validator`] field constraints after parsing.
///
/// A drop-in replacement for [`Json`] in handlers whose request types
/// derive [`Validate`].
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedJson<T>
where
    T: Validate,
    B: Send + 'static,
    S: Sync,
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::from_request(req, state).await?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
