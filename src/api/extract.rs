use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::models::ApiError;
use crate::core::errors::SendItError;

/// JSON request body whose failures are reported through `ApiError`.
///
/// An empty body decodes to `T::default()`, so the service still gets to
/// answer 404/401 before complaining about missing fields. The content type
/// is not checked.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request(req: Request, state: &S) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError(SendItError::InvalidInput(e.body_text())))?;
            decode(&bytes).map(JsonBody)
        }
    }
}

fn decode<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        debug!(error = %e, "Rejected request body");
        ApiError(SendItError::InvalidInput(format!("Invalid request body: {}", e)))
    })
}
