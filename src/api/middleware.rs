use crate::api::models::ApiError;
use crate::core::errors::SendItError;
use crate::core::services::ParcelService;
use axum::{
    Router,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use http::{HeaderName, HeaderValue, header};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

const SECURITY_HEADERS: [(HeaderName, &str); 6] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (header::X_XSS_PROTECTION, "0"),
    (header::STRICT_TRANSPORT_SECURITY, "max-age=15552000; includeSubDomains"),
];

/// Adds the hardening headers to every response that does not already set them.
pub fn security_headers(router: Router) -> Router {
    SECURITY_HEADERS.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value)))
    })
}

/// Validates the bearer token and stores the caller's `User` in the request
/// extensions for the handlers behind it.
pub async fn auth_middleware(
    State(service): State<Arc<ParcelService>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(SendItError::NotAuthenticated)?;

    let user = service.authenticate_token(token).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
