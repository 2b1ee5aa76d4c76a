use crate::{
    api::{extract::JsonBody, middleware::auth_middleware, models::*},
    core::{models::user::User, services::ParcelService},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

pub fn api_routes(service: Arc<ParcelService>) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", post(get_me).get(get_me))
        .route("/parcels", get(list_orders).post(create_order))
        .route("/parcels/{parcel_id}", get(get_order).put(update_order))
        .route("/parcels/{parcel_id}/cancel", put(cancel_order))
        .route("/parcels/{parcel_id}/destination", put(change_destination))
        .route("/parcels/{parcel_id}/status", put(change_status))
        .route("/parcels/{parcel_id}/presentLocation", put(change_present_location))
        .route("/users/{user_id}/parcels", get(list_user_orders))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = TokenResponse),
        (status = 400, description = "Missing or invalid field, or email taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(service): State<Arc<ParcelService>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (_, token) = service.register(req.into()).await?;
    Ok(Json(TokenResponse { success: true, token }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(service): State<Arc<ParcelService>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = service.login(req.email.as_deref(), req.password.as_deref()).await?;
    Ok(Json(TokenResponse { success: true, token }))
}

#[utoipa::path(
    post,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_me(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service.get_user(caller.id).await?;
    Ok(Json(UserResponse { success: true, data: user }))
}

#[utoipa::path(
    get,
    path = "/parcels",
    responses(
        (status = 200, description = "All orders", body = OrderListResponse),
        (status = 401, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_orders(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = service.list_orders(&caller).await?;
    Ok(Json(OrderListResponse {
        success: true,
        count: orders.len(),
        data: orders,
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/parcels",
    params(
        ("user_id" = String, Path, description = "Owner whose orders are listed")
    ),
    responses(
        (status = 200, description = "Orders owned by the user", body = OrderListResponse),
        (status = 401, description = "Caller is neither that user nor an admin", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn list_user_orders(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(user_id): Path<String>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = service.list_user_orders(&caller, &user_id).await?;
    Ok(Json(OrderListResponse {
        success: true,
        count: orders.len(),
        data: orders,
    }))
}

#[utoipa::path(
    post,
    path = "/parcels",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing field", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn create_order(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = service.create_order(&caller, req.into()).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse { success: true, data: order })))
}

#[utoipa::path(
    get,
    path = "/parcels/{parcel_id}",
    params(
        ("parcel_id" = String, Path, description = "ID of the order")
    ),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 401, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_order(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(parcel_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = service.get_order(&caller, &parcel_id).await?;
    Ok(Json(OrderResponse { success: true, data: order }))
}

#[utoipa::path(
    put,
    path = "/parcels/{parcel_id}",
    request_body = UpdateOrderRequest,
    params(
        ("parcel_id" = String, Path, description = "ID of the order")
    ),
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Blank field", body = ErrorResponse),
        (status = 401, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn update_order(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(parcel_id): Path<String>,
    JsonBody(req): JsonBody<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = service.update_order(&caller, &parcel_id, req.into()).await?;
    Ok(Json(OrderResponse { success: true, data: order }))
}

#[utoipa::path(
    put,
    path = "/parcels/{parcel_id}/cancel",
    params(
        ("parcel_id" = String, Path, description = "ID of the order")
    ),
    responses(
        (status = 200, description = "Order deleted", body = EmptyResponse),
        (status = 401, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn cancel_order(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(parcel_id): Path<String>,
) -> Result<Json<EmptyResponse>, ApiError> {
    service.cancel_order(&caller, &parcel_id).await?;
    Ok(Json(EmptyResponse::new()))
}

#[utoipa::path(
    put,
    path = "/parcels/{parcel_id}/destination",
    request_body = ChangeDestinationRequest,
    params(
        ("parcel_id" = String, Path, description = "ID of the order")
    ),
    responses(
        (status = 200, description = "Destination changed", body = OrderResponse),
        (status = 400, description = "Destination missing", body = ErrorResponse),
        (status = 401, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn change_destination(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(parcel_id): Path<String>,
    JsonBody(req): JsonBody<ChangeDestinationRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = service
        .change_destination(&caller, &parcel_id, req.destination.as_deref())
        .await?;
    Ok(Json(OrderResponse { success: true, data: order }))
}

#[utoipa::path(
    put,
    path = "/parcels/{parcel_id}/status",
    request_body = ChangeStatusRequest,
    params(
        ("parcel_id" = String, Path, description = "ID of the order")
    ),
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Status missing or unknown", body = ErrorResponse),
        (status = 401, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn change_status(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(parcel_id): Path<String>,
    JsonBody(req): JsonBody<ChangeStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = service.change_status(&caller, &parcel_id, req.status.as_deref()).await?;
    Ok(Json(OrderResponse { success: true, data: order }))
}

#[utoipa::path(
    put,
    path = "/parcels/{parcel_id}/presentLocation",
    request_body = ChangePresentLocationRequest,
    params(
        ("parcel_id" = String, Path, description = "ID of the order")
    ),
    responses(
        (status = 200, description = "Present location changed", body = OrderResponse),
        (status = 400, description = "Present location missing", body = ErrorResponse),
        (status = 401, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn change_present_location(
    State(service): State<Arc<ParcelService>>,
    Extension(caller): Extension<User>,
    Path(parcel_id): Path<String>,
    JsonBody(req): JsonBody<ChangePresentLocationRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = service
        .change_present_location(&caller, &parcel_id, req.present_location.as_deref())
        .await?;
    Ok(Json(OrderResponse { success: true, data: order }))
}
