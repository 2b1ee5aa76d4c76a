use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{
        ChangeDestinationRequest, ChangePresentLocationRequest, ChangeStatusRequest, CreateOrderRequest, EmptyResponse,
        ErrorResponse, LoginRequest, OrderListResponse, OrderResponse, RegisterRequest, TokenResponse,
        UpdateOrderRequest, UserResponse,
    },
    core::models::{
        order::{Order, OrderStatus},
        user::{Role, User},
    },
};

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register,
        super::handlers::login,
        super::handlers::get_me,
        super::handlers::list_orders,
        super::handlers::list_user_orders,
        super::handlers::create_order,
        super::handlers::get_order,
        super::handlers::update_order,
        super::handlers::cancel_order,
        super::handlers::change_destination,
        super::handlers::change_status,
        super::handlers::change_present_location
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        CreateOrderRequest,
        UpdateOrderRequest,
        ChangeDestinationRequest,
        ChangeStatusRequest,
        ChangePresentLocationRequest,
        TokenResponse,
        UserResponse,
        OrderResponse,
        OrderListResponse,
        EmptyResponse,
        ErrorResponse,
        User,
        Role,
        Order,
        OrderStatus
    )),
    modifiers(&BearerSecurity),
    info(
        title = "SendIT API",
        description = "Parcel delivery orders: registration, login and order tracking",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
