use crate::auth::jwt::{Claims, JwtService};
use crate::auth::password::PasswordHasher;
use crate::core::errors::{OrderAction, SendItError};
use crate::core::models::{
    order::{NewOrder, Order, OrderPatch, OrderStatus},
    user::{NewUser, Role, User},
};
use crate::core::validation::{non_blank, normalize_email, require, validate_email, validate_password};
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const MSG_DESCRIPTION: &str = "Please add a description";
pub const MSG_PICKUP: &str = "Please add Pickup address";
pub const MSG_DESTINATION: &str = "Please add destination";
pub const MSG_RECIPIENT: &str = "Please add recipient name";
pub const MSG_PHONE: &str = "Please add phone number";
pub const MSG_STATUS: &str = "Please add a valid status";
pub const MSG_PRESENT_LOCATION: &str = "Please add present location";
pub const MSG_ADMIN_SIGNUP: &str = "Registering as an admin is not allowed";

/// Registration, login and every parcel operation, with the ownership and
/// role rules applied before anything is written.
pub struct ParcelService {
    storage: Arc<dyn Storage>,
    jwt_service: JwtService,
    hasher: PasswordHasher,
    allow_admin_signup: bool,
}

impl ParcelService {
    pub fn new(storage: Arc<dyn Storage>, jwt_secret: String, jwt_ttl_secs: u64, bcrypt_cost: u32) -> Self {
        ParcelService {
            storage,
            jwt_service: JwtService::new(jwt_secret, jwt_ttl_secs),
            hasher: PasswordHasher::new(bcrypt_cost),
            allow_admin_signup: true,
        }
    }

    /// Whether `register` accepts `role: admin`.
    pub fn with_admin_signup(mut self, allow: bool) -> Self {
        self.allow_admin_signup = allow;
        self
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, SendItError> {
        self.jwt_service.validate_token(token)
    }

    /// Resolves a bearer token to the user it was issued for.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, SendItError> {
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| SendItError::NotAuthenticated)?;
        self.storage
            .get_user(user_id)
            .await?
            .ok_or(SendItError::NotAuthenticated)
    }

    fn issue_token(&self, user: &User) -> Result<String, SendItError> {
        self.jwt_service.generate_token(&user.id.to_string(), user.role.as_str())
    }

    pub async fn register(&self, new_user: NewUser) -> Result<(User, String), SendItError> {
        let first_name = require(new_user.first_name.as_deref(), "Please add a first name")?;
        let last_name = require(new_user.last_name.as_deref(), "Please add a last name")?;
        let email = require(new_user.email.as_deref(), "Please add an email")?;
        let password = new_user
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| SendItError::MissingField("Please add a password".to_string()))?;

        let email = normalize_email(&email);
        validate_email(&email)?;
        validate_password(&password)?;
        let role = match new_user.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(r) => Role::parse(r).ok_or_else(|| SendItError::InvalidInput("Please add a valid role".to_string()))?,
        };
        if role == Role::Admin && !self.allow_admin_signup {
            warn!("Rejected admin self-registration");
            return Err(SendItError::InvalidInput(MSG_ADMIN_SIGNUP.to_string()));
        }

        if self.storage.get_user_by_email(&email).await?.is_some() {
            return Err(SendItError::EmailAlreadyRegistered(email));
        }

        let now = Utc::now();
        let user = self
            .storage
            .create_user(User {
                id: Uuid::new_v4(),
                first_name,
                last_name,
                email,
                role,
                password: self.hasher.hash(&password)?,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(user_id = %user.id, role = %user.role, "User registered");

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, email: Option<&str>, password: Option<&str>) -> Result<String, SendItError> {
        let (email, password) = match (email.map(str::trim), password) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (normalize_email(e), p),
            _ => return Err(SendItError::MissingCredentials),
        };

        let Some(user) = self.storage.get_user_by_email(&email).await? else {
            self.hasher.verify_dummy(password)?;
            warn!("Login failed: unknown email");
            return Err(SendItError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password)? {
            warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(SendItError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_token(&user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, SendItError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| SendItError::UserNotFound(user_id.to_string()))
    }

    pub async fn list_orders(&self, caller: &User) -> Result<Vec<Order>, SendItError> {
        if !caller.is_admin() {
            warn!(user_id = %caller.id, "Non-admin attempted to list all orders");
            return Err(SendItError::NotAuthorizedToList(caller.id.to_string()));
        }
        self.storage.list_orders().await
    }

    /// Orders owned by `user_id`; only that user or an admin may ask.
    pub async fn list_user_orders(&self, caller: &User, user_id: &str) -> Result<Vec<Order>, SendItError> {
        let owner = match Uuid::parse_str(user_id) {
            Ok(id) if id == caller.id || caller.is_admin() => id,
            _ => {
                warn!(user_id = %caller.id, requested = user_id, "Denied listing another user's orders");
                return Err(SendItError::NotAuthorizedToList(user_id.to_string()));
            }
        };
        self.storage.list_orders_by_user(owner).await
    }

    /// Path ids that are not UUIDs cannot name a row, so they are reported as not found.
    async fn fetch_order(&self, order_id: &str) -> Result<Order, SendItError> {
        let not_found = || SendItError::OrderNotFound(order_id.to_string());
        let id = Uuid::parse_str(order_id).map_err(|_| not_found())?;
        self.storage.get_order(id).await?.ok_or_else(not_found)
    }

    fn deny(caller: &User, order: &Order, action: OrderAction) -> SendItError {
        warn!(user_id = %caller.id, order_id = %order.id, %action, "Order access denied");
        SendItError::NotAuthorized {
            user_id: caller.id.to_string(),
            action,
        }
    }

    fn ensure_owner_or_admin(caller: &User, order: &Order, action: OrderAction) -> Result<(), SendItError> {
        if order.is_owned_by(caller.id) || caller.is_admin() {
            Ok(())
        } else {
            Err(Self::deny(caller, order, action))
        }
    }

    fn ensure_owner(caller: &User, order: &Order) -> Result<(), SendItError> {
        if order.is_owned_by(caller.id) {
            Ok(())
        } else {
            Err(Self::deny(caller, order, OrderAction::Update))
        }
    }

    fn ensure_admin(caller: &User, order: &Order) -> Result<(), SendItError> {
        if caller.is_admin() {
            Ok(())
        } else {
            Err(Self::deny(caller, order, OrderAction::Update))
        }
    }

    async fn save(&self, mut order: Order) -> Result<Order, SendItError> {
        order.updated_at = Utc::now();
        let id = order.id;
        self.storage
            .update_order(order)
            .await?
            .ok_or_else(|| SendItError::OrderNotFound(id.to_string()))
    }

    pub async fn get_order(&self, caller: &User, order_id: &str) -> Result<Order, SendItError> {
        let order = self.fetch_order(order_id).await?;
        Self::ensure_owner_or_admin(caller, &order, OrderAction::View)?;
        Ok(order)
    }

    pub async fn create_order(&self, caller: &User, new_order: NewOrder) -> Result<Order, SendItError> {
        let description = require(new_order.description.as_deref(), MSG_DESCRIPTION)?;
        let pickup_location = require(new_order.pickup_location.as_deref(), MSG_PICKUP)?;
        let destination = require(new_order.destination.as_deref(), MSG_DESTINATION)?;
        let recipient_name = require(new_order.recipient_name.as_deref(), MSG_RECIPIENT)?;
        let phone = require(new_order.phone.as_deref(), MSG_PHONE)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            description,
            present_location: Some(pickup_location.clone()),
            pickup_location,
            destination,
            recipient_name,
            phone,
            user: caller.id,
            status: OrderStatus::InTransit,
            created_at: now,
            updated_at: now,
        };
        let order = self.storage.create_order(order).await?;
        info!(order_id = %order.id, user_id = %caller.id, "Order created");
        Ok(order)
    }

    /// Owner or admin may patch the general fields; a changed destination
    /// still requires the owner.
    pub async fn update_order(&self, caller: &User, order_id: &str, patch: OrderPatch) -> Result<Order, SendItError> {
        let mut order = self.fetch_order(order_id).await?;
        Self::ensure_owner_or_admin(caller, &order, OrderAction::Update)?;

        let description = non_blank(patch.description.as_deref(), MSG_DESCRIPTION)?;
        let pickup_location = non_blank(patch.pickup_location.as_deref(), MSG_PICKUP)?;
        let destination = non_blank(patch.destination.as_deref(), MSG_DESTINATION)?;
        let recipient_name = non_blank(patch.recipient_name.as_deref(), MSG_RECIPIENT)?;
        let phone = non_blank(patch.phone.as_deref(), MSG_PHONE)?;

        if let Some(destination) = destination {
            if destination != order.destination {
                Self::ensure_owner(caller, &order)?;
                order.destination = destination;
            }
        }
        if let Some(description) = description {
            order.description = description;
        }
        if let Some(pickup_location) = pickup_location {
            order.pickup_location = pickup_location;
        }
        if let Some(recipient_name) = recipient_name {
            order.recipient_name = recipient_name;
        }
        if let Some(phone) = phone {
            order.phone = phone;
        }

        let order = self.save(order).await?;
        info!(order_id = %order.id, user_id = %caller.id, "Order updated");
        Ok(order)
    }

    pub async fn cancel_order(&self, caller: &User, order_id: &str) -> Result<(), SendItError> {
        let order = self.fetch_order(order_id).await?;
        Self::ensure_owner_or_admin(caller, &order, OrderAction::Delete)?;

        if !self.storage.delete_order(order.id).await? {
            return Err(SendItError::OrderNotFound(order_id.to_string()));
        }
        info!(order_id = %order.id, user_id = %caller.id, "Order cancelled");
        Ok(())
    }

    pub async fn change_destination(
        &self,
        caller: &User,
        order_id: &str,
        destination: Option<&str>,
    ) -> Result<Order, SendItError> {
        let mut order = self.fetch_order(order_id).await?;
        Self::ensure_owner(caller, &order)?;

        order.destination = require(destination, MSG_DESTINATION)?;
        let order = self.save(order).await?;
        info!(order_id = %order.id, destination = %order.destination, "Order destination changed");
        Ok(order)
    }

    pub async fn change_status(&self, caller: &User, order_id: &str, status: Option<&str>) -> Result<Order, SendItError> {
        let mut order = self.fetch_order(order_id).await?;
        Self::ensure_admin(caller, &order)?;

        order.status = status
            .map(str::trim)
            .and_then(OrderStatus::parse)
            .ok_or_else(|| SendItError::InvalidInput(MSG_STATUS.to_string()))?;
        let order = self.save(order).await?;
        info!(order_id = %order.id, status = %order.status, "Order status changed");
        Ok(order)
    }

    pub async fn change_present_location(
        &self,
        caller: &User,
        order_id: &str,
        present_location: Option<&str>,
    ) -> Result<Order, SendItError> {
        let mut order = self.fetch_order(order_id).await?;
        Self::ensure_admin(caller, &order)?;

        order.present_location = Some(require(present_location, MSG_PRESENT_LOCATION)?);
        let order = self.save(order).await?;
        info!(order_id = %order.id, "Order present location changed");
        Ok(order)
    }
}
