//! API request handlers for the inventory tracker

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inventory_common::{
    Category, CategoryDraft, CategoryPatch, Device, DeviceDraft, DevicePatch, Error, License,
    LicenseDraft, LicensePatch, UserSummary,
};
use inventory_store::DeleteAck;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::AuthUser;
use crate::AppState;

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AuthFailure => StatusCode::UNAUTHORIZED,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateId { .. } | Error::SequenceExhausted { .. } => StatusCode::CONFLICT,
            Error::WriteTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::CollectionCorrupt { .. }
            | Error::PasswordHash(_)
            | Error::JsonSerialization(_)
            | Error::Io(_)
            | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:#}", err);
            return ApiError::new(status, "Internal server error");
        }

        ApiError::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => rejection.status(),
        };
        ApiError::new(status, rejection.body_text())
    }
}

/// `Json` body extractor whose rejections use the API error shape
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Delete acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
}

impl DeleteResponse {
    fn from_ack(ack: DeleteAck, what: &str) -> Self {
        let message = if ack.existed {
            format!("{what} deleted successfully")
        } else {
            format!("{what} was already absent")
        };
        Self {
            success: ack.success,
            id: ack.id,
            message,
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "inventory-api"
    }))
}

/// Exchange username and password for a bearer token
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = match state
        .inventory
        .credentials
        .verify(&payload.username, &payload.password)
        .await
    {
        Ok(user) => user,
        Err(Error::AuthFailure) => {
            warn!("Failed login for user: {}", payload.username);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.jwt.issue(&user).map_err(|e| {
        error!("Failed to sign token: {}", e);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error during authentication",
        )
    })?;

    info!("User logged in: {}", user.username);
    Ok(Json(LoginResponse { token, user }))
}

/// List all devices
pub async fn list_devices_handler(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<Device>>, ApiError> {
    Ok(Json(state.inventory.devices.list().await?))
}

/// Get a device by id
pub async fn get_device_handler(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    Ok(Json(state.inventory.devices.get(&id).await?))
}

/// Register a new device
pub async fn create_device_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ApiJson(draft): ApiJson<DeviceDraft>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let device = state.inventory.devices.create(draft).await?;
    info!(
        "Device {} registered as {} by {}",
        device.id, device.inventory_number, claims.username
    );
    Ok((StatusCode::CREATED, Json(device)))
}

/// Update a device
pub async fn update_device_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<DevicePatch>,
) -> Result<Json<Device>, ApiError> {
    let device = state.inventory.devices.update(&id, patch).await?;
    info!("Device {} updated by {}", id, claims.username);
    Ok(Json(device))
}

/// Delete a device
pub async fn delete_device_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let ack = state.inventory.devices.delete(&id).await?;
    info!("Device {} deleted by {}", id, claims.username);
    Ok(Json(DeleteResponse::from_ack(ack, "Device")))
}

/// List all categories
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.inventory.categories.list().await?))
}

/// Get a category by id
pub async fn get_category_handler(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.inventory.categories.get(&id).await?))
}

/// Add a category
pub async fn create_category_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.inventory.categories.create(draft).await?;
    info!("Category {} created by {}", category.id, claims.username);
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
pub async fn update_category_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    let category = state.inventory.categories.update(&id, patch).await?;
    info!("Category {} updated by {}", id, claims.username);
    Ok(Json(category))
}

/// Delete a category; unknown ids are acknowledged
pub async fn delete_category_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let ack = state.inventory.categories.delete(&id).await?;
    info!("Category {} deleted by {}", id, claims.username);
    Ok(Json(DeleteResponse::from_ack(ack, "Category")))
}

/// List all licenses
pub async fn list_licenses_handler(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<License>>, ApiError> {
    Ok(Json(state.inventory.licenses.list().await?))
}

/// Get a license by id
pub async fn get_license_handler(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<License>, ApiError> {
    Ok(Json(state.inventory.licenses.get(&id).await?))
}

/// Add a license
pub async fn create_license_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ApiJson(draft): ApiJson<LicenseDraft>,
) -> Result<(StatusCode, Json<License>), ApiError> {
    let license = state.inventory.licenses.create(draft).await?;
    info!("License {} created by {}", license.id, claims.username);
    Ok((StatusCode::CREATED, Json(license)))
}

/// Update a license
pub async fn update_license_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<LicensePatch>,
) -> Result<Json<License>, ApiError> {
    let license = state.inventory.licenses.update(&id, patch).await?;
    info!("License {} updated by {}", id, claims.username);
    Ok(Json(license))
}

/// Delete a license
pub async fn delete_license_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let ack = state.inventory.licenses.delete(&id).await?;
    info!("License {} deleted by {}", id, claims.username);
    Ok(Json(DeleteResponse::from_ack(ack, "License")))
}
