//! HTTP request handlers for the file input service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::control::{ChangeEvent, ControlSnapshot, ControlStore, FileInputControl, Platform};
use crate::error::ConfigError;
use crate::processing::validate;
use crate::types::{FileInputAttributes, PartitionResult, SelectedFile, ServiceConfig};

/// Application state shared across handlers.
pub struct AppState {
    pub controls: RwLock<ControlStore>,
    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            controls: RwLock::new(ControlStore::new()),
            config,
        }
    }
}

/// Error body returned with 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

/// Handler failure.
#[derive(Debug)]
pub enum ApiError {
    Config(ConfigError),
    ControlNotFound(Uuid),
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        ApiError::Config(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Config(e) => {
                warn!(error = %e, "Rejected configuration");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        field: Some(e.field()),
                        error: e.to_string(),
                    },
                )
            }
            ApiError::ControlNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: format!("Unknown control: {}", id),
                    field: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// One-shot validation request.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub files: Vec<SelectedFile>,
    #[serde(default)]
    pub attributes: FileInputAttributes,
}

/// Validate a file list against attributes without creating a control.
pub async fn validate_files(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<PartitionResult<SelectedFile>>, ApiError> {
    let config = state.config.resolve(&request.attributes)?;
    Ok(Json(validate(&request.files, &config.policy())))
}

/// Create control request.
#[derive(Debug, Deserialize)]
pub struct CreateControlRequest {
    #[serde(default)]
    pub attributes: FileInputAttributes,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub supports_directory: bool,
}

/// Create control response.
#[derive(Debug, Serialize)]
pub struct CreateControlResponse {
    pub control_id: Uuid,
    pub control: ControlSnapshot,
}

/// Create a hosted control.
pub async fn create_control(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateControlRequest>,
) -> Result<(StatusCode, Json<CreateControlResponse>), ApiError> {
    let config = state.config.resolve(&request.attributes)?;
    let platform = Platform::new(request.user_agent, request.supports_directory);
    let control = FileInputControl::new(config, platform);
    let snapshot = control.snapshot();

    let control_id = state.controls.write().await.insert(control);
    info!(%control_id, "Created control");

    Ok((
        StatusCode::CREATED,
        Json(CreateControlResponse {
            control_id,
            control: snapshot,
        }),
    ))
}

/// Get a control's current state.
pub async fn get_control(
    State(state): State<Arc<AppState>>,
    Path(control_id): Path<Uuid>,
) -> Result<Json<ControlSnapshot>, ApiError> {
    let store = state.controls.read().await;

    match store.get(control_id) {
        Some(record) => Ok(Json(record.control.snapshot())),
        None => Err(ApiError::ControlNotFound(control_id)),
    }
}

/// Attribute update request.
///
/// Attributes present in the body are set; names in `remove` are reset.
#[derive(Debug, Deserialize)]
pub struct UpdateControlRequest {
    #[serde(flatten)]
    pub attributes: FileInputAttributes,
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Change a control's attributes. A bad value leaves the control as it was.
pub async fn update_control(
    State(state): State<Arc<AppState>>,
    Path(control_id): Path<Uuid>,
    Json(request): Json<UpdateControlRequest>,
) -> Result<Json<ControlSnapshot>, ApiError> {
    let mut store = state.controls.write().await;
    let control = store
        .get_mut(control_id)
        .ok_or(ApiError::ControlNotFound(control_id))?;

    control.update_attributes(&request.attributes, &request.remove)?;
    info!(%control_id, "Updated control");

    Ok(Json(control.snapshot()))
}

/// Selection change request.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub files: Vec<SelectedFile>,
}

/// Selection change response.
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub changed: bool,
    pub event: Option<ChangeEvent>,
}

/// Feed a native selection into a control.
pub async fn select_files(
    State(state): State<Arc<AppState>>,
    Path(control_id): Path<Uuid>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let mut store = state.controls.write().await;
    let control = store
        .get_mut(control_id)
        .ok_or(ApiError::ControlNotFound(control_id))?;

    let event = control.handle_selection(request.files);

    Ok(Json(SelectionResponse {
        changed: event.is_some(),
        event,
    }))
}

/// Reset a control.
pub async fn reset_control(
    State(state): State<Arc<AppState>>,
    Path(control_id): Path<Uuid>,
) -> Result<Json<ControlSnapshot>, ApiError> {
    let mut store = state.controls.write().await;
    let control = store
        .get_mut(control_id)
        .ok_or(ApiError::ControlNotFound(control_id))?;

    control.reset();
    Ok(Json(control.snapshot()))
}

/// Tear down a control.
pub async fn delete_control(
    State(state): State<Arc<AppState>>,
    Path(control_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.controls.write().await;

    match store.remove(control_id) {
        Some(_) => {
            info!(%control_id, "Removed control");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::ControlNotFound(control_id)),
    }
}
