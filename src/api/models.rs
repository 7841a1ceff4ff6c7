use axum::{
    Json,
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::storage::ProjectRecord;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_plan")]
    pub plan: String,
}

fn default_plan() -> String {
    "free".to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub email_address: String,
    pub plan: String,
}

/// Auth routes answer plain-message bodies on both success and failure
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A project row in the wire shape the client expects: camelCase keys,
/// `tasks` passed through verbatim as the stored TEXT (or null).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub project_id: i64,
    pub project_name: String,
    pub project_description: String,
    pub updated_at: String,
    pub tasks: Option<String>,
}

impl From<ProjectRecord> for ProjectPayload {
    fn from(record: ProjectRecord) -> Self {
        Self {
            project_id: record.project_id,
            project_name: record.project_name,
            project_description: record.project_description,
            updated_at: record.updated_at,
            tasks: record.tasks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectPayload>,
}

#[derive(Debug, Serialize)]
pub struct ProjectEnvelope {
    pub project: ProjectPayload,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub tasks: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    #[serde(rename = "projectId")]
    pub project_id: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub tasks: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectQuery {
    pub project_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn internal(e: impl std::fmt::Display) -> Response<Body> {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(Self::new(e.to_string()))).into_response()
    }

    pub fn not_found(message: impl Into<String>) -> Response<Body> {
        (StatusCode::NOT_FOUND, Json(Self::new(message))).into_response()
    }

    pub fn bad_request(message: impl Into<String>) -> Response<Body> {
        (StatusCode::BAD_REQUEST, Json(Self::new(message))).into_response()
    }
}
