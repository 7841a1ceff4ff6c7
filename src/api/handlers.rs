use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use super::AppState;
use super::auth::{self, AuthUser};
use super::models::{
    CreateProjectRequest, CreateProjectResponse, DeleteProjectQuery, ErrorResponse, LoginRequest,
    LoginResponse, MessageResponse, ProjectEnvelope, ProjectPayload, ProjectsResponse,
    RegisterRequest, UpdateProjectRequest,
};
use crate::storage::{NewUser, database};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let conn = state.db();

    match database::find_user(&conn, &req.email) {
        Ok(Some(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new("User already exists")),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => return ErrorResponse::internal(e),
    }

    let password_hash = auth::hash_password(&req.password);
    let user = NewUser {
        email: &req.email,
        password_hash: &password_hash,
        first_name: &req.first_name,
        last_name: &req.last_name,
        plan: &req.plan,
    };

    match database::insert_user(&conn, &user) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(MessageResponse::new("User registered successfully")),
        )
            .into_response(),
        Err(e) => ErrorResponse::internal(e),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let conn = state.db();

    let user = match database::find_user(&conn, &req.email) {
        Ok(user) => user,
        Err(e) => return ErrorResponse::internal(e),
    };

    let Some(user) = user.filter(|u| auth::verify_password(&req.password, &u.password_hash))
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new("Invalid credentials")),
        )
            .into_response();
    };

    let token = auth::mint_token();
    if let Err(e) = database::insert_session(&conn, &token, &user.email, auth::token_expiry()) {
        return ErrorResponse::internal(e);
    }

    debug!(email = %user.email, "login succeeded");

    (
        StatusCode::OK,
        Json(LoginResponse {
            access_token: token,
            email_address: user.email,
            plan: user.plan,
        }),
    )
        .into_response()
}

pub async fn get_projects(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> impl IntoResponse {
    let conn = state.db();

    match database::list_projects(&conn, &email) {
        Ok(records) => {
            let response = ProjectsResponse {
                projects: records.into_iter().map(ProjectPayload::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ErrorResponse::internal(e),
    }
}

pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(_email): AuthUser,
    Path(project_id): Path<i64>,
) -> impl IntoResponse {
    let conn = state.db();

    match database::get_project(&conn, project_id) {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(ProjectEnvelope {
                project: ProjectPayload::from(record),
            }),
        )
            .into_response(),
        Ok(None) => ErrorResponse::not_found("Project not found"),
        Err(e) => ErrorResponse::internal(e),
    }
}

pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    let (Some(project_name), Some(project_description)) = (
        req.project_name.filter(|s| !s.is_empty()),
        req.project_description.filter(|s| !s.is_empty()),
    ) else {
        return ErrorResponse::bad_request("Missing required fields");
    };

    // The tree is stored exactly as one JSON-encoded TEXT value
    let tasks = req.tasks.as_ref().map(|value| value.to_string());

    let conn = state.db();
    match database::insert_project(
        &conn,
        &email,
        &project_name,
        &project_description,
        tasks.as_deref(),
    ) {
        Ok(project_id) => (
            StatusCode::CREATED,
            Json(CreateProjectResponse {
                project_id,
                message: "Project created successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => ErrorResponse::internal(e),
    }
}

pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(_email): AuthUser,
    Json(req): Json<UpdateProjectRequest>,
) -> impl IntoResponse {
    let Some(project_id) = req.project_id else {
        return ErrorResponse::bad_request("Missing project_id");
    };

    let tasks = req.tasks.as_ref().map(|value| value.to_string());

    let conn = state.db();
    match database::update_project(
        &conn,
        project_id,
        req.project_name.as_deref(),
        req.project_description.as_deref(),
        tasks.as_deref(),
    ) {
        Ok(changed) => {
            if !changed {
                debug!(project_id, "update matched no live project");
            }
            (
                StatusCode::OK,
                Json(MessageResponse::new("Project updated successfully")),
            )
                .into_response()
        }
        Err(e) => ErrorResponse::internal(e),
    }
}

pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Query(query): Query<DeleteProjectQuery>,
) -> impl IntoResponse {
    let conn = state.db();

    match database::soft_delete_project(&conn, query.project_id, &email) {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse::new("Project deleted successfully")),
        )
            .into_response(),
        Ok(false) => ErrorResponse::not_found("Project not found"),
        Err(e) => ErrorResponse::internal(e),
    }
}
