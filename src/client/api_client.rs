//! HTTP client for the project and auth endpoints.
//!
//! One method per server resource; every call attaches the bearer token
//! from the shared [`SessionStore`] when one is present. Non-2xx responses
//! surface the server-supplied payload when the body carries one, the raw
//! transport error otherwise.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::session::{Session, SessionStore};
use crate::project::{Project, Task};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    /// The request never produced a usable response
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    email_address: String,
    plan: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub plan: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct ProjectEnvelope {
    project: Project,
}

#[derive(Debug, Serialize)]
struct CreateProjectRequest<'a> {
    project_name: &'a str,
    project_description: &'a str,
    tasks: &'a [Task],
}

#[derive(Debug, Deserialize)]
struct CreateProjectResponse {
    #[serde(rename = "projectId")]
    project_id: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct UpdateProjectRequest<'a> {
    project_id: i64,
    project_name: &'a str,
    project_description: &'a str,
    tasks: &'a [Task],
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent("minerva")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Logs in and stores the returned credentials for subsequent calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.send(request).await?;

        let session = Session {
            access_token: response.access_token,
            email_address: response.email_address,
            plan: response.plan,
        };
        if let Err(e) = self.session.set(session.clone()) {
            warn!(error = %e, "failed to persist session");
        }
        Ok(session)
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<String, ApiError> {
        let request = self.http.post(self.url("/auth/register")).json(registration);
        let response: MessageResponse = self.send(request).await?;
        Ok(response.message)
    }

    /// Logout is client-side only: the server keeps no logout endpoint,
    /// clearing the stored credentials is the whole operation.
    pub fn logout(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "failed to clear session");
        }
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Fetches every project for the logged-in user, task trees parsed.
    pub async fn get_projects(&self) -> Result<Vec<Project>, ApiError> {
        let request = self.authorized(self.http.get(self.url("/projects/get_projects")));
        let response: ProjectsResponse = self.send(request).await?;
        Ok(response.projects)
    }

    pub async fn get_project(&self, project_id: i64) -> Result<Project, ApiError> {
        let url = self.url(&format!("/projects/get_project/{project_id}"));
        let request = self.authorized(self.http.get(url));
        let response: ProjectEnvelope = self.send(request).await?;
        Ok(response.project)
    }

    /// Creates the project server-side and returns the assigned id.
    pub async fn create_project(&self, project: &Project) -> Result<i64, ApiError> {
        let body = CreateProjectRequest {
            project_name: &project.project_name,
            project_description: &project.project_description,
            tasks: &project.tasks,
        };
        let request = self
            .authorized(self.http.post(self.url("/projects/create_project")))
            .json(&body);
        let response: CreateProjectResponse = self.send(request).await?;

        debug!(project_id = response.project_id, message = %response.message, "project created");
        Ok(response.project_id)
    }

    /// Uploads the project's entire current state, task tree included.
    pub async fn update_project(&self, project: &Project) -> Result<String, ApiError> {
        let body = UpdateProjectRequest {
            project_id: project.project_id,
            project_name: &project.project_name,
            project_description: &project.project_description,
            tasks: &project.tasks,
        };
        let request = self
            .authorized(self.http.put(self.url("/projects/update_project")))
            .json(&body);
        let response: MessageResponse = self.send(request).await?;
        Ok(response.message)
    }

    pub async fn delete_project(&self, project_id: i64) -> Result<String, ApiError> {
        let url = self.url(&format!("/projects/delete_project?project_id={project_id}"));
        let request = self.authorized(self.http.delete(url));
        let response: MessageResponse = self.send(request).await?;
        Ok(response.message)
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.get() {
            Some(session) => request.bearer_auth(session.access_token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| extract_error_message(&body))
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ApiError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

/// Pulls the human-readable message out of an error body; the auth routes
/// answer with `{"message": ...}`, the project routes with `{"error": ...}`.
fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
