//! The HTTP API server: auth and project CRUD over a shared SQLite handle.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::create_router;

use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    pub(crate) fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().expect("database mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiClient, ApiError, RegisterRequest, SessionStore};
    use crate::project::{Project, Task};
    use crate::storage::database;
    use reqwest::StatusCode;

    async fn spawn_test_server() -> String {
        let conn = Connection::open_in_memory().unwrap();
        database::init_database(&conn).unwrap();

        let router = create_router(AppState::new(conn));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn registration() -> RegisterRequest {
        RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "s3cret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            plan: "free".to_string(),
        }
    }

    #[tokio::test]
    async fn test_project_routes_require_auth() {
        let base_url = spawn_test_server().await;
        let client = ApiClient::new(base_url, SessionStore::in_memory()).unwrap();

        let err = client.get_projects().await.unwrap_err();
        assert!(
            matches!(err, ApiError::Api { status, .. } if status == StatusCode::UNAUTHORIZED)
        );
    }

    #[tokio::test]
    async fn test_register_login_and_project_round_trip() {
        let base_url = spawn_test_server().await;
        let client = ApiClient::new(base_url, SessionStore::in_memory()).unwrap();

        client.register(&registration()).await.unwrap();

        // Duplicate registration surfaces the server's message
        let err = client.register(&registration()).await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");

        let err = client.login("ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let session = client.login("ada@example.com", "s3cret").await.unwrap();
        assert_eq!(session.email_address, "ada@example.com");
        assert_eq!(session.plan, "free");

        // Create a project with one task
        let mut project = Project::placeholder();
        project.project_name = "Over9k".to_string();
        project.project_description = "A gaming platform".to_string();
        project.tasks.push(Task::new("Design"));

        let project_id = client.create_project(&project).await.unwrap();
        project.project_id = project_id;

        // Listing parses the tree back out of the TEXT column
        let projects = client.get_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project_id, project_id);
        assert_eq!(projects[0].tasks.len(), 1);
        assert_eq!(projects[0].tasks[0].display_name(), "Design");

        // Upload a grown tree, read it back by id
        project.tasks.push(Task::new("Build"));
        client.update_project(&project).await.unwrap();
        let fetched = client.get_project(project_id).await.unwrap();
        assert_eq!(fetched.tasks.len(), 2);

        // Soft delete hides the project from both lookups
        client.delete_project(project_id).await.unwrap();
        assert!(client.get_projects().await.unwrap().is_empty());
        let err = client.get_project(project_id).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_store_mutations_persist_in_background() {
        let base_url = spawn_test_server().await;
        let client = Arc::new(ApiClient::new(base_url, SessionStore::in_memory()).unwrap());

        client.register(&registration()).await.unwrap();
        client.login("ada@example.com", "s3cret").await.unwrap();

        let mut project = Project::placeholder();
        project.project_name = "Over9k".to_string();
        project.project_description = "A gaming platform".to_string();
        let project_id = client.create_project(&project).await.unwrap();

        let mut store = crate::store::ProjectStore::with_saver(Arc::clone(&client));
        store.fetch_projects(client.as_ref()).await.unwrap();
        assert_eq!(store.active_project_id(), Some(project_id));

        store.add_task(&[], Task::new("Design")).unwrap();

        // The save is fire-and-forget; poll until it lands server-side
        let mut saved = false;
        for _ in 0..200 {
            if client.get_project(project_id).await.unwrap().tasks.len() == 1 {
                saved = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(25)).await;
        }
        assert!(saved, "background save never reached the server");
    }

    #[tokio::test]
    async fn test_create_project_validates_required_fields() {
        let base_url = spawn_test_server().await;
        let client = ApiClient::new(base_url, SessionStore::in_memory()).unwrap();

        client.register(&registration()).await.unwrap();
        client.login("ada@example.com", "s3cret").await.unwrap();

        let empty = Project {
            project_id: 0,
            project_name: String::new(),
            project_description: String::new(),
            updated_at: String::new(),
            tasks: Vec::new(),
        };
        let err = client.create_project(&empty).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Api { status, .. } if status == StatusCode::BAD_REQUEST)
        );
    }
}
