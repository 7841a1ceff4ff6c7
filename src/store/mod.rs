//! In-memory project/task-tree state.
//!
//! The store owns the project list and every nested task list. Tree
//! mutations run synchronously against local state and then enqueue a
//! best-effort save of the whole active project; nothing waits for the
//! server, and a failed save is logged and dropped.

mod error;
pub mod path;

pub use error::StoreError;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::{ApiClient, ApiError};
use crate::project::{Project, Task};

/// Lifecycle of the initial project fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// A single-field change to a task node
#[derive(Debug, Clone)]
pub enum TaskEdit {
    Name(String),
    Description(String),
    Completed(bool),
}

/// Fields of a project that can be patched individually; `None` leaves the
/// current value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub updated_at: Option<String>,
    pub tasks: Option<Vec<Task>>,
}

/// Pushes project snapshots to the server without blocking the caller.
///
/// Each enqueue spawns an independent task; two saves issued back to back
/// can reach the server in either order, and the later arrival wins there.
#[derive(Clone)]
pub struct ProjectSaver {
    client: Arc<ApiClient>,
}

impl ProjectSaver {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn queue_update(&self, project: Project) {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            match client.update_project(&project).await {
                Ok(message) => debug!(project_id = project.project_id, %message, "project saved"),
                Err(e) => warn!(
                    project_id = project.project_id,
                    error = %e,
                    "background project save failed"
                ),
            }
        });
    }

    fn queue_delete(&self, project_id: i64) {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            if let Err(e) = client.delete_project(project_id).await {
                warn!(project_id, error = %e, "background project delete failed");
            }
        });
    }
}

#[derive(Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
    active_project_id: Option<i64>,
    status: FetchStatus,
    error: Option<String>,
    has_saved_projects: bool,
    saver: Option<ProjectSaver>,
}

impl ProjectStore {
    /// A store that mutates locally only; useful for tests and for callers
    /// that flush to the server themselves.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that pushes every tree mutation to the server in the background.
    pub fn with_saver(client: Arc<ApiClient>) -> Self {
        Self {
            saver: Some(ProjectSaver::new(client)),
            ..Self::default()
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_saved_projects(&self) -> bool {
        self.has_saved_projects
    }

    pub fn active_project_id(&self) -> Option<i64> {
        self.active_project_id
    }

    pub fn active_project(&self) -> Option<&Project> {
        let id = self.active_project_id?;
        self.projects.iter().find(|p| p.project_id == id)
    }

    fn active_project_mut(&mut self) -> Result<&mut Project, StoreError> {
        let id = self.active_project_id.ok_or(StoreError::ProjectNotFound)?;
        self.projects
            .iter_mut()
            .find(|p| p.project_id == id)
            .ok_or(StoreError::ProjectNotFound)
    }

    // ------------------------------------------------------------------
    // Initial fetch
    // ------------------------------------------------------------------

    /// Replaces the project list wholesale with the server's copy.
    pub async fn fetch_projects(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        self.status = FetchStatus::Loading;
        self.error = None;

        match client.get_projects().await {
            Ok(projects) => {
                self.apply_fetched(projects);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch projects");
                self.status = FetchStatus::Failed;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// State transition for a successful fetch. An empty result seeds the
    /// first-run placeholder project.
    pub fn apply_fetched(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.status = FetchStatus::Succeeded;

        if self.projects.is_empty() {
            self.projects.push(Project::placeholder());
            self.has_saved_projects = false;
        } else {
            self.has_saved_projects = true;
        }
        self.active_project_id = self.projects.first().map(|p| p.project_id);
    }

    // ------------------------------------------------------------------
    // Task tree mutations (active project)
    // ------------------------------------------------------------------

    /// Appends `task` to the list addressed by `path` (empty path targets
    /// the project's top-level list).
    pub fn add_task(&mut self, task_path: &[usize], task: Task) -> Result<(), StoreError> {
        let project = self.active_project_mut()?;
        path::resolve_tasks(&mut project.tasks, task_path)?.push(task);
        self.queue_active_project_save();
        Ok(())
    }

    /// Replaces one field on the task node at `path`.
    pub fn edit_task(&mut self, task_path: &[usize], edit: TaskEdit) -> Result<(), StoreError> {
        let (last, parent_path) = split_target(task_path)?;
        let project = self.active_project_mut()?;
        let parent = path::resolve_tasks(&mut project.tasks, parent_path)?;
        let task = parent.get_mut(last).ok_or(StoreError::TaskNotFound(last))?;

        match edit {
            TaskEdit::Name(name) => task.name = Some(name),
            TaskEdit::Description(description) => task.description = Some(description),
            TaskEdit::Completed(completed) => task.completed = completed,
        }
        self.queue_active_project_save();
        Ok(())
    }

    /// Removes the task node at `path` from its parent list.
    ///
    /// Siblings after the removed index shift down by one, so any path
    /// computed before the call and pointing past it is now stale.
    pub fn delete_task(&mut self, task_path: &[usize]) -> Result<Task, StoreError> {
        let (last, parent_path) = split_target(task_path)?;
        let project = self.active_project_mut()?;
        let parent = path::resolve_tasks(&mut project.tasks, parent_path)?;
        if last >= parent.len() {
            return Err(StoreError::TaskNotFound(last));
        }
        let removed = parent.remove(last);
        self.queue_active_project_save();
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Project list operations
    // ------------------------------------------------------------------

    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Swaps the client-side placeholder id for the server-assigned one
    /// after the first successful create call.
    pub fn replace_project_id(&mut self, fake_project_id: i64, real_project_id: i64) {
        if let Some(project) = self
            .projects
            .iter_mut()
            .find(|p| p.project_id == fake_project_id)
        {
            project.project_id = real_project_id;
        }
    }

    /// Merges only the supplied fields into the matching project; absent
    /// ids are silently ignored.
    pub fn update_project(&mut self, project_id: i64, update: ProjectUpdate) {
        let Some(project) = self.projects.iter_mut().find(|p| p.project_id == project_id) else {
            return;
        };
        if let Some(project_name) = update.project_name {
            project.project_name = project_name;
        }
        if let Some(project_description) = update.project_description {
            project.project_description = project_description;
        }
        if let Some(updated_at) = update.updated_at {
            project.updated_at = updated_at;
        }
        if let Some(tasks) = update.tasks {
            project.tasks = tasks;
        }
    }

    /// Removes the project locally; the server delete runs in the
    /// background and is skipped entirely for never-saved placeholders.
    pub fn delete_project(&mut self, project_id: i64) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.project_id == project_id)?;
        let removed = self.projects.remove(index);

        if let Some(saver) = &self.saver
            && !removed.is_placeholder()
        {
            saver.queue_delete(removed.project_id);
        }
        Some(removed)
    }

    pub fn set_active_project_id(&mut self, project_id: Option<i64>) {
        self.active_project_id = project_id;
    }

    pub fn mark_first_project_saved(&mut self) {
        self.has_saved_projects = true;
    }

    fn queue_active_project_save(&self) {
        if let (Some(saver), Some(project)) = (&self.saver, self.active_project()) {
            saver.queue_update(project.clone());
        }
    }
}

/// Splits a node-addressing path into its final index and parent path.
fn split_target(task_path: &[usize]) -> Result<(usize, &[usize]), StoreError> {
    match task_path.split_last() {
        Some((&last, parent)) => Ok((last, parent)),
        None => Err(StoreError::InvalidPath(
            "path must address a task, not the root list".to_string(),
        )),
    }
}
