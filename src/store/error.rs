/// Error type for task-tree operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("active project not found")]
    ProjectNotFound,
    #[error("task not found at index {0}")]
    TaskNotFound(usize),
}
