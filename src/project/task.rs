use serde::{Deserialize, Serialize};

pub const UNTITLED_TASK: &str = "Untitled Task";
pub const UNTITLED_TASK_DESCRIPTION: &str = "Enter your task description";

/// A node in a project's task tree.
///
/// Tasks carry no identifier of their own: a task is addressed by its
/// position in the nested `tasks` lists, and that position is only
/// meaningful against the tree it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A freshly added task: everything unset, exactly as the tree editor
    /// creates them before the user types anything.
    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNTITLED_TASK,
        }
    }

    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => UNTITLED_TASK_DESCRIPTION,
        }
    }
}

/// Counts (completed, total) tasks across a whole tree.
pub fn completion(tasks: &[Task]) -> (usize, usize) {
    let mut completed = 0;
    let mut total = 0;
    for task in tasks {
        total += 1;
        if task.completed {
            completed += 1;
        }
        let (sub_completed, sub_total) = completion(&task.tasks);
        completed += sub_completed;
        total += sub_total;
    }
    (completed, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_untitled_task_defaults() {
        let task = Task::untitled();
        assert_eq!(task.name, None);
        assert!(!task.completed);
        assert!(task.tasks.is_empty());
        assert_eq!(task.display_name(), UNTITLED_TASK);
        assert_eq!(task.display_description(), UNTITLED_TASK_DESCRIPTION);
    }

    #[test]
    fn test_missing_fields_default_on_deserialize() {
        let task: Task = serde_json::from_str(r#"{"name": "Ship it"}"#).unwrap();
        assert_eq!(task.display_name(), "Ship it");
        assert!(!task.completed);
        assert!(task.tasks.is_empty());
    }

    #[test]
    fn test_blank_name_displays_as_untitled() {
        let task = Task::new("   ");
        assert_eq!(task.display_name(), UNTITLED_TASK);
    }

    #[test]
    fn test_completion_counts_nested_tasks() {
        let mut root = Task::new("root");
        root.completed = true;
        root.tasks.push(Task::new("child a"));
        let mut child_b = Task::new("child b");
        child_b.completed = true;
        child_b.tasks.push(Task::new("grandchild"));
        root.tasks.push(child_b);

        assert_eq!(completion(std::slice::from_ref(&root)), (2, 4));
        assert_eq!(completion(&[]), (0, 0));
    }
}
