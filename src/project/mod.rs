mod task;

pub use task::{Task, UNTITLED_TASK, UNTITLED_TASK_DESCRIPTION, completion};

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};

/// Client-side id carried by a project until the server assigns a real one
pub const PLACEHOLDER_PROJECT_ID: i64 = 5000;

pub const PLACEHOLDER_PROJECT_NAME: &str = "Enter Project Title";
pub const PLACEHOLDER_PROJECT_DESCRIPTION: &str = "Enter project background";
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// A project and its task tree, in the wire shape the server speaks
/// (camelCase keys, `tasks` possibly JSON-encoded as a string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: i64,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, deserialize_with = "deserialize_tasks")]
    pub tasks: Vec<Task>,
}

/// The server stores the task tree as a TEXT column and returns it verbatim,
/// so `tasks` can arrive either as a JSON array or as a JSON-encoded string
/// containing one. Serialization always emits the array form.
fn deserialize_tasks<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTasks {
        Parsed(Vec<Task>),
        Encoded(String),
    }

    match Option::<RawTasks>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(RawTasks::Parsed(tasks)) => Ok(tasks),
        Some(RawTasks::Encoded(json)) => serde_json::from_str(&json).map_err(serde::de::Error::custom),
    }
}

impl Project {
    /// The project seeded on first run, before anything is saved server-side
    pub fn placeholder() -> Self {
        Self {
            project_id: PLACEHOLDER_PROJECT_ID,
            project_name: PLACEHOLDER_PROJECT_NAME.to_string(),
            project_description: PLACEHOLDER_PROJECT_DESCRIPTION.to_string(),
            updated_at: Local::now().format("%Y-%m-%d").to_string(),
            tasks: Vec::new(),
        }
    }

    /// True until the first successful create call swaps in a server id
    pub fn is_placeholder(&self) -> bool {
        self.project_id == PLACEHOLDER_PROJECT_ID
    }

    pub fn display_name(&self) -> &str {
        if self.project_name.trim().is_empty() {
            UNTITLED_PROJECT
        } else {
            &self.project_name
        }
    }

    pub fn display_description(&self) -> &str {
        if self.project_description.trim().is_empty() {
            PLACEHOLDER_PROJECT_DESCRIPTION
        } else {
            &self.project_description
        }
    }

    /// Percentage of completed tasks across the whole tree (0 when empty)
    pub fn completion_percent(&self) -> u8 {
        let (completed, total) = completion(&self.tasks);
        if total == 0 {
            0
        } else {
            (completed * 100 / total) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholder_project() {
        let project = Project::placeholder();
        assert!(project.is_placeholder());
        assert_eq!(project.project_name, PLACEHOLDER_PROJECT_NAME);
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_wire_keys_are_camel_case() {
        let project = Project::placeholder();
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("projectId").is_some());
        assert!(json.get("projectName").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("project_id").is_none());
    }

    #[test]
    fn test_tasks_deserialize_from_array() {
        let json = r#"{
            "projectId": 1,
            "projectName": "Over9k",
            "projectDescription": "A gaming platform",
            "updatedAt": "2026-01-01",
            "tasks": [{"name": "Design", "completed": true, "tasks": []}]
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert!(project.tasks[0].completed);
    }

    #[test]
    fn test_tasks_deserialize_from_encoded_string() {
        // get_projects returns the tasks column as raw TEXT
        let json = r#"{
            "projectId": 2,
            "projectName": "AfterMidnight",
            "projectDescription": "",
            "updatedAt": "2026-01-01",
            "tasks": "[{\"name\": \"Plan\", \"tasks\": [{\"name\": \"Venue\"}]}]"
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].tasks.len(), 1);
        assert_eq!(project.tasks[0].tasks[0].display_name(), "Venue");
    }

    #[test]
    fn test_tasks_deserialize_null_and_missing() {
        let with_null: Project =
            serde_json::from_str(r#"{"projectId": 3, "tasks": null}"#).unwrap();
        assert!(with_null.tasks.is_empty());

        let missing: Project = serde_json::from_str(r#"{"projectId": 4}"#).unwrap();
        assert!(missing.tasks.is_empty());
    }

    #[test]
    fn test_display_name_defaults_when_blank() {
        let mut project = Project::placeholder();
        project.project_name = "  ".to_string();
        assert_eq!(project.display_name(), UNTITLED_PROJECT);
    }

    #[test]
    fn test_completion_percent() {
        let json = r#"{
            "projectId": 5,
            "tasks": [
                {"completed": true, "tasks": [{"completed": false}]},
                {"completed": true}
            ]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.completion_percent(), 66);
    }
}
