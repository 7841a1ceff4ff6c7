//! Path resolution over nested task lists.
//!
//! A path is a sequence of indices descending through `tasks` fields from a
//! project's root list: the empty path addresses the root list itself, and
//! each index steps into that child's own `tasks` list. Resolution is pure —
//! it never mutates and never retains references across calls, so a path is
//! only as fresh as the tree it was computed against.

use super::StoreError;
use crate::project::Task;

/// Resolves the task list addressed by `path` for mutation.
pub fn resolve_tasks<'a>(
    tasks: &'a mut Vec<Task>,
    path: &[usize],
) -> Result<&'a mut Vec<Task>, StoreError> {
    let mut current = tasks;
    for (step, &index) in path.iter().enumerate() {
        current = match current.get_mut(index) {
            Some(task) => &mut task.tasks,
            None => return Err(invalid_at(path, step)),
        };
    }
    Ok(current)
}

/// Read-only twin of [`resolve_tasks`].
pub fn resolve_tasks_ref<'a>(tasks: &'a [Task], path: &[usize]) -> Result<&'a [Task], StoreError> {
    let mut current = tasks;
    for (step, &index) in path.iter().enumerate() {
        current = match current.get(index) {
            Some(task) => &task.tasks,
            None => return Err(invalid_at(path, step)),
        };
    }
    Ok(current)
}

/// Looks up the task node a non-empty path points at.
pub fn task_at<'a>(tasks: &'a [Task], path: &[usize]) -> Result<&'a Task, StoreError> {
    let (last, parent_path) = path
        .split_last()
        .ok_or_else(|| StoreError::InvalidPath("path must not be empty".to_string()))?;
    let parent = resolve_tasks_ref(tasks, parent_path)?;
    parent.get(*last).ok_or(StoreError::TaskNotFound(*last))
}

/// Parses the CLI's dotted path syntax ("0.2.1"); empty input is the root.
pub fn parse_path(input: &str) -> Result<Vec<usize>, StoreError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split('.')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| StoreError::InvalidPath(format!("'{part}' is not a valid index")))
        })
        .collect()
}

fn invalid_at(path: &[usize], step: usize) -> StoreError {
    StoreError::InvalidPath(format!("index {} out of bounds at step {step}", path[step]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Vec<Task> {
        // 0: alpha
        //    0.0: alpha-a
        //    0.1: alpha-b
        //         0.1.0: alpha-b-deep
        // 1: beta
        let mut alpha = Task::new("alpha");
        alpha.tasks.push(Task::new("alpha-a"));
        let mut alpha_b = Task::new("alpha-b");
        alpha_b.tasks.push(Task::new("alpha-b-deep"));
        alpha.tasks.push(alpha_b);
        vec![alpha, Task::new("beta")]
    }

    #[test]
    fn test_empty_path_resolves_root_list() {
        let mut tree = sample_tree();
        let resolved = resolve_tasks(&mut tree, &[]).unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_resolution_matches_manual_walk() {
        let tree = sample_tree();

        // Manual walk to the same list the resolver should return
        let manual = &tree[0].tasks[1].tasks;
        let resolved = resolve_tasks_ref(&tree, &[0, 1]).unwrap();
        assert_eq!(resolved, manual.as_slice());

        let node = task_at(&tree, &[0, 1, 0]).unwrap();
        assert_eq!(node.display_name(), "alpha-b-deep");
    }

    #[test]
    fn test_out_of_bounds_fails_without_mutation() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let err = resolve_tasks(&mut tree, &[5]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));

        let err = resolve_tasks(&mut tree, &[0, 1, 0, 3]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));

        assert_eq!(tree, before);
    }

    #[test]
    fn test_task_at_rejects_empty_path() {
        let tree = sample_tree();
        assert!(matches!(
            task_at(&tree, &[]),
            Err(StoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(parse_path("").unwrap(), Vec::<usize>::new());
        assert_eq!(parse_path("0").unwrap(), vec![0]);
        assert_eq!(parse_path("0.2.1").unwrap(), vec![0, 2, 1]);
        assert!(matches!(
            parse_path("0.x.1"),
            Err(StoreError::InvalidPath(_))
        ));
        assert!(matches!(
            parse_path("-1"),
            Err(StoreError::InvalidPath(_))
        ));
    }
}
