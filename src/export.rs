use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::store::Task;

/// Write `tasks` as pretty JSON to `path`, creating parent directories.
/// Returns the number of tasks written.
pub fn export_tasks(tasks: &[Task], path: &Path) -> Result<usize> {
    let export = serde_json::json!({
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "count": tasks.len(),
        "tasks": tasks,
    });
    let json = serde_json::to_string_pretty(&export)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, &json).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(count = tasks.len(), path = %path.display(), "tasks exported");
    Ok(tasks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn writes_tasks_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("export.json");
        let tasks = vec![
            Task::new("2".into(), "Call Bob", "", Utc::now()),
            Task::new("1".into(), "Buy milk", "2%", Utc::now()),
        ];

        assert_eq!(export_tasks(&tasks, &path).unwrap(), 2);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["tasks"][0]["title"], "Call Bob");
        assert_eq!(value["tasks"][1]["description"], "2%");
        assert!(value["exportedAt"].is_string());
    }

    #[test]
    fn empty_list_exports_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        assert_eq!(export_tasks(&[], &path).unwrap(), 0);
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tasks"], serde_json::json!([]));
    }
}
