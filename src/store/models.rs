use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do entry as it is stored under the `todos` key.
///
/// Field names are camelCase on the wire; any rename breaks existing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    /// Carried for storage compatibility; nothing reads or toggles it.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: String, title: &str, description: &str, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            completed: false,
        }
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

/// Pick an id derived from `now_ms` that no task in `existing` uses yet.
///
/// Two tasks created in the same millisecond get consecutive ids.
pub fn next_id(now_ms: i64, existing: &[Task]) -> String {
    let taken: HashSet<&str> = existing.iter().map(|t| t.id.as_str()).collect();
    let mut candidate = now_ms;
    loop {
        let id = candidate.to_string();
        if !taken.contains(id.as_str()) {
            return id;
        }
        candidate += 1;
    }
}
