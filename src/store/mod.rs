mod error;
mod kv;
mod models;

pub use error::{StorageError, TaskError};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use models::{Task, next_id};

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;

use crate::appearance::HostAppearance;
use crate::confirm::ClearConfirmation;
use crate::notify::Notice;
use crate::search;

/// Storage key holding the JSON task list.
pub const TASKS_KEY: &str = "todos";
/// Storage key holding `"true"` / `"false"`.
pub const THEME_KEY: &str = "darkMode";
pub const TITLE_MAX_CHARS: usize = 100;

const SAVE_TASKS_FAILED: &str = "Failed to save tasks. Your changes may not persist.";
const SAVE_THEME_FAILED: &str = "Failed to save theme preference.";
const STORAGE_UNAVAILABLE: &str =
    "Failed to load tasks and theme. Changes will not be saved this session.";

/// Open and migrate the `SQLite` database at `path`. If it cannot be used,
/// fall back to process memory and return a notice saying so.
pub fn open_backend(path: &Path) -> (Box<dyn KeyValueStore>, Option<Notice>) {
    let opened = SqliteStore::open_at(path).and_then(|store| {
        store.migrate()?;
        Ok(store)
    });
    match opened {
        Ok(store) => (Box::new(store), None),
        Err(e) => {
            tracing::error!(path = %path.display(), "failed to open task storage: {:#}", e);
            (
                Box::new(MemoryStore::default()),
                Some(Notice::error(STORAGE_UNAVAILABLE)),
            )
        }
    }
}

/// Owner of the canonical task list, its filtered projection and the theme flag.
///
/// Every mutation goes through one of the methods below; each persists the
/// full list and re-derives the filtered view before returning. A failed
/// write is reported but never rolls back the in-memory change.
pub struct TaskStore {
    backend: Box<dyn KeyValueStore>,
    tasks: Vec<Task>,
    visible: Vec<Task>,
    search_term: String,
    dark_mode: bool,
}

impl TaskStore {
    /// Read the persisted list and theme. Never fails: unreadable or
    /// malformed data starts an empty list and yields a notice to show.
    pub fn load(
        backend: Box<dyn KeyValueStore>,
        appearance: &dyn HostAppearance,
    ) -> (Self, Option<Notice>) {
        let (tasks, tasks_ok) = match read_tasks(backend.as_ref()) {
            Ok(tasks) => (tasks, true),
            Err(e) => {
                tracing::error!(error = %e, "failed to load tasks, starting empty");
                (Vec::new(), false)
            }
        };

        let (dark_mode, theme_ok) = match backend.get(THEME_KEY) {
            Ok(Some(flag)) => (flag == "true", true),
            Ok(None) => (appearance.prefers_dark(), true),
            Err(e) => {
                tracing::error!(error = %e, "failed to load theme preference");
                (appearance.prefers_dark(), false)
            }
        };

        let notice = match (tasks_ok, theme_ok) {
            (true, true) => None,
            (false, true) => Some(Notice::error(
                "Failed to load tasks. Starting with an empty list.",
            )),
            (true, false) => Some(Notice::error("Failed to load theme preference.")),
            (false, false) => Some(Notice::error("Failed to load tasks and theme.")),
        };

        tracing::info!(count = tasks.len(), dark_mode, "store loaded");
        let store = TaskStore {
            backend,
            visible: tasks.clone(),
            tasks,
            search_term: String::new(),
            dark_mode,
        };
        (store, notice)
    }

    // ── Queries ──

    /// The canonical list, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The canonical list restricted to the active search term.
    pub fn visible(&self) -> &[Task] {
        &self.visible
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    // ── Mutations ──

    pub fn create(&mut self, title: &str, description: &str) -> Result<Notice, TaskError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(TaskError::TitleTooLong {
                max: TITLE_MAX_CHARS,
            });
        }

        let now = Utc::now();
        let task = Task::new(
            next_id(now.timestamp_millis(), &self.tasks),
            title,
            description.trim(),
            now,
        );
        tracing::info!(id = %task.id, "task created");
        self.tasks.insert(0, task);

        Ok(self.commit(Notice::success("Task added successfully!")))
    }

    /// Remove the task with `id`. Unknown ids are ignored and report nothing.
    pub fn delete(&mut self, id: &str) -> Option<Notice> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(pos);
        tracing::info!(id = %removed.id, "task deleted");
        Some(self.commit(Notice::success(format!(
            "Task \"{}\" deleted",
            removed.title
        ))))
    }

    pub fn clear_all(&mut self, _confirmed: ClearConfirmation) -> Notice {
        tracing::info!(count = self.tasks.len(), "clearing all tasks");
        self.tasks.clear();
        self.commit(Notice::success("All tasks have been cleared!"))
    }

    pub fn set_search(&mut self, term: &str) {
        term.clone_into(&mut self.search_term);
        self.refilter();
    }

    pub fn toggle_theme(&mut self) -> Option<Notice> {
        self.set_dark_mode(!self.dark_mode)
    }

    /// Update the theme flag and save it. Returns a notice only if saving failed.
    pub fn set_dark_mode(&mut self, dark: bool) -> Option<Notice> {
        self.dark_mode = dark;
        let value = if dark { "true" } else { "false" };
        match self.backend.set(THEME_KEY, value) {
            Ok(()) => None,
            Err(source) => {
                let err = TaskError::Write {
                    key: THEME_KEY,
                    source,
                };
                tracing::warn!(error = %err, "failed to save theme preference");
                Some(Notice::warning(SAVE_THEME_FAILED))
            }
        }
    }

    /// Write the full canonical list under [`TASKS_KEY`].
    pub fn persist(&mut self) -> Result<(), TaskError> {
        let blob = encode_tasks(&self.tasks)?;
        self.backend
            .set(TASKS_KEY, &blob)
            .map_err(|source| TaskError::Write {
                key: TASKS_KEY,
                source,
            })
    }

    fn refilter(&mut self) {
        self.visible = search::filter(&self.search_term, &self.tasks);
    }

    /// Re-derive, persist, and pick the notice to show: the operation's own
    /// confirmation, or the save failure if the write did not go through.
    fn commit(&mut self, confirmation: Notice) -> Notice {
        self.refilter();
        match self.persist() {
            Ok(()) => confirmation,
            Err(e) => {
                tracing::error!(error = %e, "failed to save tasks");
                Notice::error(SAVE_TASKS_FAILED)
            }
        }
    }
}

fn read_tasks(backend: &dyn KeyValueStore) -> Result<Vec<Task>, TaskError> {
    let blob = backend
        .get(TASKS_KEY)
        .map_err(|source| TaskError::Read {
            key: TASKS_KEY,
            source,
        })?;
    match blob {
        Some(blob) if !blob.trim().is_empty() => decode_tasks(&blob),
        _ => Ok(Vec::new()),
    }
}

pub fn encode_tasks(tasks: &[Task]) -> Result<String, TaskError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parse a stored task list and check the invariants every stored task holds.
pub fn decode_tasks(blob: &str) -> Result<Vec<Task>, TaskError> {
    let tasks: Vec<Task> = serde_json::from_str(blob)?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if task.title.trim().is_empty() {
            return Err(TaskError::InvalidRecord(format!(
                "task {} has an empty title",
                task.id
            )));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(TaskError::InvalidRecord(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ClearGate;
    use crate::notify::NoticeKind;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    struct Appearance(bool);

    impl HostAppearance for Appearance {
        fn prefers_dark(&self) -> bool {
            self.0
        }
    }

    /// Backend sharing its map with the test so writes can be inspected,
    /// with switchable read/write failures.
    #[derive(Clone, Default)]
    struct Shared {
        entries: Rc<RefCell<HashMap<String, String>>>,
        fail_reads: bool,
        fail_writes: Rc<RefCell<bool>>,
    }

    impl Shared {
        fn raw(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }
    }

    impl KeyValueStore for Shared {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Unavailable("read refused".into()));
            }
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if *self.fail_writes.borrow() {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn empty_store() -> TaskStore {
        TaskStore::load(Box::new(MemoryStore::default()), &Appearance(false)).0
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn confirmation() -> ClearConfirmation {
        let mut gate = ClearGate::default();
        gate.open();
        gate.toggle_acknowledged();
        gate.confirm().unwrap()
    }

    #[test]
    fn create_prepends_and_reports_success() {
        let mut store = empty_store();
        let notice = store.create("Buy milk", "2%").unwrap();
        assert_eq!(notice, Notice::success("Task added successfully!"));

        store.create("Call Bob", "").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(titles(store.tasks()), vec!["Call Bob", "Buy milk"]);
        assert_ne!(store.tasks()[0].id, store.tasks()[1].id);
    }

    #[test]
    fn create_trims_title_and_description() {
        let mut store = empty_store();
        store.create("  Buy milk  ", "\t2%\n").unwrap();
        let task = &store.tasks()[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2%");
        assert!(!task.completed);
    }

    #[test]
    fn blank_title_is_rejected_without_change() {
        let mut store = empty_store();
        store.create("keep", "").unwrap();
        for title in ["", "   ", "\n\t"] {
            let err = store.create(title, "desc").unwrap_err();
            assert!(matches!(err, TaskError::EmptyTitle));
            assert!(err.is_validation());
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut store = empty_store();
        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(matches!(
            store.create(&long, ""),
            Err(TaskError::TitleTooLong { max: 100 })
        ));
        store.create(&"x".repeat(TITLE_MAX_CHARS), "").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = empty_store();
        store.create("a", "").unwrap();
        store.create("b", "").unwrap();
        let id = store.tasks()[1].id.clone();

        let notice = store.delete(&id).unwrap();
        assert_eq!(notice, Notice::success("Task \"a\" deleted"));
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut store = empty_store();
        store.create("a", "").unwrap();
        assert!(store.delete("nope").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_all_empties_list_and_view() {
        let mut store = empty_store();
        store.create("a", "").unwrap();
        store.create("b", "").unwrap();
        store.set_search("a");

        let notice = store.clear_all(confirmation());
        assert_eq!(notice.message, "All tasks have been cleared!");
        assert!(store.is_empty());
        assert!(store.visible().is_empty());
    }

    #[test]
    fn dismissed_gate_leaves_list_alone() {
        let mut store = empty_store();
        store.create("a", "").unwrap();

        let mut gate = ClearGate::default();
        gate.open();
        gate.toggle_acknowledged();
        gate.dismiss();
        if let Some(token) = gate.confirm() {
            store.clear_all(token);
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn view_follows_search_and_mutations() {
        let mut store = empty_store();
        store.create("Buy milk", "2%").unwrap();
        store.create("Call Bob", "").unwrap();

        store.set_search("milk");
        assert_eq!(titles(store.visible()), vec!["Buy milk"]);

        store.create("Milk the cow", "").unwrap();
        assert_eq!(titles(store.visible()), vec!["Milk the cow", "Buy milk"]);

        let id = store.visible()[1].id.clone();
        store.delete(&id);
        assert_eq!(titles(store.visible()), vec!["Milk the cow"]);

        store.set_search("  ");
        assert_eq!(store.visible(), store.tasks());
    }

    #[test]
    fn mutations_persist_full_list() {
        let backend = Shared::default();
        let (mut store, _) = TaskStore::load(Box::new(backend.clone()), &Appearance(false));
        store.create("Buy milk", "2%").unwrap();
        store.create("Call Bob", "").unwrap();

        let saved = decode_tasks(&backend.raw(TASKS_KEY).unwrap()).unwrap();
        assert_eq!(saved, store.tasks());

        store.clear_all(confirmation());
        assert_eq!(backend.raw(TASKS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn reload_round_trips_list() {
        let backend = Shared::default();
        let (mut store, _) = TaskStore::load(Box::new(backend.clone()), &Appearance(false));
        store.create("Buy milk", "2%").unwrap();
        store.create("Call Bob", "").unwrap();
        let before = store.tasks().to_vec();

        let (reloaded, notice) = TaskStore::load(Box::new(backend), &Appearance(false));
        assert!(notice.is_none());
        assert_eq!(reloaded.tasks(), before.as_slice());
        assert_eq!(reloaded.visible(), before.as_slice());
    }

    #[test]
    fn completed_flag_survives_round_trip() {
        let blob = r#"[{"id":"1","title":"done already","description":"","createdAt":"2024-01-01T00:00:00.000Z","completed":true}]"#;
        let tasks = decode_tasks(blob).unwrap();
        assert!(tasks[0].completed);
        assert_eq!(decode_tasks(&encode_tasks(&tasks).unwrap()).unwrap(), tasks);
    }

    #[test]
    fn malformed_blob_loads_empty_with_notice() {
        let backend = MemoryStore::default().with_entry(TASKS_KEY, "not json");
        let (store, notice) = TaskStore::load(Box::new(backend), &Appearance(false));
        assert!(store.is_empty());
        assert_eq!(notice.unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn invalid_records_load_empty_with_notice() {
        let dup = r#"[{"id":"1","title":"a","createdAt":"x"},{"id":"1","title":"b","createdAt":"x"}]"#;
        let blank = r#"[{"id":"1","title":"  ","createdAt":"x"}]"#;
        for blob in [dup, blank] {
            assert!(matches!(
                decode_tasks(blob),
                Err(TaskError::InvalidRecord(_))
            ));
            let backend = MemoryStore::default().with_entry(TASKS_KEY, blob);
            let (store, notice) = TaskStore::load(Box::new(backend), &Appearance(false));
            assert!(store.is_empty());
            assert!(notice.is_some());
        }
    }

    #[test]
    fn empty_blob_counts_as_first_run() {
        let backend = MemoryStore::default().with_entry(TASKS_KEY, "");
        let (store, notice) = TaskStore::load(Box::new(backend), &Appearance(false));
        assert!(store.is_empty());
        assert!(notice.is_none());
    }

    #[test]
    fn unreadable_backend_degrades_to_defaults() {
        let backend = Shared {
            fail_reads: true,
            ..Shared::default()
        };
        let (store, notice) = TaskStore::load(Box::new(backend), &Appearance(true));
        assert!(store.is_empty());
        assert!(store.dark_mode());
        assert_eq!(notice.unwrap().message, "Failed to load tasks and theme.");
    }

    #[test]
    fn failed_write_keeps_memory_state_and_reports() {
        let backend = Shared::default();
        let (mut store, _) = TaskStore::load(Box::new(backend.clone()), &Appearance(false));
        store.create("saved", "").unwrap();

        *backend.fail_writes.borrow_mut() = true;
        let notice = store.create("unsaved", "").unwrap();
        assert_eq!(notice, Notice::error(SAVE_TASKS_FAILED));
        assert_eq!(titles(store.tasks()), vec!["unsaved", "saved"]);

        let on_disk = decode_tasks(&backend.raw(TASKS_KEY).unwrap()).unwrap();
        assert_eq!(titles(&on_disk), vec!["saved"]);

        let id = store.tasks()[0].id.clone();
        assert_eq!(store.delete(&id).unwrap().kind, NoticeKind::Error);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn theme_defaults_to_host_preference() {
        let (dark, _) = TaskStore::load(Box::new(MemoryStore::default()), &Appearance(true));
        assert!(dark.dark_mode());
        let (light, _) = TaskStore::load(Box::new(MemoryStore::default()), &Appearance(false));
        assert!(!light.dark_mode());
    }

    #[test]
    fn saved_theme_beats_host_preference() {
        let backend = MemoryStore::default().with_entry(THEME_KEY, "false");
        let (store, _) = TaskStore::load(Box::new(backend), &Appearance(true));
        assert!(!store.dark_mode());

        let backend = MemoryStore::default().with_entry(THEME_KEY, "true");
        let (store, _) = TaskStore::load(Box::new(backend), &Appearance(false));
        assert!(store.dark_mode());
    }

    #[test]
    fn toggle_theme_persists_flag() {
        let backend = Shared::default();
        let (mut store, _) = TaskStore::load(Box::new(backend.clone()), &Appearance(false));
        assert!(store.toggle_theme().is_none());
        assert!(store.dark_mode());
        assert_eq!(backend.raw(THEME_KEY).as_deref(), Some("true"));

        store.toggle_theme();
        assert_eq!(backend.raw(THEME_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn toggle_theme_failure_keeps_new_flag() {
        let backend = Shared::default();
        *backend.fail_writes.borrow_mut() = true;
        let (mut store, _) = TaskStore::load(Box::new(backend), &Appearance(false));
        let notice = store.toggle_theme().unwrap();
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert_eq!(notice.message, SAVE_THEME_FAILED);
        assert!(store.dark_mode());
    }

    #[test]
    fn works_against_sqlite_backend() {
        let kv = SqliteStore::open_in_memory().unwrap();
        kv.migrate().unwrap();
        let (mut store, notice) = TaskStore::load(Box::new(kv), &Appearance(false));
        assert!(notice.is_none());
        assert_eq!(
            store.create("Buy milk", "").unwrap().kind,
            NoticeKind::Success
        );
    }

    #[test]
    fn unreadable_database_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("todolist.db");
        std::fs::write(&db, b"this is not an sqlite database, just bytes").unwrap();

        let (backend, open_notice) = open_backend(&db);
        let open_notice = open_notice.unwrap();
        assert_eq!(open_notice.kind, NoticeKind::Error);
        assert_eq!(open_notice.message, STORAGE_UNAVAILABLE);

        let (mut store, load_notice) = TaskStore::load(backend, &Appearance(false));
        assert!(load_notice.is_none());
        assert!(store.is_empty());
        let notice = store.create("still works", "").unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn healthy_database_opens_without_notice() {
        let dir = tempfile::tempdir().unwrap();
        let (backend, notice) = open_backend(&dir.path().join("todolist.db"));
        assert!(notice.is_none());
        let (store, _) = TaskStore::load(backend, &Appearance(false));
        assert!(store.is_empty());
    }
}
