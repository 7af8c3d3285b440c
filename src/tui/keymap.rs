use crossterm::event::{KeyCode, KeyModifiers};

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the TUI can perform from normal mode.
///
/// Actions are context-free identifiers; `App` decides what actually
/// happens based on the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowHelp,
    NextView,
    ShowHome,
    ShowTasks,
    MoveUp,
    MoveDown,
    NewTask,
    Search,
    ClearSearch,
    DeleteTask,
    ClearAll,
    Export,
    ToggleTheme,
    DismissNotice,
}

// ── Help categories ──────────────────────────────────────────────────

/// Logical groupings shown in the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    Navigation,
    Tasks,
    Appearance,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Tasks => "Tasks",
            Self::Appearance => "Appearance",
        }
    }

    const ORDERED: &[Self] = &[Self::Navigation, Self::Tasks, Self::Appearance];
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with metadata for the help overlay.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Key label shown in help (e.g. `"  j/k"`). Empty for aliases.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of every normal-mode key binding.
pub struct KeyMap {
    pub normal: Vec<KeyBinding>,
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            normal: default_normal_bindings(),
        }
    }

    pub fn lookup_normal(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        // Shifted letters arrive as uppercase chars; the SHIFT flag is noise.
        let modifiers = if matches!(code, KeyCode::Char(_)) {
            modifiers.difference(KeyModifiers::SHIFT)
        } else {
            modifiers
        };
        self.normal
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// Grouped help entries in display order. Aliases (empty labels) are skipped.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        HelpCategory::ORDERED
            .iter()
            .filter_map(|&cat| {
                let mut entries: Vec<HelpEntry> = Vec::new();
                for kb in &self.normal {
                    if kb.category == cat
                        && !kb.label.is_empty()
                        && !entries.iter().any(|e| e.label == kb.label)
                    {
                        entries.push(HelpEntry {
                            label: kb.label,
                            description: kb.description,
                        });
                    }
                }
                (!entries.is_empty()).then(|| (cat.label(), entries))
            })
            .collect()
    }
}

fn bind(
    code: KeyCode,
    action: Action,
    label: &'static str,
    description: &'static str,
    category: HelpCategory,
) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: KeyModifiers::NONE,
        action,
        label,
        description,
        category,
    }
}

fn alias(code: KeyCode, modifiers: KeyModifiers, action: Action) -> KeyBinding {
    KeyBinding {
        code,
        modifiers,
        action,
        label: "",
        description: "",
        category: HelpCategory::Navigation,
    }
}

#[allow(clippy::enum_glob_use)]
fn default_normal_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        // ── Navigation ───────────────────────────────────────────
        bind(KeyCode::Tab, NextView, "  Tab", "Switch Home / My Tasks", Navigation),
        alias(KeyCode::BackTab, KeyModifiers::SHIFT, NextView),
        alias(KeyCode::BackTab, KeyModifiers::NONE, NextView),
        bind(KeyCode::Char('1'), ShowHome, "  1/2", "Home / My Tasks", Navigation),
        alias(KeyCode::Char('2'), KeyModifiers::NONE, ShowTasks),
        bind(KeyCode::Char('j'), MoveDown, "  j/k", "Move selection", Navigation),
        alias(KeyCode::Char('k'), KeyModifiers::NONE, MoveUp),
        alias(KeyCode::Down, KeyModifiers::NONE, MoveDown),
        alias(KeyCode::Up, KeyModifiers::NONE, MoveUp),
        bind(KeyCode::Char('?'), ShowHelp, "  ?", "This help", Navigation),
        bind(KeyCode::Char('q'), Quit, "  q", "Quit", Navigation),
        alias(KeyCode::Char('c'), KeyModifiers::CONTROL, Quit),
        // ── Tasks ────────────────────────────────────────────────
        bind(KeyCode::Char('n'), NewTask, "  n", "Add a task", Tasks),
        alias(KeyCode::Char('a'), KeyModifiers::NONE, NewTask),
        bind(KeyCode::Char('/'), Search, "  /", "Search title and description", Tasks),
        bind(KeyCode::Esc, ClearSearch, "  Esc", "Clear search / notification", Tasks),
        bind(KeyCode::Char('d'), DeleteTask, "  d", "Delete selected task", Tasks),
        alias(KeyCode::Delete, KeyModifiers::NONE, DeleteTask),
        bind(KeyCode::Char('C'), ClearAll, "  C", "Clear all tasks", Tasks),
        bind(KeyCode::Char('e'), Export, "  e", "Export tasks to JSON", Tasks),
        bind(KeyCode::Char('x'), DismissNotice, "  x", "Dismiss notification", Tasks),
        // ── Appearance ───────────────────────────────────────────
        bind(KeyCode::Char('t'), ToggleTheme, "  t", "Toggle light / dark", Appearance),
    ]
}
