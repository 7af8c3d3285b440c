use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::config::Config;
use crate::confirm::ClearGate;
use crate::notify::{Notice, Toast};
use crate::store::{TITLE_MAX_CHARS, Task, TaskStore};

use super::event::{self, AppEvent};
use super::form::TextInput;
use super::keymap::{Action, KeyMap};
use super::theme::Theme;
use super::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    NewTask,
    Search,
    ConfirmClear,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
}

pub struct App {
    pub store: TaskStore,
    pub should_quit: bool,
    pub view: View,
    pub input_mode: InputMode,

    // Add-task form
    pub form_field: FormField,
    pub title_input: TextInput,
    pub description_input: TextInput,

    // Search box; the term itself lives in the store
    pub search_input: TextInput,

    // Selection within the filtered view
    pub task_index: usize,

    pub clear_gate: ClearGate,
    pub toast: Toast,
    pub keymap: KeyMap,

    light: Theme,
    dark: Theme,
    export_path: PathBuf,
}

impl App {
    pub fn new(
        store: TaskStore,
        startup_notice: Option<Notice>,
        config: &Config,
        export_path: PathBuf,
    ) -> Self {
        let mut app = App {
            store,
            should_quit: false,
            view: View::Home,
            input_mode: InputMode::Normal,
            form_field: FormField::Title,
            title_input: TextInput::with_limit(TITLE_MAX_CHARS),
            description_input: TextInput::default(),
            search_input: TextInput::default(),
            task_index: 0,
            clear_gate: ClearGate::default(),
            toast: Toast::new(config.notifications.lifetime()),
            keymap: KeyMap::default_keymap(),
            light: config.theme.light_theme(),
            dark: config.theme.dark_theme(),
            export_path,
        };
        if let Some(notice) = startup_notice {
            app.notify(notice);
        }
        app
    }

    pub fn theme(&self) -> &Theme {
        if self.store.dark_mode() {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.toast.show(notice, Instant::now());
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.store.visible().get(self.task_index)
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            match event::poll(tick_rate)? {
                AppEvent::Key(key) => self.handle_key(key.code, key.modifiers),
                AppEvent::Tick => self.tick(Instant::now()),
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.toast.tick(now);
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match self.input_mode {
            InputMode::Normal => {
                if let Some(action) = self.keymap.lookup_normal(code, modifiers) {
                    self.execute(action);
                }
            }
            InputMode::NewTask => self.handle_form_key(code, modifiers),
            InputMode::Search => self.handle_search_key(code, modifiers),
            InputMode::ConfirmClear => self.handle_confirm_clear_key(code),
            InputMode::Help => self.input_mode = InputMode::Normal,
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.input_mode = InputMode::Help,
            Action::NextView => {
                self.view = match self.view {
                    View::Home => View::Tasks,
                    View::Tasks => View::Home,
                };
            }
            Action::ShowHome => self.view = View::Home,
            Action::ShowTasks => self.view = View::Tasks,
            Action::MoveDown => {
                let visible = self.store.visible().len();
                if self.view == View::Tasks && visible > 0 {
                    self.task_index = (self.task_index + 1).min(visible - 1);
                }
            }
            Action::MoveUp => {
                if self.view == View::Tasks {
                    self.task_index = self.task_index.saturating_sub(1);
                }
            }
            Action::NewTask => {
                self.view = View::Home;
                self.form_field = FormField::Title;
                self.input_mode = InputMode::NewTask;
            }
            Action::Search => {
                self.view = View::Tasks;
                self.search_input.set(self.store.search_term());
                self.input_mode = InputMode::Search;
            }
            Action::ClearSearch => {
                if self.toast.current().is_some() {
                    self.toast.dismiss();
                } else if !self.store.search_term().is_empty() {
                    self.apply_search("");
                }
            }
            Action::DeleteTask => {
                if self.view == View::Tasks
                    && let Some(id) = self.selected_task().map(|t| t.id.clone())
                    && let Some(notice) = self.store.delete(&id)
                {
                    self.notify(notice);
                    self.clamp_selection();
                }
            }
            Action::ClearAll => {
                self.clear_gate.open();
                self.input_mode = InputMode::ConfirmClear;
            }
            Action::Export => self.export(),
            Action::ToggleTheme => {
                if let Some(notice) = self.store.toggle_theme() {
                    self.notify(notice);
                }
            }
            Action::DismissNotice => self.toast.dismiss(),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter => self.submit_task(),
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.form_field = match self.form_field {
                    FormField::Title => FormField::Description,
                    FormField::Description => FormField::Title,
                };
            }
            _ => {
                let input = match self.form_field {
                    FormField::Title => &mut self.title_input,
                    FormField::Description => &mut self.description_input,
                };
                input.handle_key(code, modifiers);
            }
        }
    }

    fn submit_task(&mut self) {
        match self
            .store
            .create(self.title_input.value(), self.description_input.value())
        {
            Ok(notice) => {
                self.title_input.clear();
                self.description_input.clear();
                self.form_field = FormField::Title;
                self.task_index = 0;
                self.notify(notice);
            }
            Err(e) => {
                if e.is_validation() {
                    tracing::debug!(error = %e, "task rejected");
                } else {
                    tracing::error!(error = %e, "failed to create task");
                }
                self.notify(Notice::from(&e));
            }
        }
    }

    fn handle_search_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.apply_search("");
                self.input_mode = InputMode::Normal;
            }
            _ => {
                if self.search_input.handle_key(code, modifiers) {
                    let term = self.search_input.value().to_string();
                    self.apply_search(&term);
                }
            }
        }
    }

    fn apply_search(&mut self, term: &str) {
        if term.is_empty() {
            self.search_input.clear();
        }
        self.store.set_search(term);
        self.task_index = 0;
    }

    fn handle_confirm_clear_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ' | 'x') => self.clear_gate.toggle_acknowledged(),
            KeyCode::Enter => {
                // Without the tick the button is disabled and Enter does nothing
                if let Some(confirmed) = self.clear_gate.confirm() {
                    let notice = self.store.clear_all(confirmed);
                    self.notify(notice);
                    self.task_index = 0;
                    self.input_mode = InputMode::Normal;
                }
            }
            KeyCode::Esc | KeyCode::Char('q' | 'n') => {
                self.clear_gate.dismiss();
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn export(&mut self) {
        let notice = match crate::export::export_tasks(self.store.tasks(), &self.export_path) {
            Ok(count) => Notice::success(format!(
                "Exported {count} task(s) to {}",
                self.export_path.display()
            )),
            Err(e) => {
                tracing::error!("export failed: {:#}", e);
                Notice::error(format!("Export failed: {e}"))
            }
        };
        self.notify(notice);
    }

    fn clamp_selection(&mut self) {
        let visible = self.store.visible().len();
        if self.task_index >= visible {
            self.task_index = visible.saturating_sub(1);
        }
    }
}
