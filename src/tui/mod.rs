mod app;
mod event;
mod form;
mod keymap;
pub mod theme;
mod ui;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::notify::Notice;
use crate::store::TaskStore;

/// Take over the terminal and run the dashboard until the user quits.
pub fn run(
    store: TaskStore,
    startup_notice: Option<Notice>,
    config: &Config,
    export_path: PathBuf,
) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = app::App::new(store, startup_notice, config, export_path);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
