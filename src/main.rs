use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use todolist::appearance::TerminalAppearance;
use todolist::config::{self, Config};
use todolist::confirm::ClearGate;
use todolist::export;
use todolist::logging;
use todolist::notify::{Notice, NoticeKind};
use todolist::store::{self, KeyValueStore, MemoryStore, SqliteStore, TaskStore};
use todolist::tui;

#[derive(Parser)]
#[command(
    name = "todolist",
    about = "A single-screen to-do list with search and light/dark themes",
    version = env!("TODOLIST_VERSION")
)]
struct Cli {
    /// Keep everything in memory for this run; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI dashboard (default)
    Dashboard,
    /// Initialize the ~/.todolist directory and database
    Init,
    /// Add a task
    Add {
        /// Task title (at most 100 characters)
        title: String,
        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List tasks, newest first
    List {
        /// Only show tasks whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Delete a task by id
    Delete {
        /// Task id as shown by `todolist list`
        id: String,
    },
    /// Delete every task
    Clear {
        /// Confirm that all tasks should be deleted permanently
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the colour theme
    Theme {
        mode: Option<ThemeMode>,
    },
    /// Export all tasks to a JSON file
    Export {
        /// Output path (default: ~/.todolist/export.json)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    config::ensure_dirs()?;
    if let Err(e) = logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }
    let cfg = config::load()?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            let (store, notice) = open_store(&cfg, cli.ephemeral)?;
            tui::run(store, notice, &cfg, config::default_export_path()?)
        }
        Commands::Init => {
            let store = SqliteStore::open()?;
            store.migrate()?;
            println!("todolist initialized at ~/.todolist/");
            Ok(())
        }
        Commands::Add { title, description } => {
            let (mut store, notice) = open_store(&cfg, cli.ephemeral)?;
            report_startup(notice);
            let notice = store.create(&title, &description)?;
            report(&notice)?;
            if let Some(task) = store.tasks().first() {
                println!("  {}  {}", task.id, task.title);
            }
            Ok(())
        }
        Commands::List { search } => {
            let (mut store, notice) = open_store(&cfg, cli.ephemeral)?;
            report_startup(notice);
            if let Some(term) = &search {
                store.set_search(term);
            }
            let visible = store.visible();
            if visible.is_empty() {
                match &search {
                    Some(term) if !term.trim().is_empty() => {
                        println!("No tasks found matching \"{term}\".");
                    }
                    _ => println!(
                        "No tasks found. Use `todolist add <title>` to get started!"
                    ),
                }
            } else {
                for t in visible {
                    println!("  {}  {}", t.id, t.title);
                    if t.has_description() {
                        println!("      {}", t.description);
                    }
                }
            }
            Ok(())
        }
        Commands::Delete { id } => {
            let (mut store, notice) = open_store(&cfg, cli.ephemeral)?;
            report_startup(notice);
            delete_task(&mut store, &id)
        }
        Commands::Clear { yes } => {
            let (mut store, notice) = open_store(&cfg, cli.ephemeral)?;
            report_startup(notice);
            let mut gate = ClearGate::default();
            gate.open();
            if yes {
                gate.toggle_acknowledged();
            }
            let Some(confirmed) = gate.confirm() else {
                bail!(
                    "refusing to delete {} task(s) without confirmation; pass --yes",
                    store.len()
                );
            };
            report(&store.clear_all(confirmed))
        }
        Commands::Theme { mode } => {
            let (mut store, notice) = open_store(&cfg, cli.ephemeral)?;
            report_startup(notice);
            let failure = match mode {
                None => None,
                Some(ThemeMode::Light) => store.set_dark_mode(false),
                Some(ThemeMode::Dark) => store.set_dark_mode(true),
                Some(ThemeMode::Toggle) => store.toggle_theme(),
            };
            if let Some(notice) = failure {
                report(&notice)?;
            }
            println!(
                "Theme: {}",
                if store.dark_mode() { "dark" } else { "light" }
            );
            Ok(())
        }
        Commands::Export { output } => {
            let (store, notice) = open_store(&cfg, cli.ephemeral)?;
            report_startup(notice);
            let path = match output {
                Some(p) => PathBuf::from(p),
                None => config::default_export_path()?,
            };
            let count = export::export_tasks(store.tasks(), &path)?;
            println!("Exported {count} task(s) to {}", path.display());
            Ok(())
        }
    }
}

/// Open the persistent store (or an in-memory one) and load the task list.
/// A database that cannot be opened leaves an in-memory store and a notice.
fn open_store(cfg: &Config, ephemeral: bool) -> Result<(TaskStore, Option<Notice>)> {
    let (backend, open_notice): (Box<dyn KeyValueStore>, _) = if ephemeral {
        (Box::new(MemoryStore::default()) as Box<dyn KeyValueStore>, None)
    } else {
        store::open_backend(&config::db_path()?)
    };
    let appearance = TerminalAppearance::detect(cfg.appearance.prefer_dark);
    let (store, load_notice) = TaskStore::load(backend, &appearance);
    Ok((store, open_notice.or(load_notice)))
}

/// Unknown ids are a silent no-op, same as in the dashboard.
fn delete_task(store: &mut TaskStore, id: &str) -> Result<()> {
    match store.delete(id) {
        Some(notice) => report(&notice),
        None => {
            tracing::debug!(id, "delete ignored, no such task");
            Ok(())
        }
    }
}

/// Print a load-time notice without aborting the command.
fn report_startup(notice: Option<Notice>) {
    if let Some(notice) = notice {
        eprintln!("warning: {}", notice.message);
    }
}

/// Print a success notice, or turn an error notice into a failing exit.
fn report(notice: &Notice) -> Result<()> {
    match notice.kind {
        NoticeKind::Error => bail!("{}", notice.message),
        NoticeKind::Warning => {
            eprintln!("warning: {}", notice.message);
            Ok(())
        }
        NoticeKind::Success | NoticeKind::Info => {
            println!("{}", notice.message);
            Ok(())
        }
    }
}
