use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::notify::NoticeKind;
use crate::search::Matcher;

use super::app::{App, FormField, InputMode, View};
use super::form::{TextInput, render_hints, render_modal};
use super::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let area = frame.area();

    frame.render_widget(Block::default().style(theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // hints
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    let body = inset(chunks[1], 2, 1);
    match app.view {
        View::Home => draw_home(frame, app, body),
        View::Tasks => draw_tasks(frame, app, body),
    }

    render_hints(
        frame,
        chunks[2],
        hints(app),
        theme.primary_style(),
        theme.muted_style().bg(theme.bg),
    );

    if app.clear_gate.is_visible() {
        draw_confirm_clear(frame, app);
    } else if app.input_mode == InputMode::Help {
        draw_help(frame, app);
    }

    draw_toast(frame, app, chunks[1]);
}

fn inset(area: Rect, horizontal: u16, vertical: u16) -> Rect {
    Rect::new(
        area.x + horizontal.min(area.width / 2),
        area.y + vertical.min(area.height / 2),
        area.width.saturating_sub(horizontal * 2),
        area.height.saturating_sub(vertical * 2),
    )
}

// ── Header ────────────────────────────────────────────────────────────

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(10)])
        .split(area);

    let tasks_tab = format!(" My Tasks ({}) ", app.store.len());
    let tabs = Line::from(vec![
        Span::styled(" TODO App ", theme.header()),
        Span::styled("│", theme.tab_style(false)),
        Span::styled(" Home ", theme.tab_style(app.view == View::Home)),
        Span::styled(tasks_tab, theme.tab_style(app.view == View::Tasks)),
    ]);
    frame.render_widget(Paragraph::new(tabs).style(theme.header()), cols[0]);

    let mode = if app.store.dark_mode() {
        "☾ dark "
    } else {
        "☀ light "
    };
    frame.render_widget(
        Paragraph::new(mode)
            .alignment(Alignment::Right)
            .style(theme.tab_style(false)),
        cols[1],
    );
}

// ── Home: add-task form ───────────────────────────────────────────────

fn draw_home(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let editing = app.input_mode == InputMode::NewTask;

    let block = Block::default()
        .title(" Add New Task ")
        .borders(Borders::ALL)
        .border_style(theme.border(editing))
        .style(theme.card());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title label
            Constraint::Length(3), // title input
            Constraint::Length(1), // title helper
            Constraint::Length(1),
            Constraint::Length(1), // description label
            Constraint::Length(3), // description input
            Constraint::Length(1), // description helper
            Constraint::Length(1),
            Constraint::Length(1), // actions
            Constraint::Min(0),
        ])
        .split(inset(inner, 1, 0));

    let title_focused = editing && app.form_field == FormField::Title;
    let desc_focused = editing && app.form_field == FormField::Description;

    frame.render_widget(
        Paragraph::new(Span::styled("Title", theme.card().add_modifier(Modifier::BOLD))),
        rows[0],
    );
    draw_input(
        frame,
        theme,
        rows[1],
        &app.title_input,
        title_focused,
        "Enter task title",
    );

    let (used, limit) = app.title_input.usage().unwrap_or((0, 0));
    let counter_style = if app.title_input.is_full() {
        theme.danger_style()
    } else {
        theme.muted_style()
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Add a descriptive title for your task  ", theme.muted_style()),
            Span::styled(format!("{used}/{limit}"), counter_style),
        ])),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Description",
            theme.card().add_modifier(Modifier::BOLD),
        )),
        rows[4],
    );
    draw_input(
        frame,
        theme,
        rows[5],
        &app.description_input,
        desc_focused,
        "Enter task description (optional)",
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Optional details about your task",
            theme.muted_style(),
        )),
        rows[6],
    );

    let actions = Line::from(vec![
        Span::styled(" Enter ", theme.primary_style().add_modifier(Modifier::REVERSED)),
        Span::styled(" Add Task    ", theme.card()),
        Span::styled(" C ", theme.danger_style().add_modifier(Modifier::REVERSED)),
        Span::styled(" Clear All Tasks", theme.card()),
    ]);
    frame.render_widget(Paragraph::new(actions), rows[8]);
}

fn draw_input(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    input: &TextInput,
    focused: bool,
    placeholder: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused))
        .style(theme.card());

    let content = if focused {
        Span::styled(input.with_cursor(), theme.card())
    } else if input.is_empty() {
        Span::styled(placeholder.to_string(), theme.muted_style())
    } else {
        Span::styled(input.value().to_string(), theme.card())
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

// ── My Tasks: search and list ─────────────────────────────────────────

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();

    let block = Block::default()
        .title(" Your Tasks ")
        .borders(Borders::ALL)
        .border_style(theme.border(false))
        .style(theme.card());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inset(inner, 1, 0));

    draw_input(
        frame,
        theme,
        rows[0],
        &app.search_input,
        app.input_mode == InputMode::Search,
        "Search tasks... (press /)",
    );

    draw_task_list(frame, app, rows[1]);
}

fn draw_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let visible = app.store.visible();

    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                empty_list_message(app.store.search_term()),
                theme.muted_style(),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
            inset(area, 0, 1),
        );
        return;
    }

    let matcher = Matcher::new(app.store.search_term());
    let text_style = theme.card();
    let hit = theme.match_style();

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let mut title = vec![Span::styled(format!("{}. ", i + 1), theme.muted_style())];
            title.extend(highlighted(
                &matcher,
                &task.title,
                text_style.add_modifier(Modifier::BOLD),
                hit,
            ));

            let mut description = vec![Span::raw("   ")];
            if task.has_description() {
                description.extend(highlighted(&matcher, &task.description, text_style, hit));
            } else {
                description.push(Span::styled(
                    "No description",
                    theme.muted_style().add_modifier(Modifier::ITALIC),
                ));
            }

            ListItem::new(vec![
                Line::from(title),
                Line::from(description),
                Line::raw(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_symbol("▸ ")
        .highlight_style(Style::default().bg(theme.bg));
    let mut state = ListState::default().with_selected(Some(app.task_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// A blank term means "no filter", so it gets the first-run message.
fn empty_list_message(term: &str) -> String {
    if term.trim().is_empty() {
        "No tasks found. Add a task to get started!".to_string()
    } else {
        format!("No tasks found matching \"{term}\".")
    }
}

fn highlighted<'a>(matcher: &Matcher, text: &'a str, base: Style, hit: Style) -> Vec<Span<'a>> {
    matcher
        .segments(text)
        .into_iter()
        .map(|seg| Span::styled(seg.text, if seg.matched { hit } else { base }))
        .collect()
}

// ── Overlays ──────────────────────────────────────────────────────────

fn draw_confirm_clear(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let acknowledged = app.clear_gate.is_acknowledged();

    let inner = render_modal(
        frame,
        " Confirm Clear All ",
        theme.danger_style(),
        theme.card(),
        62,
        11,
    );

    let checkbox = if acknowledged { "[x]" } else { "[ ]" };
    let button_style = if acknowledged {
        theme.danger_style().add_modifier(Modifier::REVERSED)
    } else {
        theme.muted_style().add_modifier(Modifier::DIM)
    };

    let lines = vec![
        Line::raw("Are you sure you want to delete all tasks? This action cannot be undone."),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("{checkbox} "), theme.primary_style()),
            Span::raw("I understand this will delete all my tasks permanently"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Esc ", theme.muted_style().add_modifier(Modifier::REVERSED)),
            Span::raw(" Cancel    "),
            Span::styled(" Enter ", button_style),
            Span::styled(" Clear All Tasks", button_style.remove_modifier(Modifier::REVERSED)),
        ]),
        Line::raw(""),
        Line::styled("Space toggles the checkbox", theme.muted_style()),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .style(theme.card())
            .wrap(Wrap { trim: false }),
        inset(inner, 1, 0),
    );
}

fn draw_help(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let sections = app.keymap.help_entries();

    let mut lines: Vec<Line> = Vec::new();
    for (category, entries) in &sections {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(*category, theme.primary_style()));
        for entry in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<8}", entry.label), theme.card().add_modifier(Modifier::BOLD)),
                Span::styled(entry.description, theme.card()),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Press any key to close", theme.muted_style()));

    let height = lines.len() as u16 + 2;
    let inner = render_modal(
        frame,
        " Keyboard Shortcuts ",
        theme.border(true),
        theme.card(),
        48,
        height,
    );
    frame.render_widget(Paragraph::new(lines), inset(inner, 1, 0));
}

fn draw_toast(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = app.toast.current() else {
        return;
    };
    let theme = app.theme();

    let icon = match notice.kind {
        NoticeKind::Success => "✓",
        NoticeKind::Error => "✗",
        NoticeKind::Warning => "!",
        NoticeKind::Info => "i",
    };
    let text = format!(" {icon} {} ", notice.message);

    let width = (text.chars().count() as u16 + 2).min(area.width);
    let height = 3.min(area.height);
    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y,
        width,
        height,
    );

    let style = theme.toast_style(notice.kind);
    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(text).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .style(style),
        ),
        toast_area,
    );
}

// ── Footer ────────────────────────────────────────────────────────────

fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    match (app.input_mode, app.view) {
        (InputMode::NewTask, _) => &[
            (" Enter", " add  "),
            ("Tab", " switch field  "),
            ("Esc", " done"),
        ],
        (InputMode::Search, _) => &[(" Enter", " keep  "), ("Esc", " clear search")],
        (InputMode::ConfirmClear, _) => &[
            (" Space", " tick box  "),
            ("Enter", " clear all  "),
            ("Esc", " cancel"),
        ],
        (InputMode::Help, _) => &[(" any key", " close")],
        (InputMode::Normal, View::Home) => &[
            (" n", " add  "),
            ("Tab", " my tasks  "),
            ("t", " theme  "),
            ("C", " clear all  "),
            ("?", " help  "),
            ("q", " quit"),
        ],
        (InputMode::Normal, View::Tasks) => &[
            (" /", " search  "),
            ("j/k", " move  "),
            ("d", " delete  "),
            ("e", " export  "),
            ("Tab", " home  "),
            ("?", " help  "),
            ("q", " quit"),
        ],
    }
}
