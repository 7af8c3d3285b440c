use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

// ── Text input ────────────────────────────────────────────────────────

/// Single-line editable buffer with a byte-offset cursor and an optional
/// character limit.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn with_limit(max_chars: usize) -> Self {
        TextInput {
            max_chars: Some(max_chars),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set(&mut self, value: &str) {
        value.clone_into(&mut self.value);
        self.cursor = self.value.len();
    }

    fn has_room(&self) -> bool {
        self.max_chars
            .is_none_or(|max| self.value.chars().count() < max)
    }

    /// Apply standard text-editing shortcuts: character insertion, deletion,
    /// cursor movement (arrows, word jumps with Alt, line jumps with Super),
    /// Ctrl+W / Ctrl+U.
    /// Returns `true` if the key event was consumed. Characters typed past
    /// the limit are consumed and dropped.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let buf = &mut self.value;
        // Clamp in case the buffer was replaced underneath us
        self.cursor = self.cursor.min(buf.len());
        let cursor = &mut self.cursor;

        match code {
            KeyCode::Left if modifiers.contains(KeyModifiers::SUPER) => *cursor = 0,
            KeyCode::Left if modifiers.contains(KeyModifiers::ALT) => {
                *cursor = word_boundary_left(buf, *cursor);
            }
            KeyCode::Left => {
                if let Some(ch) = buf[..*cursor].chars().next_back() {
                    *cursor -= ch.len_utf8();
                }
            }
            KeyCode::Right if modifiers.contains(KeyModifiers::SUPER) => *cursor = buf.len(),
            KeyCode::Right if modifiers.contains(KeyModifiers::ALT) => {
                *cursor = word_boundary_right(buf, *cursor);
            }
            KeyCode::Right => {
                if let Some(ch) = buf[*cursor..].chars().next() {
                    *cursor += ch.len_utf8();
                }
            }
            KeyCode::Home => *cursor = 0,
            KeyCode::End => *cursor = buf.len(),

            KeyCode::Backspace if modifiers.contains(KeyModifiers::ALT) => {
                let start = word_boundary_left(buf, *cursor);
                buf.drain(start..*cursor);
                *cursor = start;
            }
            KeyCode::Char('w') if modifiers.contains(KeyModifiers::CONTROL) => {
                let start = word_boundary_left(buf, *cursor);
                buf.drain(start..*cursor);
                *cursor = start;
            }
            KeyCode::Backspace if modifiers.contains(KeyModifiers::SUPER) => {
                buf.drain(..*cursor);
                *cursor = 0;
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                buf.drain(..*cursor);
                *cursor = 0;
            }
            KeyCode::Backspace => {
                if let Some(ch) = buf[..*cursor].chars().next_back() {
                    let start = *cursor - ch.len_utf8();
                    buf.drain(start..*cursor);
                    *cursor = start;
                }
            }
            KeyCode::Delete => {
                if let Some(ch) = buf[*cursor..].chars().next() {
                    buf.drain(*cursor..*cursor + ch.len_utf8());
                }
            }

            KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if self.max_chars.is_none_or(|max| buf.chars().count() < max) {
                    buf.insert(*cursor, c);
                    *cursor += c.len_utf8();
                }
            }
            _ => return false,
        }
        true
    }

    /// The buffer with a visible block cursor at the cursor position.
    pub fn with_cursor(&self) -> String {
        let pos = self.cursor.min(self.value.len());
        let (before, after) = self.value.split_at(pos);
        format!("{before}\u{2588}{after}")
    }

    /// `(used, limit)` for a character counter, if the input is limited.
    pub fn usage(&self) -> Option<(usize, usize)> {
        self.max_chars
            .map(|max| (self.value.chars().count(), max))
    }

    pub fn is_full(&self) -> bool {
        !self.has_room()
    }
}

/// Find the byte offset of the previous word boundary (for word-left navigation).
pub fn word_boundary_left(s: &str, pos: usize) -> usize {
    let trimmed = s[..pos].trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(idx) => trimmed[idx..]
            .chars()
            .next()
            .map_or(idx, |ch| idx + ch.len_utf8()),
        None => 0,
    }
}

/// Find the byte offset of the next word boundary (for word-right navigation).
pub fn word_boundary_right(s: &str, pos: usize) -> usize {
    let after = &s[pos..];
    let Some(ws) = after.find(char::is_whitespace) else {
        return s.len();
    };
    after[ws..]
        .find(|c: char| !c.is_whitespace())
        .map_or(s.len(), |word| pos + ws + word)
}

// ── Rendering helpers ─────────────────────────────────────────────────

/// Render a centered modal overlay: `Clear` background, bordered block, returns inner `Rect`.
///
/// The panel is `width`×`height`, clamped to the screen.
pub fn render_modal(
    frame: &mut Frame,
    title: &str,
    border_style: Style,
    body_style: Style,
    width: u16,
    height: u16,
) -> Rect {
    let area = frame.area();
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(w)) / 2;
    let y = (area.height.saturating_sub(h)) / 2;
    let panel = Rect::new(x, y, w, h);

    frame.render_widget(Clear, panel);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(body_style);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    inner
}

/// Render a horizontal hint bar of alternating key/description spans.
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
) {
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, key_style),
                Span::styled(*desc, desc_style),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)).style(desc_style), area);
}
