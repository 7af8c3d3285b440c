use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::notify::NoticeKind;

/// Semantic colour palette for the entire TUI.
///
/// There are two built-in palettes, [`Theme::light`] and [`Theme::dark`];
/// either can be overridden field by field via `[theme.light]` /
/// `[theme.dark]` in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // ── Accents ───────────────────────────────────────────────
    pub primary: Color,
    pub danger: Color,
    pub warning: Color,
    pub success: Color,

    // ── Surfaces & text ───────────────────────────────────────
    pub text: Color,
    pub muted: Color,
    pub bg: Color,
    pub card_bg: Color,
    pub navbar_bg: Color,
    pub navbar_text: Color,
    pub input_border: Color,

    // ── Toast ─────────────────────────────────────────────────
    pub toast_success_bg: Color,
    pub toast_success_fg: Color,
    pub toast_error_bg: Color,
    pub toast_error_fg: Color,
    pub toast_warning_bg: Color,
    pub toast_warning_fg: Color,
    pub toast_info_bg: Color,
    pub toast_info_fg: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: Color::Rgb(74, 107, 255),
            danger: Color::Rgb(255, 74, 74),
            warning: Color::Rgb(255, 183, 74),
            success: Color::Rgb(74, 255, 125),

            text: Color::Rgb(45, 55, 72),
            muted: Color::Rgb(136, 136, 136),
            bg: Color::Rgb(248, 249, 250),
            card_bg: Color::Rgb(255, 255, 255),
            navbar_bg: Color::Rgb(74, 107, 255),
            navbar_text: Color::White,
            input_border: Color::Rgb(204, 204, 204),

            toast_success_bg: Color::Rgb(212, 237, 218),
            toast_success_fg: Color::Rgb(21, 87, 36),
            toast_error_bg: Color::Rgb(248, 215, 218),
            toast_error_fg: Color::Rgb(114, 28, 36),
            toast_warning_bg: Color::Rgb(255, 243, 205),
            toast_warning_fg: Color::Rgb(133, 100, 4),
            toast_info_bg: Color::Rgb(226, 227, 229),
            toast_info_fg: Color::Rgb(56, 61, 65),
        }
    }

    pub fn dark() -> Self {
        let text = Color::Rgb(248, 249, 250);
        Self {
            primary: Color::Rgb(93, 122, 255),
            danger: Color::Rgb(255, 107, 107),
            warning: Color::Rgb(255, 196, 107),
            success: Color::Rgb(107, 255, 150),

            text,
            muted: Color::Rgb(136, 136, 136),
            bg: Color::Rgb(26, 32, 44),
            card_bg: Color::Rgb(45, 55, 72),
            navbar_bg: Color::Rgb(58, 68, 82),
            navbar_text: text,
            input_border: Color::Rgb(85, 85, 85),

            toast_success_bg: Color::Rgb(30, 70, 32),
            toast_success_fg: text,
            toast_error_bg: Color::Rgb(74, 23, 26),
            toast_error_fg: text,
            toast_warning_bg: Color::Rgb(90, 64, 28),
            toast_warning_fg: text,
            toast_info_bg: Color::Rgb(40, 54, 69),
            toast_info_fg: text,
        }
    }

    /// Page background with body text.
    pub fn base(&self) -> Style {
        Style::default().bg(self.bg).fg(self.text)
    }

    /// Card surface with body text.
    pub fn card(&self) -> Style {
        Style::default().bg(self.card_bg).fg(self.text)
    }

    pub fn border(&self, focused: bool) -> Style {
        let color = if focused {
            self.primary
        } else {
            self.input_border
        };
        Style::default().fg(color).bg(self.card_bg)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .bg(self.navbar_bg)
            .fg(self.navbar_text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_style(&self, active: bool) -> Style {
        let style = Style::default().bg(self.navbar_bg).fg(self.navbar_text);
        if active {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn danger_style(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }

    pub fn primary_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Search hits: warning-coloured background, black text.
    pub fn match_style(&self) -> Style {
        Style::default().bg(self.warning).fg(Color::Black)
    }

    /// Style for a toast notification.
    pub fn toast_style(&self, kind: NoticeKind) -> Style {
        let (bg, fg) = match kind {
            NoticeKind::Success => (self.toast_success_bg, self.toast_success_fg),
            NoticeKind::Error => (self.toast_error_bg, self.toast_error_fg),
            NoticeKind::Warning => (self.toast_warning_bg, self.toast_warning_fg),
            NoticeKind::Info => (self.toast_info_bg, self.toast_info_fg),
        };
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for a `[theme.*]` section.
///
/// Only `Some` fields override the base palette.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub primary: Option<String>,
    pub danger: Option<String>,
    pub warning: Option<String>,
    pub success: Option<String>,

    pub text: Option<String>,
    pub muted: Option<String>,
    pub bg: Option<String>,
    pub card_bg: Option<String>,
    pub navbar_bg: Option<String>,
    pub navbar_text: Option<String>,
    pub input_border: Option<String>,

    pub toast_success_bg: Option<String>,
    pub toast_success_fg: Option<String>,
    pub toast_error_bg: Option<String>,
    pub toast_error_fg: Option<String>,
    pub toast_warning_bg: Option<String>,
    pub toast_warning_fg: Option<String>,
    pub toast_info_bg: Option<String>,
    pub toast_info_fg: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"dark_gray"`, ...), `"rgb(R,G,B)"`,
/// and `"#rrggbb"` / `"#rgb"` hex.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
        return None;
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    // Named colours (case-insensitive, with underscore tolerance)
    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        // #abc is shorthand for #aabbcc
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some(Color::Rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

/// Apply an optional config field: if the string parses to a valid colour,
/// overwrite `target`.
fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source {
        match parse_color(s) {
            Some(color) => *target = color,
            None => tracing::warn!("ignoring unknown theme colour {:?}", s),
        }
    }
}

impl ThemeConfig {
    /// Start from `base` and override any fields set in the config file.
    pub fn build_on(&self, base: Theme) -> Theme {
        let mut t = base;

        apply(&mut t.primary, self.primary.as_ref());
        apply(&mut t.danger, self.danger.as_ref());
        apply(&mut t.warning, self.warning.as_ref());
        apply(&mut t.success, self.success.as_ref());
        apply(&mut t.text, self.text.as_ref());
        apply(&mut t.muted, self.muted.as_ref());
        apply(&mut t.bg, self.bg.as_ref());
        apply(&mut t.card_bg, self.card_bg.as_ref());
        apply(&mut t.navbar_bg, self.navbar_bg.as_ref());
        apply(&mut t.navbar_text, self.navbar_text.as_ref());
        apply(&mut t.input_border, self.input_border.as_ref());
        apply(&mut t.toast_success_bg, self.toast_success_bg.as_ref());
        apply(&mut t.toast_success_fg, self.toast_success_fg.as_ref());
        apply(&mut t.toast_error_bg, self.toast_error_bg.as_ref());
        apply(&mut t.toast_error_fg, self.toast_error_fg.as_ref());
        apply(&mut t.toast_warning_bg, self.toast_warning_bg.as_ref());
        apply(&mut t.toast_warning_fg, self.toast_warning_fg.as_ref());
        apply(&mut t.toast_info_bg, self.toast_info_bg.as_ref());
        apply(&mut t.toast_info_fg, self.toast_info_fg.as_ref());

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_where_it_matters() {
        let light = Theme::light();
        let dark = Theme::dark();
        assert_eq!(light.primary, Color::Rgb(74, 107, 255));
        assert_eq!(dark.bg, Color::Rgb(26, 32, 44));
        assert_ne!(light.bg, dark.bg);
        assert_ne!(light.text, dark.text);
    }

    #[test]
    fn parse_named_colors() {
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("dark_gray"), Some(Color::DarkGray));
        assert_eq!(parse_color("DarkGray"), Some(Color::DarkGray));
        assert_eq!(parse_color("light-red"), Some(Color::LightRed));
        assert_eq!(parse_color("nope"), None);
    }

    #[test]
    fn parse_rgb_color() {
        assert_eq!(
            parse_color("rgb(255, 165, 0)"),
            Some(Color::Rgb(255, 165, 0))
        );
        assert_eq!(parse_color("rgb(256,0,0)"), None); // overflow
        assert_eq!(parse_color("rgb(1,2)"), None); // too few
    }

    #[test]
    fn parse_hex_color() {
        assert_eq!(parse_color("#4a6bff"), Some(Color::Rgb(74, 107, 255)));
        assert_eq!(parse_color("#CCC"), Some(Color::Rgb(204, 204, 204)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("#é12"), None);
    }

    #[test]
    fn theme_config_overrides() {
        let cfg = ThemeConfig {
            primary: Some("red".into()),
            bg: Some("#000000".into()),
            danger: Some("not-a-colour".into()),
            ..Default::default()
        };
        let t = cfg.build_on(Theme::dark());
        assert_eq!(t.primary, Color::Red);
        assert_eq!(t.bg, Color::Rgb(0, 0, 0));
        // Unparseable and non-overridden fields keep the base value
        assert_eq!(t.danger, Theme::dark().danger);
        assert_eq!(t.text, Theme::dark().text);
    }

    #[test]
    fn border_follows_focus() {
        let t = Theme::light();
        assert_eq!(t.border(true).fg, Some(t.primary));
        assert_eq!(t.border(false).fg, Some(t.input_border));
    }

    #[test]
    fn match_style_uses_warning_background() {
        let t = Theme::light();
        let style = t.match_style();
        assert_eq!(style.bg, Some(t.warning));
        assert_eq!(style.fg, Some(Color::Black));
    }

    #[test]
    fn tab_styles() {
        let t = Theme::dark();
        let active = t.tab_style(true);
        assert!(active.add_modifier.contains(Modifier::BOLD));
        assert!(active.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!t.tab_style(false).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn toast_styles() {
        let t = Theme::light();

        let success = t.toast_style(NoticeKind::Success);
        assert_eq!(success.bg, Some(t.toast_success_bg));
        assert_eq!(success.fg, Some(t.toast_success_fg));
        assert!(success.add_modifier.contains(Modifier::BOLD));

        let error = t.toast_style(NoticeKind::Error);
        assert_eq!(error.bg, Some(t.toast_error_bg));

        let warning = t.toast_style(NoticeKind::Warning);
        assert_eq!(warning.bg, Some(t.toast_warning_bg));

        let info = t.toast_style(NoticeKind::Info);
        assert_eq!(info.bg, Some(t.toast_info_bg));
    }
}
