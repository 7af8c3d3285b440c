/// Host query consulted when no theme preference has been saved yet.
pub trait HostAppearance {
    fn prefers_dark(&self) -> bool;
}

/// Terminal-side answer: the `prefer_dark` config value if set, otherwise
/// the background colour advertised in `COLORFGBG`, otherwise light.
#[derive(Debug, Clone, Default)]
pub struct TerminalAppearance {
    prefer_dark: Option<bool>,
    colorfgbg: Option<String>,
}

impl TerminalAppearance {
    pub fn detect(prefer_dark: Option<bool>) -> Self {
        TerminalAppearance {
            prefer_dark,
            colorfgbg: std::env::var("COLORFGBG").ok(),
        }
    }
}

impl HostAppearance for TerminalAppearance {
    fn prefers_dark(&self) -> bool {
        self.prefer_dark
            .or_else(|| self.colorfgbg.as_deref().and_then(background_is_dark))
            .unwrap_or(false)
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); the last field is the
/// background's ANSI index. Indices 0-6 and 8 are the dark ones.
fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let bg = colorfgbg.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}
