//! Theme palettes and OSC 8 hyperlinks.

use ratatui::style::{Color, Modifier, Style};

use crate::models::Theme;

/// Styles used by the renderer for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Style,
    pub muted: Style,
    pub user: Style,
    pub assistant: Style,
    pub heading: Style,
    pub inline_code: Style,
    pub code_block: Style,
    pub link: Style,
    pub selected: Style,
}

const LIGHT: Palette = Palette {
    text: Style::new().fg(Color::Black),
    muted: Style::new().fg(Color::Gray),
    user: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
    assistant: Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    heading: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
    inline_code: Style::new().fg(Color::Red),
    code_block: Style::new().fg(Color::DarkGray),
    link: Style::new()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED),
    selected: Style::new().add_modifier(Modifier::REVERSED),
};

const DARK: Palette = Palette {
    text: Style::new().fg(Color::White),
    muted: Style::new().fg(Color::DarkGray),
    user: Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    assistant: Style::new().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
    heading: Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    inline_code: Style::new().fg(Color::Cyan),
    code_block: Style::new().fg(Color::Gray),
    link: Style::new()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::UNDERLINED),
    selected: Style::new().add_modifier(Modifier::REVERSED),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}

/// Wrap `text` in an OSC 8 escape so supporting terminals make it clickable.
///
/// Format: `ESC ] 8 ; ; url BEL text ESC ] 8 ; ; BEL`
pub fn wrap_osc8_hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, text)
}
