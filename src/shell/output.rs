//! Styled line output on a plain (non-alternate-screen) terminal.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, Print, PrintStyledContent, Stylize,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

use crate::notifications::{Notification, NotificationLevel};

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

fn content_style(style: Style) -> ContentStyle {
    let mut out = ContentStyle::new();
    out.foreground_color = style.fg.map(term_color);
    out.background_color = style.bg.map(term_color);

    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
        (Modifier::DIM, Attribute::Dim),
    ] {
        if style.add_modifier.contains(modifier) {
            out.attributes.set(attribute);
        }
    }
    out
}

/// Writes rendered lines and shell chrome to any writer.
pub struct Output<W: Write> {
    out: W,
}

impl Output<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Output<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn lines(&mut self, lines: &[Line<'_>]) -> io::Result<()> {
        for line in lines {
            for span in &line.spans {
                let style = content_style(line.style.patch(span.style));
                queue!(self.out, PrintStyledContent(style.apply(span.content.as_ref())))?;
            }
            queue!(self.out, Print("\n"))?;
        }
        self.out.flush()
    }

    /// Raw streamed text, written as it arrives.
    pub fn stream_text(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))?;
        self.out.flush()
    }

    pub fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    pub fn dim(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, PrintStyledContent(text.dark_grey()), Print("\n"))?;
        self.out.flush()
    }

    pub fn notification(&mut self, notification: &Notification) -> io::Result<()> {
        let text = notification.message.as_str();
        let styled = match notification.level {
            NotificationLevel::Info => text.blue(),
            NotificationLevel::Success => text.green(),
            NotificationLevel::Error => text.red().bold(),
        };
        queue!(self.out, PrintStyledContent(styled), Print("\n"))?;
        self.out.flush()
    }

    /// Input prompt, without a newline.
    pub fn prompt(&mut self, label: &str) -> io::Result<()> {
        queue!(
            self.out,
            PrintStyledContent(label.bold()),
            Print(" > ")
        )?;
        self.out.flush()
    }
}
