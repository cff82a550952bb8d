//! Projection of messages and threads into styled terminal lines.
//!
//! Rendering is pure: the same input always produces the same lines and
//! nothing here touches session or registry state.

mod markdown;
mod styles;
mod time;

pub use markdown::render_markdown;
pub use styles::{wrap_osc8_hyperlink, Palette};
pub use time::{clock_time, relative_time};

use chrono::{DateTime, Utc};
use ratatui::text::{Line, Span};

use crate::models::{ChatThread, Message, Theme, User};

/// Shown in place of an assistant answer that has not flushed yet.
pub const PENDING_PLACEHOLDER: &str = "…";

/// Header line plus body for one message.
///
/// User messages show the avatar initial of `user` (`U` when unknown).
/// Image messages render as a labelled hyperlink; inline `data:` images are
/// summarised rather than dumped.
pub fn render_message(message: &Message, user: Option<&User>, theme: Theme) -> Vec<Line<'static>> {
    let palette = Palette::for_theme(theme);
    let mut lines = vec![message_header(message, user, &palette)];

    if message.is_image {
        lines.push(image_line(&message.content, &palette));
    } else if message.is_user() {
        lines.extend(
            message
                .content
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), palette.text))),
        );
    } else if message.content.is_empty() {
        lines.push(Line::from(Span::styled(PENDING_PLACEHOLDER, palette.muted)));
    } else {
        lines.extend(render_markdown(&message.content, &palette));
    }
    lines
}

fn message_header(message: &Message, user: Option<&User>, palette: &Palette) -> Line<'static> {
    let (badge, name, style) = if message.is_user() {
        let initial = user.map(User::initial).unwrap_or('U');
        let name = user
            .map(|u| u.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "You".to_string());
        (initial, name, palette.user)
    } else {
        ('A', "ThinkToArt".to_string(), palette.assistant)
    };

    let mut spans = vec![
        Span::styled(format!("[{}] ", badge), style),
        Span::styled(name, style),
    ];
    let clock = clock_time(message.timestamp);
    if !clock.is_empty() {
        spans.push(Span::styled(format!("  {}", clock), palette.muted));
    }
    Line::from(spans)
}

fn image_line(reference: &str, palette: &Palette) -> Line<'static> {
    let label = if reference.starts_with("data:") {
        Span::styled(
            format!("inline image ({} bytes)", reference.len()),
            palette.link,
        )
    } else {
        Span::styled(wrap_osc8_hyperlink(reference, reference), palette.link)
    };
    Line::from(vec![Span::styled("Image: ", palette.muted), label])
}

/// All messages of a thread, separated by blank lines.
pub fn render_thread(thread: &ChatThread, user: Option<&User>, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, message) in thread.messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(render_message(message, user, theme));
    }
    lines
}

/// One row of the chat list: marker, index, title and relative update time.
pub fn thread_list_line(
    index: usize,
    thread: &ChatThread,
    selected: bool,
    theme: Theme,
    now: DateTime<Utc>,
) -> Line<'static> {
    let palette = Palette::for_theme(theme);
    let marker = if selected { "▶" } else { " " };
    let title_style = if selected {
        palette.text.patch(palette.selected)
    } else {
        palette.text
    };
    Line::from(vec![
        Span::styled(format!("{} {:>2}. ", marker, index + 1), palette.muted),
        Span::styled(thread.title(), title_style),
        Span::styled(
            format!("  {}", relative_time(thread.updated_at, now)),
            palette.muted,
        ),
    ])
}

/// Concatenated span text of a line, without styling.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "ada".to_string(),
            email: None,
            credit_balance: 3,
        }
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn test_user_message_shows_initial_and_literal_text() {
        let mut msg = Message::user("**not markdown**");
        msg.timestamp = 0;
        let lines = texts(&render_message(&msg, Some(&user()), Theme::Light));
        assert_eq!(lines, vec!["[A] ada", "**not markdown**"]);
    }

    #[test]
    fn test_unknown_user_initial() {
        let mut msg = Message::user("hi");
        msg.timestamp = 0;
        let lines = texts(&render_message(&msg, None, Theme::Dark));
        assert_eq!(lines[0], "[U] You");
    }

    #[test]
    fn test_placeholder_renders_pending_marker() {
        let mut msg = Message::assistant_placeholder();
        msg.timestamp = 0;
        let lines = texts(&render_message(&msg, None, Theme::Dark));
        assert_eq!(lines, vec!["[A] ThinkToArt", PENDING_PLACEHOLDER]);
    }

    #[test]
    fn test_image_message_renders_link_line() {
        let msg = Message::image("https://ik.imagekit.io/cat.png");
        let lines = render_message(&msg, None, Theme::Light);
        assert_eq!(lines.len(), 2);
        assert!(line_text(&lines[1]).contains("https://ik.imagekit.io/cat.png"));
        assert!(line_text(&lines[1]).starts_with("Image: "));
    }

    #[test]
    fn test_data_uri_is_summarised() {
        let uri = format!("data:image/png;base64,{}", "A".repeat(400));
        let lines = render_message(&Message::image(uri.clone()), None, Theme::Light);
        let text = line_text(&lines[1]);
        assert!(!text.contains(&uri));
        assert!(text.contains("inline image"));
    }

    #[test]
    fn test_thread_list_line() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let mut thread = ChatThread::new("c1", "New Chat");
        thread.updated_at = now - chrono::Duration::minutes(5);
        thread.messages.push(Message::user("How do rainbows form?"));

        let line = line_text(&thread_list_line(0, &thread, true, Theme::Light, now));
        assert_eq!(line, "▶  1. How do rainbows form?  5m ago");
    }

    #[test]
    fn test_render_thread_separates_messages() {
        let mut thread = ChatThread::new("c1", "New Chat");
        thread.messages.push(Message::user("q"));
        thread.messages.push(Message::image("https://x/y.png"));
        let lines = render_thread(&thread, None, Theme::Dark);
        assert_eq!(lines.len(), 5);
        assert_eq!(line_text(&lines[2]), "");
    }
}
