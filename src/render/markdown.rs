//! Markdown to styled terminal lines.
//!
//! Handles fenced code, inline code, bold, italic, headings, list items and
//! links. Plain `http(s)://` URLs in text are turned into hyperlinks too.
//! Incomplete markdown (a half-streamed answer) renders without error.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

use super::styles::{wrap_osc8_hyperlink, Palette};

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s<>\[\]]+").expect("Invalid URL regex pattern"));

/// Render markdown to lines. Always returns at least one line.
pub fn render_markdown(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![palette.text];
    let mut in_code_block = false;
    let mut link_url: Option<String> = None;

    let flush = |lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in Parser::new_ext(text, options) {
        let current = *styles.last().unwrap_or(&palette.text);
        match event {
            Event::Start(tag) => match tag {
                Tag::CodeBlock(_) => {
                    flush(&mut lines, &mut spans);
                    in_code_block = true;
                    styles.push(palette.code_block);
                }
                Tag::Heading { .. } => {
                    flush(&mut lines, &mut spans);
                    styles.push(palette.heading);
                }
                Tag::Strong => styles.push(current.add_modifier(Modifier::BOLD)),
                Tag::Emphasis => styles.push(current.add_modifier(Modifier::ITALIC)),
                Tag::Strikethrough => styles.push(current.add_modifier(Modifier::CROSSED_OUT)),
                Tag::Paragraph => flush(&mut lines, &mut spans),
                Tag::Item => {
                    flush(&mut lines, &mut spans);
                    spans.push(Span::styled("• ".to_string(), current));
                }
                Tag::Link { dest_url, .. } => {
                    link_url = Some(dest_url.to_string());
                    styles.push(current.patch(palette.link));
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::CodeBlock => {
                    flush(&mut lines, &mut spans);
                    in_code_block = false;
                    styles.pop();
                }
                TagEnd::Heading(_) => {
                    flush(&mut lines, &mut spans);
                    styles.pop();
                }
                TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough => {
                    styles.pop();
                }
                TagEnd::Link => {
                    link_url = None;
                    styles.pop();
                }
                TagEnd::Paragraph | TagEnd::Item => flush(&mut lines, &mut spans),
                _ => {}
            },
            Event::Text(content) => {
                for (i, part) in content.split('\n').enumerate() {
                    if i > 0 {
                        // Keep blank lines inside code blocks
                        if in_code_block {
                            lines.push(Line::from(std::mem::take(&mut spans)));
                        } else {
                            flush(&mut lines, &mut spans);
                        }
                    }
                    if part.is_empty() {
                        continue;
                    }
                    if in_code_block {
                        spans.push(Span::styled(part.to_string(), current));
                    } else if let Some(url) = &link_url {
                        spans.push(Span::styled(wrap_osc8_hyperlink(url, part), current));
                    } else {
                        spans.extend(text_with_urls(part, current, palette.link));
                    }
                }
            }
            Event::Code(code) => {
                spans.push(Span::styled(code.to_string(), palette.inline_code));
            }
            Event::SoftBreak | Event::HardBreak => flush(&mut lines, &mut spans),
            _ => {}
        }
    }

    flush(&mut lines, &mut spans);
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

/// Split text into spans, turning bare URLs into hyperlinks.
fn text_with_urls(text: &str, base: Style, link: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    for m in URL_REGEX.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(text[last_end..m.start()].to_string(), base));
        }
        spans.push(Span::styled(
            wrap_osc8_hyperlink(m.as_str(), m.as_str()),
            link,
        ));
        last_end = m.end();
    }

    if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base));
    }
    spans
}
