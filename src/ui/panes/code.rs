//! Pseudocode pane
//!
//! Shows the algorithm's listing with the step's `code_line` highlighted and
//! keeps that line at a fixed visual row while stepping.

use super::{inner_height, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const KEYWORDS: &[&str] = &[
    "for", "while", "if", "else", "return", "repeat", "to", "and", "or", "not", "each", "in",
    "continue", "procedure", "function", "until", "times", "with",
];

/// Keyword, number and call highlighting for one pseudocode line
fn highlight_pseudocode(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>, next: Option<char>| {
        if word.is_empty() {
            return;
        }
        let style = if KEYWORDS.contains(&word.as_str()) {
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD)
        } else if word.chars().all(|c| c.is_ascii_digit()) {
            Style::default().fg(DEFAULT_THEME.number)
        } else if next == Some('(') {
            Style::default().fg(DEFAULT_THEME.function)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        spans.push(Span::styled(std::mem::take(word), style));
    };

    for c in line.chars() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
        } else {
            flush(&mut word, &mut spans, Some(c));
            spans.push(Span::styled(c.to_string(), Style::default().fg(DEFAULT_THEME.fg)));
        }
    }
    flush(&mut word, &mut spans, None);
    Line::from(spans)
}

/// Scroll state for the code pane
#[derive(Debug, Default)]
pub struct CodeScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the pseudocode pane; `current_line` is zero-based
pub fn render_code_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    listing: &[&str],
    current_line: usize,
    is_focused: bool,
    scroll: &mut CodeScrollState,
) {
    let title = format!(" {} ", title);
    let block = pane_block(&title, is_focused);
    let visible_height = inner_height(area);

    let target_row = scroll
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll.target_line_row = Some(target_row);

    scroll.offset = current_line.saturating_sub(target_row);
    if listing.len() > visible_height {
        scroll.offset = scroll.offset.min(listing.len() - visible_height);
    } else {
        scroll.offset = 0;
    }

    let lines: Vec<Line> = listing
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(visible_height)
        .map(|(idx, text)| {
            let is_current = idx == current_line;
            let (marker, num_style) = if is_current {
                (
                    "▶",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" ", Style::default().fg(DEFAULT_THEME.comment))
            };

            let mut content = highlight_pseudocode(text);
            if is_current {
                for span in &mut content.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
            }

            let mut spans = vec![Span::styled(format!("{}{:3} ", marker, idx + 1), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_numbers_are_split_out() {
        let line = highlight_pseudocode("for i = 0 to n");
        let words: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(words, vec!["for", " ", "i", " ", "=", " ", "0", " ", "to", " ", "n"]);
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(line.spans[6].style.fg, Some(DEFAULT_THEME.number));
    }
}
