//! Running narration of the trace, newest line at the bottom

use super::{inner_height, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the narration pane.
///
/// `scroll_back` counts lines scrolled up from the newest entry, so the pane
/// follows the trace until the user scrolls away.
pub fn render_narration_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
    is_focused: bool,
    scroll_back: &mut usize,
) {
    let block = pane_block(" Narration ", is_focused);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(nothing yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = inner_height(area);
    let max_back = lines.len().saturating_sub(visible_height);
    *scroll_back = (*scroll_back).min(max_back);
    let start = max_back - *scroll_back;

    let last = lines.len() - 1;
    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_height)
        .map(|(idx, line)| {
            let style = if idx == last {
                Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            ListItem::new(format!("{:>4}  {}", idx + 1, line)).style(style)
        })
        .collect();

    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
