//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows for one frame
#[derive(Debug, Clone, Copy)]
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub current_step: usize,
    /// `None` for engines that generate steps live
    pub total_steps: Option<usize>,
    pub is_playing: bool,
    pub is_error: bool,
}

impl StatusRenderData<'_> {
    fn step_text(&self) -> String {
        match self.total_steps {
            Some(total) => format!(" Step {}/{} ", self.current_step + 1, total),
            None => format!(" Step {}/? ", self.current_step + 1),
        }
    }

    fn badge(&self) -> Option<(&'static str, Color)> {
        let at_end = self
            .total_steps
            .is_some_and(|total| self.current_step + 1 >= total);
        if self.is_playing {
            Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
        } else if at_end {
            Some((" END ", DEFAULT_THEME.error))
        } else if self.current_step == 0 {
            Some((" START ", DEFAULT_THEME.success))
        } else {
            None
        }
    }
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left_spans = vec![
        Span::styled(
            data.step_text(),
            Style::default()
                .bg(if data.is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if data.is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let bindings = [
        (" ←/→ ", " step "),
        (" ⎵ ", " play "),
        (" ↵ / ⌫ ", " end/start "),
        (" Tab ", " focus "),
        (" q ", " quit "),
    ];
    let mut right_spans = Vec::new();
    for (idx, (key, desc)) in bindings.iter().enumerate() {
        if idx > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*desc, desc_style));
    }

    if let Some((label, color)) = data.badge() {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            .alignment(Alignment::Right),
        layout[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(current_step: usize, total_steps: Option<usize>, is_playing: bool) -> StatusRenderData<'static> {
        StatusRenderData {
            message: "",
            current_step,
            total_steps,
            is_playing,
            is_error: false,
        }
    }

    #[test]
    fn unknown_total_shows_question_mark() {
        assert_eq!(data(4, None, false).step_text(), " Step 5/? ");
        assert_eq!(data(4, Some(9), false).step_text(), " Step 5/9 ");
    }

    #[test]
    fn playing_badge_wins_over_position() {
        assert_eq!(data(0, Some(3), true).badge().map(|b| b.0), Some(" ▶ PLAYING "));
        assert_eq!(data(2, Some(3), false).badge().map(|b| b.0), Some(" END "));
        assert_eq!(data(0, Some(3), false).badge().map(|b| b.0), Some(" START "));
        assert_eq!(data(1, Some(3), false).badge(), None);
        assert_eq!(data(1, None, false).badge(), None);
    }
}
