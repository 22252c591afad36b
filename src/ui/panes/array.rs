//! Primary visual state pane
//!
//! A step is drawn one of three ways:
//! - `info["grid"]` present: a cell map (Game of Life, maze)
//! - `info["tree"]` present: the tree outline above its key row
//! - otherwise: one horizontal bar per array slot

use super::{clamp_scroll, element_color, inner_height, pane_block};
use crate::snapshot::{ArrayElement, InfoValue, Step, INFINITY};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Columns kept for the index gutter and the value label around a bar
const BAR_CHROME: usize = 18;

pub fn render_array_pane(frame: &mut Frame, area: Rect, step: &Step, is_focused: bool, scroll: &mut usize) {
    let block = pane_block(" State ", is_focused);
    let lines = if let Some(rows) = step.info.get("grid").and_then(InfoValue::as_table) {
        // maze steps mark their entrance; live cells there are walls
        let fill = if step.info.contains_key("entrance") {
            DEFAULT_THEME.wall
        } else {
            DEFAULT_THEME.success
        };
        grid_lines(rows, fill)
    } else if let Some(outline) = step.info.get("tree").and_then(InfoValue::as_text) {
        tree_lines(outline, &step.array)
    } else if step.array.is_empty() {
        let style = if step.is_error() {
            Style::default().fg(DEFAULT_THEME.error)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };
        vec![Line::styled("(empty)", style)]
    } else {
        let width = (area.width as usize).saturating_sub(2 + BAR_CHROME).max(1);
        bar_lines(&step.array, width)
    };

    clamp_scroll(scroll, lines.len(), inner_height(area));
    let visible: Vec<Line> = lines.into_iter().skip(*scroll).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
}

pub(crate) fn render_value(value: i64) -> String {
    if value == INFINITY {
        "∞".to_string()
    } else {
        value.to_string()
    }
}

fn bar_lines(array: &[ArrayElement], width: usize) -> Vec<Line<'static>> {
    let max = array
        .iter()
        .filter(|e| e.value != INFINITY)
        .map(|e| e.value.unsigned_abs())
        .max()
        .unwrap_or(0)
        .max(1);

    array
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            let color = element_color(e);
            let len = if e.value == INFINITY {
                0
            } else {
                ((e.value.unsigned_abs() as u128 * width as u128) / max as u128) as usize
            };
            let mut label_style = Style::default().fg(color);
            if e.is_comparing || e.is_swapping {
                label_style = label_style.add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                Span::styled(format!("{:>4} ", idx), Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled("█".repeat(len.max(usize::from(e.value != 0 && e.value != INFINITY))), Style::default().fg(color)),
                Span::styled(format!(" {}", render_value(e.value)), label_style),
            ])
        })
        .collect()
}

fn grid_lines(rows: &[Vec<i64>], fill: Color) -> Vec<Line<'static>> {
    rows.iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&cell| {
                    if cell != 0 {
                        Span::styled("██", Style::default().fg(fill))
                    } else {
                        Span::styled("  ", Style::default())
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn tree_lines(outline: &str, array: &[ArrayElement]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = outline
        .lines()
        .map(|l| Line::styled(l.to_string(), Style::default().fg(DEFAULT_THEME.fg)))
        .collect();
    lines.push(Line::default());
    let keys: Vec<Span> = array
        .iter()
        .map(|e| {
            let text = match as_letter(e.value) {
                Some(c) => format!(" {} ", c),
                None => format!(" {} ", render_value(e.value)),
            };
            Span::styled(text, Style::default().fg(element_color(e)))
        })
        .collect();
    lines.push(Line::from(keys));
    lines
}

/// Trie slots carry character codes
fn as_letter(value: i64) -> Option<char> {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .filter(|c| c.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinity_renders_as_symbol() {
        assert_eq!(render_value(INFINITY), "∞");
        assert_eq!(render_value(-4), "-4");
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        let array = vec![ArrayElement::new(2, 0), ArrayElement::new(4, 1), ArrayElement::new(INFINITY, 2)];
        let lines = bar_lines(&array, 10);
        let bar = |l: &Line| l.spans[1].content.chars().count();
        assert_eq!(bar(&lines[0]), 5);
        assert_eq!(bar(&lines[1]), 10);
        assert_eq!(bar(&lines[2]), 0);
    }

    #[test]
    fn letters_only_for_alphabetic_codes() {
        assert_eq!(as_letter('a' as i64), Some('a'));
        assert_eq!(as_letter(7), None);
        assert_eq!(as_letter(-1), None);
    }
}
