//! Counters, loop indices and algorithm-specific state of the current step

use super::array::render_value;
use super::{clamp_scroll, inner_height, pane_block};
use crate::snapshot::{InfoValue, Step};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Keys the state pane already draws
const DRAWN_ELSEWHERE: &[&str] = &["grid", "tree"];

fn format_info(value: &InfoValue) -> Vec<String> {
    match value {
        InfoValue::Int(v) => vec![render_value(*v)],
        InfoValue::Bool(b) => vec![b.to_string()],
        InfoValue::Text(s) => s.lines().map(str::to_string).collect(),
        InfoValue::List(items) => vec![format!(
            "[{}]",
            items.iter().map(|v| render_value(*v)).collect::<Vec<_>>().join(", ")
        )],
        InfoValue::Table(rows) => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| format!("{:>3}", render_value(*v)))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect(),
    }
}

fn info_lines(step: &Step) -> Vec<Line<'static>> {
    let label = Style::default().fg(DEFAULT_THEME.primary).add_modifier(Modifier::BOLD);
    let value = Style::default().fg(DEFAULT_THEME.fg);
    let index = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |v| v.to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("comparisons ", label),
            Span::styled(step.comparisons.to_string(), Style::default().fg(DEFAULT_THEME.number)),
            Span::styled("  swaps ", label),
            Span::styled(step.swaps.to_string(), Style::default().fg(DEFAULT_THEME.number)),
        ]),
        Line::from(vec![
            Span::styled("i ", label),
            Span::styled(index(step.i), value),
            Span::styled("  j ", label),
            Span::styled(index(step.j), value),
        ]),
    ];

    for (key, entry) in &step.info {
        if DRAWN_ELSEWHERE.contains(&key.as_str()) {
            continue;
        }
        let rendered = format_info(entry);
        if rendered.len() == 1 {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", key), label),
                Span::styled(rendered[0].clone(), value),
            ]));
        } else {
            lines.push(Line::styled(key.clone(), label));
            lines.extend(rendered.into_iter().map(|r| Line::styled(format!("  {}", r), value)));
        }
    }
    lines
}

pub fn render_info_pane(frame: &mut Frame, area: Rect, step: &Step, is_focused: bool, scroll: &mut usize) {
    let block = pane_block(" Info ", is_focused);
    let lines = info_lines(step);
    clamp_scroll(scroll, lines.len(), inner_height(area));
    let visible: Vec<Line> = lines.into_iter().skip(*scroll).collect();
    frame.render_widget(
        Paragraph::new(visible).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ArrayElement, INFINITY};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn lists_show_infinity_symbol() {
        assert_eq!(format_info(&InfoValue::List(vec![0, INFINITY])), vec!["[0, ∞]"]);
    }

    #[test]
    fn grid_and_tree_are_skipped() {
        let step = Step::new(ArrayElement::from_values(&[1]), "x", 0)
            .at(0usize, None)
            .with_info("grid", vec![vec![1i64, 0]])
            .with_info("tree", "[1]")
            .with_info("gcd", 6i64);
        let lines: Vec<String> = info_lines(&step).iter().map(text).collect();
        assert_eq!(lines[1], "i 0  j -");
        assert_eq!(lines[2], "gcd 6");
        assert_eq!(lines.len(), 3);
    }
}
