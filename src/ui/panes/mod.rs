//! TUI pane rendering modules
//!
//! Every pane is a stateless render function over the current [`Step`] plus
//! the scroll offset it owns.
//!
//! - [`code`]: pseudocode listing with the executing line highlighted
//! - [`array`]: bars for arrays, cells for grids, an outline for trees
//! - [`info`]: counters, indices and the algorithm's extra state
//! - [`narration`]: descriptions of every step so far
//! - [`status`]: status bar with keybindings and playback state
//!
//! [`Step`]: crate::snapshot::Step

pub mod array;
pub mod code;
pub mod info;
pub mod narration;
pub mod status;

pub use array::render_array_pane;
pub use code::render_code_pane;
pub use info::render_info_pane;
pub use narration::render_narration_pane;
pub use status::{render_status_bar, StatusRenderData};

use crate::snapshot::ArrayElement;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

/// Bordered block whose border reflects focus
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least one
fn inner_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp a scroll offset so the last page stays full
fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}

/// Color for an element, strongest role first
fn element_color(e: &ArrayElement) -> Color {
    if e.is_swapping {
        DEFAULT_THEME.error
    } else if e.is_comparing {
        DEFAULT_THEME.secondary
    } else if e.is_pivot {
        DEFAULT_THEME.pivot
    } else if e.is_selected {
        DEFAULT_THEME.primary
    } else if e.is_sorted {
        DEFAULT_THEME.success
    } else {
        DEFAULT_THEME.fg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapping_outranks_other_roles() {
        let mut e = ArrayElement::new(1, 0);
        e.is_sorted = true;
        e.is_swapping = true;
        assert_eq!(element_color(&e), DEFAULT_THEME.error);
    }

    #[test]
    fn scroll_is_clamped_to_last_page() {
        let mut offset = 50;
        clamp_scroll(&mut offset, 20, 5);
        assert_eq!(offset, 15);
        clamp_scroll(&mut offset, 3, 5);
        assert_eq!(offset, 0);
    }
}
