//! Empty state component renderer.

use crate::ui::helpers::render_centered;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the placeholder message two rows below `row`, with its subtitle
/// underneath.
///
/// Shown instead of the grid while loading, when the store is empty, and
/// when a search matches nothing.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    render_centered(row + 2, &empty.message, &theme.colors.empty_state_fg, cols);
    if !empty.subtitle.is_empty() {
        print!("{}", Theme::dim());
        render_centered(row + 3, &empty.subtitle, &theme.colors.text_dim, cols);
    }
    row + 4
}
