//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar and tab strip
//! - [`footer`]: Notice line and keybinding hints
//! - [`search`]: Search input box
//! - [`grid`]: Character cards
//! - [`detail`]: Detail overlay with delete confirmation
//! - [`form`]: Add-character form
//! - [`practice`]: Quiz question, guidance and score
//! - [`empty`]: Placeholder for an empty grid
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Tabs]
//! [Border]
//! [Body: grid / form / practice]
//! [Notice]
//! [Border]
//! [Footer]
//! ```

mod detail;
mod empty;
mod footer;
mod form;
mod grid;
mod header;
mod practice;
mod search;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BodyView, GridView, UIViewModel, FOOTER_ROWS};

/// Renders a horizontal border line at `row`. Returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders a complete frame.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2; // row 1 stays blank

    current_row = header::render_header(current_row, &vm.header, theme, cols);
    current_row = header::render_tabs(current_row, &vm.tabs, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    let body_top = current_row;

    match &vm.body {
        BodyView::Grid(grid) => render_grid_body(current_row, grid, theme, cols),
        BodyView::Form(form) => {
            form::render_form(current_row, form, theme, cols);
        }
        BodyView::Practice(practice) => {
            practice::render_practice(current_row + 1, practice, theme, cols);
        }
    }

    let footer_row = rows;
    let border_row = rows.saturating_sub(1);
    let notice_row = rows.saturating_sub(FOOTER_ROWS - 1);

    if let Some(detail) = &vm.overlay {
        detail::render_detail(detail, theme, body_top, notice_row, cols);
    }

    footer::render_notice(notice_row, vm.notice.as_ref(), theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    footer::render_footer(footer_row, &vm.footer, theme, cols);
}

fn render_grid_body(row: usize, grid: &GridView, theme: &Theme, cols: usize) {
    let mut current_row = row;

    if let Some(search) = &grid.search_bar {
        current_row = search::render_search_bar(current_row, search, theme, cols);
    }

    if let Some(empty) = &grid.empty_state {
        empty::render_empty_state(current_row, empty, theme, cols);
        return;
    }

    grid::render_grid(current_row, &grid.cards, grid.columns, theme);
}
