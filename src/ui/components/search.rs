//! Search bar component renderer.

use crate::ui::helpers::{display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

/// Renders the 3-line search box starting at `row`.
///
/// ```text
/// [margin] ┌──────────────────────────┐ [margin]
/// [margin] │ Search: 爱▏     1 match  │ [margin]
/// [margin] └──────────────────────────┘ [margin]
/// ```
///
/// While typing the border uses the accent color and a cursor follows the
/// query; once applied, the box dims and shows the match count.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if search.is_typing {
        &theme.colors.accent
    } else {
        &theme.colors.border
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let cursor = if search.is_typing { "▏" } else { "" };
    let count = if search.is_typing {
        String::new()
    } else {
        match search.match_count {
            1 => "1 match ".to_string(),
            n => format!("{n} matches "),
        }
    };
    let query_width = inner_width.saturating_sub(display_width(&count));
    let search_text = truncate_to_width(&format!(" Search: {}{cursor}", search.query), query_width);
    let padding = inner_width.saturating_sub(display_width(&search_text) + display_width(&count));

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{search_text}");
    print!("{}", " ".repeat(padding));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{count}");
    print!("{}", Theme::fg(border));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
