//! Header component: title bar and tab strip.

use crate::ui::helpers::{center_offset, display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{HeaderInfo, TabInfo};

/// Renders the centered title with the user id right-aligned.
///
/// Returns the next free row. The user id is dropped on panes too narrow to
/// hold both.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate_to_width(&header.title, cols);
    let title_width = display_width(&title);
    let padding = center_offset(&title, cols);

    let user = format!("{} ", header.user);
    let user_width = display_width(&user);
    let show_user = padding + title_width + user_width + 1 <= cols;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{}", " ".repeat(padding));
    print!("{title}");

    if show_user {
        print!("{}", " ".repeat(cols - padding - title_width - user_width));
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{user}");
    } else {
        print!("{}", " ".repeat(cols.saturating_sub(padding + title_width)));
    }

    print!("{}", Theme::reset());
    row + 1
}

/// Renders the tab strip, highlighting the active tab.
pub fn render_tabs(row: usize, tabs: &[TabInfo], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let mut used = 0;

    for tab in tabs {
        let label = format!(" {} {} ", tab.key, tab.title);
        let width = display_width(&label);
        if used + width + 1 > cols {
            break;
        }

        print!(" ");
        if tab.is_active {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{label}");
        print!("{}", Theme::reset());
        used += width + 1;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    row + 1
}
