//! Footer component: transient notice and keybinding hints.

use crate::app::state::NoticeKind;
use crate::ui::helpers::{position_cursor, render_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, NoticeInfo};

/// Renders the keybinding hints centered and dimmed.
///
/// Returns the next free row.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    render_centered(row, &footer.keybindings, &theme.colors.text_dim, cols);
    row + 1
}

/// Renders the notice line; clears it when there is no notice.
pub fn render_notice(row: usize, notice: Option<&NoticeInfo>, theme: &Theme, cols: usize) -> usize {
    let Some(notice) = notice else {
        position_cursor(row, 1);
        print!("{}", " ".repeat(cols));
        return row + 1;
    };

    let (icon, color) = match notice.kind {
        NoticeKind::Success => ("✓", &theme.colors.success_fg),
        NoticeKind::Info => ("•", &theme.colors.info_fg),
        NoticeKind::Error => ("✗", &theme.colors.error_fg),
    };

    print!("{}", Theme::bold());
    render_centered(row, &format!("{icon} {}", notice.text), color, cols);
    row + 1
}
