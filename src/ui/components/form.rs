//! Add-character form renderer.

use crate::ui::helpers::{pad_to_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FormView;

const LABEL_WIDTH: usize = 18;
const FORM_MARGIN: usize = 4;

/// Renders one line per field starting at `row`, with a blank line between
/// fields. Returns the next free row.
pub fn render_form(row: usize, form: &FormView, theme: &Theme, cols: usize) -> usize {
    let value_width = cols.saturating_sub(FORM_MARGIN * 2 + LABEL_WIDTH + 2);
    let mut current_row = row + 1;

    for field in &form.fields {
        let marker = if field.is_focused { "›" } else { " " };
        let required = if field.is_required { "*" } else { "" };
        let label = pad_to_width(&format!("{}{required}", field.label), LABEL_WIDTH);
        let cursor = if field.is_focused { "▏" } else { "" };
        let value = truncate_to_width(&format!("{}{cursor}", field.value), value_width);

        position_cursor(current_row, 1);
        print!("{}", " ".repeat(FORM_MARGIN - 2));
        print!("{}", Theme::fg(&theme.colors.accent));
        print!("{marker} ");
        if field.is_focused {
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(&theme.colors.accent));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_dim));
        }
        print!("{label}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("  {}", pad_to_width(&value, value_width));
        print!("{}", Theme::reset());

        current_row += 2;
    }

    position_cursor(current_row, 1);
    print!("{}", " ".repeat(FORM_MARGIN));
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("* required");
    print!("{}", Theme::reset());

    current_row + 1
}
