//! Shared rendering utilities.
//!
//! Chinese glyphs occupy two terminal cells, so every padding and truncation
//! computation goes through [`display_width`] rather than `str::len`.

use crate::ui::theme::Theme;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Moves the cursor to `row`, `col` (both 1-indexed).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Terminal cell width of `text`.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cuts `text` to at most `max_width` cells, ending with `…` when cut.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Pads `text` with spaces on the right to exactly `width` cells, truncating
/// first if it is wider.
#[must_use]
pub fn pad_to_width(text: &str, width: usize) -> String {
    let fitted = truncate_to_width(text, width);
    let padding = width.saturating_sub(display_width(&fitted));
    format!("{fitted}{}", " ".repeat(padding))
}

/// Left padding that centers `text` within `cols`.
#[must_use]
pub fn center_offset(text: &str, cols: usize) -> usize {
    cols.saturating_sub(display_width(text)) / 2
}

/// Prints `text` centered on `row`, filling the line in `color`.
pub fn render_centered(row: usize, text: &str, color: &str, cols: usize) {
    let fitted = truncate_to_width(text, cols);
    let padding = center_offset(&fitted, cols);

    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", " ".repeat(padding));
    print!("{fitted}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + display_width(&fitted))));
    print!("{}", Theme::reset());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hanzi_are_two_cells_wide() {
        assert_eq!(display_width("好"), 2);
        assert_eq!(display_width("我爱你"), 6);
        assert_eq!(display_width("hǎo"), 3);
    }

    #[test]
    fn truncation_respects_wide_glyphs() {
        let cut = truncate_to_width("我爱你", 5);
        assert_eq!(cut, "我爱…");
        assert!(display_width(&cut) <= 5);
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("love", 10), "love");
        assert_eq!(pad_to_width("好", 4), "好  ");
    }

    #[test]
    fn centering_uses_cell_width() {
        assert_eq!(center_offset("好", 10), 4);
        assert_eq!(center_offset("too wide", 4), 0);
    }
}
