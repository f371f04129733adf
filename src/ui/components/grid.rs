//! Card grid component renderer.
//!
//! Each card is [`CARD_WIDTH`] x [`CARD_HEIGHT`] cells: a frame with the glyph
//! on the first inner line and the pinyin on the second.

use crate::ui::helpers::{center_offset, display_width, position_cursor, truncate_to_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CardItem, CARD_GAP, CARD_HEIGHT, CARD_WIDTH, GRID_MARGIN};

/// Renders `cards` row-major in `columns` columns starting at `row`.
///
/// Returns the row after the last card row.
pub fn render_grid(row: usize, cards: &[CardItem], columns: usize, theme: &Theme) -> usize {
    let mut current_row = row;

    for chunk in cards.chunks(columns.max(1)) {
        for (column, card) in chunk.iter().enumerate() {
            let col = GRID_MARGIN + 1 + column * (CARD_WIDTH + CARD_GAP);
            render_card(current_row, col, card, theme);
        }
        current_row += CARD_HEIGHT;
    }

    current_row
}

fn render_card(row: usize, col: usize, card: &CardItem, theme: &Theme) {
    let inner = CARD_WIDTH - 2;
    let frame = if card.is_selected {
        &theme.colors.accent
    } else {
        &theme.colors.border
    };

    position_cursor(row, col);
    print!("{}", Theme::fg(frame));
    print!("╭{}╮", "─".repeat(inner));

    let lines = [
        (truncate_to_width(&card.character, inner), &theme.colors.glyph_fg, true),
        (truncate_to_width(&card.pinyin, inner), &theme.colors.text_dim, false),
    ];

    for (offset, (text, color, bold)) in lines.iter().enumerate() {
        let left = center_offset(text, inner);
        let right = inner - left - display_width(text);

        position_cursor(row + 1 + offset, col);
        print!("{}", Theme::fg(frame));
        print!("│");
        if card.is_selected {
            print!("{}", Theme::bg(&theme.colors.selection_bg));
            print!("{}", Theme::fg(&theme.colors.selection_fg));
        } else {
            print!("{}", Theme::fg(color));
        }
        if *bold {
            print!("{}", Theme::bold());
        }
        print!("{}{text}{}", " ".repeat(left), " ".repeat(right));
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(frame));
        print!("│");
    }

    position_cursor(row + CARD_HEIGHT - 1, col);
    print!("╰{}╯", "─".repeat(inner));
    print!("{}", Theme::reset());
}
