//! Detail overlay: every field of one character in a centered box.

use crate::ui::helpers::{pad_to_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailView;

const LABEL_WIDTH: usize = 17;
const MAX_BOX_WIDTH: usize = 60;

/// Draws the overlay box vertically centered between `top` and `bottom`.
pub fn render_detail(detail: &DetailView, theme: &Theme, top: usize, bottom: usize, cols: usize) {
    let box_width = cols.saturating_sub(4).min(MAX_BOX_WIDTH).max(LABEL_WIDTH + 6);
    let inner = box_width - 2;
    let left = cols.saturating_sub(box_width) / 2 + 1;

    let mut lines: Vec<(String, &str)> = vec![
        (String::new(), theme.colors.text_normal.as_str()),
        (format!("  {}", detail.character), theme.colors.glyph_fg.as_str()),
        (String::new(), theme.colors.text_normal.as_str()),
    ];
    for (label, value) in [
        ("Pinyin", &detail.pinyin),
        ("Meaning", &detail.meaning),
        ("Example", &detail.example),
        ("Example meaning", &detail.example_meaning),
    ] {
        lines.push((
            format!("  {}{value}", pad_to_width(label, LABEL_WIDTH - 2)),
            theme.colors.text_normal.as_str(),
        ));
    }
    lines.push((String::new(), theme.colors.text_normal.as_str()));
    match &detail.confirm_prompt {
        Some(prompt) => lines.push((format!("  {prompt}"), theme.colors.error_fg.as_str())),
        None => lines.push(("  d: delete  ESC: close".to_string(), theme.colors.text_dim.as_str())),
    }

    let height = lines.len() + 2;
    let available = bottom.saturating_sub(top);
    let start = top + available.saturating_sub(height) / 2;
    let frame = &theme.colors.accent;

    position_cursor(start, left);
    print!("{}┌{}┐{}", Theme::fg(frame), "─".repeat(inner), Theme::reset());

    for (offset, (text, color)) in lines.iter().enumerate() {
        let fitted = pad_to_width(text, inner);
        position_cursor(start + 1 + offset, left);
        print!("{}│{}", Theme::fg(frame), Theme::fg(color));
        if offset == 1 {
            print!("{}", Theme::bold());
        }
        print!("{fitted}");
        print!("{}{}│{}", Theme::reset(), Theme::fg(frame), Theme::reset());
    }

    position_cursor(start + height - 1, left);
    print!("{}└{}┘{}", Theme::fg(frame), "─".repeat(inner), Theme::reset());
}
