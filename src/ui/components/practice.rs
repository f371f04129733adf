//! Practice tab renderer: guidance, question with options, or final score.

use crate::app::quiz::OptionMark;
use crate::ui::helpers::{pad_to_width, position_cursor, render_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{OptionView, PracticeBody, PracticeView};

const OPTION_MARGIN: usize = 6;

/// Renders the practice body starting at `row`. Returns the next free row.
pub fn render_practice(row: usize, practice: &PracticeView, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    render_centered(current_row, &format!("Mode: {}  (m to switch)", practice.mode_label), &theme.colors.text_dim, cols);
    current_row += 2;

    match &practice.body {
        PracticeBody::Guidance { message, subtitle } => {
            render_centered(current_row + 1, message, &theme.colors.empty_state_fg, cols);
            render_centered(current_row + 2, subtitle, &theme.colors.text_dim, cols);
            current_row + 3
        }
        PracticeBody::Question {
            prompt,
            pinyin_hint,
            options,
            progress,
            correct_so_far,
            feedback,
        } => {
            render_centered(current_row, &progress_label(*progress, *correct_so_far), &theme.colors.text_dim, cols);
            current_row += 2;

            print!("{}", Theme::bold());
            render_centered(current_row, prompt, &theme.colors.text_normal, cols);
            current_row += 1;
            if let Some(hint) = pinyin_hint {
                render_centered(current_row, &format!("({hint})"), &theme.colors.text_dim, cols);
            }
            current_row += 2;

            for option in options {
                render_option(current_row, option, theme, cols);
                current_row += 1;
            }
            current_row += 1;

            if let Some(feedback) = feedback {
                let color = if options.iter().any(|o| o.mark == OptionMark::Incorrect) {
                    &theme.colors.error_fg
                } else {
                    &theme.colors.success_fg
                };
                render_centered(current_row, feedback, color, cols);
            }
            current_row + 1
        }
        PracticeBody::Complete { summary } => {
            print!("{}", Theme::bold());
            render_centered(current_row + 1, "Practice complete!", &theme.colors.success_fg, cols);
            render_centered(
                current_row + 3,
                &format!(
                    "{} of {} correct  ·  {}% accuracy",
                    summary.correct, summary.total, summary.accuracy_percent
                ),
                &theme.colors.text_normal,
                cols,
            );
            render_centered(current_row + 5, "Press r to practice again", &theme.colors.text_dim, cols);
            current_row + 6
        }
    }
}

fn progress_label((answered, total): (usize, usize), correct_so_far: usize) -> String {
    format!("Answered {answered}/{total}  ·  {correct_so_far} correct")
}

fn render_option(row: usize, option: &OptionView, theme: &Theme, cols: usize) {
    let (symbol, color) = match option.mark {
        OptionMark::Open => (" ", &theme.colors.text_normal),
        OptionMark::Correct => ("✓", &theme.colors.success_fg),
        OptionMark::Incorrect => ("✗", &theme.colors.error_fg),
        OptionMark::Frozen => (" ", &theme.colors.text_dim),
    };
    let width = cols.saturating_sub(OPTION_MARGIN * 2);
    let line = pad_to_width(&format!("{symbol} {}. {}", option.key, option.text), width);

    position_cursor(row, 1);
    print!("{}", " ".repeat(OPTION_MARGIN));
    print!("{}", Theme::fg(color));
    if option.mark == OptionMark::Correct {
        print!("{}", Theme::bold());
    }
    print!("{line}");
    print!("{}", Theme::reset());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_label_counts_answered_questions() {
        assert_eq!(progress_label((0, 3), 0), "Answered 0/3  ·  0 correct");
        assert_eq!(progress_label((2, 3), 1), "Answered 2/3  ·  1 correct");
    }
}
