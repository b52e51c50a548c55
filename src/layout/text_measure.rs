//! Text Measurement
//!
//! A ready-made measure function for leaves that hold text, sized in
//! monospace cells. Character widths come from `unicode-width`:
//! - ASCII printable: 1 cell
//! - CJK and most emoji: 2 cells
//! - Control and zero-width characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::engine::{measure_func, MeasureFunc};
use crate::types::is_undefined;

/// Display width of a string in cells.
pub fn string_width(s: &str) -> usize {
    s.width()
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Wrap text to at most `width` cells per line.
///
/// Breaks at spaces where possible and inside words that are wider than a
/// whole line. Explicit newlines always break. A width of `0` is the
/// narrowest wrap: every word on its own line, none split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return text
            .split('\n')
            .flat_map(|paragraph| {
                let words: Vec<String> = paragraph
                    .split(' ')
                    .filter(|word| !word.is_empty())
                    .map(str::to_string)
                    .collect();
                if words.is_empty() { vec![String::new()] } else { words }
            })
            .collect();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split(' ') {
            let word_width = string_width(word);
            let gap = usize::from(!line.is_empty());

            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            // Hard-break words that cannot fit on a line of their own
            for c in word.chars() {
                let w = char_width(c);
                if line_width + w > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }

        lines.push(line);
    }

    lines
}

/// Size of `text` laid out at `available_width` cells.
///
/// `UNDEFINED` width means no wrapping. Returns `(width, height)` where
/// height is the number of lines.
pub fn measure_text(text: &str, available_width: f32) -> (f32, f32) {
    if text.is_empty() {
        return (0.0, 0.0);
    }

    let lines = if is_undefined(available_width) {
        text.split('\n').map(str::to_string).collect()
    } else {
        wrap_text(text, available_width.max(0.0).floor() as usize)
    };

    let widest = lines.iter().map(|line| string_width(line)).max().unwrap_or(0);
    (widest as f32, lines.len() as f32)
}

/// Measure function for a leaf displaying `text`.
pub fn text_measure_func(text: impl Into<String>) -> MeasureFunc {
    let text = text.into();
    measure_func(move |_, width, out| {
        let (w, h) = measure_text(&text, width);
        out.width = w;
        out.height = h;
    })
}
