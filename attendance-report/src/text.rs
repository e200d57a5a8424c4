//! Text measurement and fitting for the builtin Helvetica faces.
//!
//! Widths come from the standard Helvetica AFM tables in 1/1000 em. Latin-1
//! accented letters are measured as their base letter; anything else unknown
//! falls back to the width of `n`.

pub const ELLIPSIS: &str = "…";

/// Drawn in place of an empty value so a cell never looks accidentally blank.
pub const EMPTY_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

// ASCII 0x20..=0x7E, index = byte - 0x20
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl Font {
    fn table(self) -> &'static [u16; 95] {
        match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_units(self, c: char) -> u16 {
        let table = self.table();
        let lookup = |c: char| table[(c as usize) - 0x20];
        match c {
            ' '..='~' => lookup(c),
            '…' | '—' => 1000,
            '–' => 556,
            '·' => 278,
            '\u{a0}' => lookup(' '),
            _ => match fold_latin1(c) {
                Some(base) => lookup(base),
                None => lookup('n'),
            },
        }
    }

    /// Width of `text` in points at `size`
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_units(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

fn fold_latin1(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => return None,
    };
    Some(base)
}

/// Greedy word wrap. Every line fits `max_width` except a single word that is
/// wider than `max_width` on its own, which is emitted as-is. Never returns an
/// empty vector.
pub fn wrap_lines(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(EMPTY_PLACEHOLDER.to_string());
    }
    lines
}

/// Return `text` unchanged if it fits, otherwise the longest prefix that fits
/// with an ellipsis appended.
pub fn fit_with_ellipsis(text: &str, font: Font, size: f32, max_width: f32) -> String {
    if font.text_width(text, size) <= max_width {
        return text.to_string();
    }
    truncate_with_ellipsis(text, font, size, max_width)
}

/// Always end in an ellipsis, dropping trailing characters until the result
/// fits. Falls back to the bare ellipsis.
pub fn truncate_with_ellipsis(text: &str, font: Font, size: f32, max_width: f32) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    loop {
        let prefix: String = chars.iter().collect();
        let prefix = prefix.trim_end();
        if prefix.is_empty() {
            return ELLIPSIS.to_string();
        }
        let candidate = format!("{}{}", prefix, ELLIPSIS);
        if font.text_width(&candidate, size) <= max_width {
            return candidate;
        }
        chars.pop();
    }
}

/// Wrap into at most `max_lines` lines. When the text needs more, the last
/// kept line is truncated with an ellipsis to mark the cut. A kept line that
/// is a single word wider than the cell is shortened the same way.
pub fn wrap_clamped(
    text: &str,
    font: Font,
    size: f32,
    max_width: f32,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = wrap_lines(text, font, size, max_width);
    let cut = max_lines > 0 && lines.len() > max_lines;
    if cut {
        lines.truncate(max_lines);
    }

    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if cut && i == last {
                truncate_with_ellipsis(line, font, size, max_width)
            } else {
                fit_with_ellipsis(line, font, size, max_width)
            }
        })
        .collect()
}

/// Limit a value to `budget` characters, marking the cut with an ellipsis.
pub fn clamp_chars(text: &str, budget: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let kept: String = text.chars().take(budget.saturating_sub(1)).collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

/// Single-line cell value: blank becomes the placeholder, then clamp to the
/// character budget, then to the pixel width.
pub fn fit_cell(text: &str, budget: usize, font: Font, size: f32, max_width: f32) -> String {
    if text.trim().is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    fit_with_ellipsis(&clamp_chars(text, budget), font, size, max_width)
}
