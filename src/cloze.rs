use std::ops;

mod locate;
mod scan;

pub use locate::locate;
pub use scan::{scan, scan_sorted};

const OPEN_PREFIX: [char; 3] = ['{', '{', 'c'];
const SEPARATOR: [char; 2] = [':', ':'];
const CLOSE: [char; 2] = ['}', '}'];

/// A well-formed `{{cN::content::hint}}` span. All offsets count characters
/// of the flat text view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClozeSpan {
    pub open_start: usize,
    pub content_start: usize,
    /// Position of the hint separator, or of the closer when there is no hint.
    pub content_end: usize,
    pub close_end: usize,
    /// The `N` of `{{cN::`.
    pub ordinal: u32,
}

impl ClozeSpan {
    pub fn content_range(&self) -> ops::Range<usize> {
        self.content_start..self.content_end
    }

    pub fn outer_range(&self) -> ops::Range<usize> {
        self.open_start..self.close_end
    }

    /// Range of the hint text, without its separator and the closer.
    pub fn hint_range(&self) -> Option<ops::Range<usize>> {
        if self.content_end + SEPARATOR.len() < self.close_end {
            Some(self.content_end + SEPARATOR.len()..self.close_end - CLOSE.len())
        } else {
            None
        }
    }

    /// True when `offset` lies on the span, both ends included.
    pub fn contains(&self, offset: usize) -> bool {
        self.open_start <= offset && offset <= self.close_end
    }

    pub fn encloses(&self, other: &ClozeSpan) -> bool {
        self.open_start <= other.open_start && other.close_end <= self.close_end && self != other
    }

    pub fn content_len(&self) -> usize {
        self.content_end - self.content_start
    }

    pub fn content_text(&self, text: &str) -> String {
        slice_chars(text, self.content_range())
    }

    pub fn hint_text(&self, text: &str) -> Option<String> {
        self.hint_range().map(|range| slice_chars(text, range))
    }
}

fn slice_chars(text: &str, range: ops::Range<usize>) -> String {
    text.chars()
        .skip(range.start)
        .take(range.end.saturating_sub(range.start))
        .collect()
}

/// Matches `{{c` followed by digits and `::` at `pos`. Returns the length of
/// the opener and its ordinal.
fn match_opener(chars: &[char], pos: usize) -> Option<(usize, u32)> {
    if !matches_at(chars, pos, &OPEN_PREFIX) {
        return None;
    }
    let digits_start = pos + OPEN_PREFIX.len();
    let mut idx = digits_start;
    let mut ordinal: u32 = 0;
    while let Some(digit) = chars.get(idx).and_then(|ch| ch.to_digit(10)) {
        ordinal = ordinal.saturating_mul(10).saturating_add(digit);
        idx += 1;
    }
    if idx == digits_start || !matches_at(chars, idx, &SEPARATOR) {
        return None;
    }
    Some((idx + SEPARATOR.len() - pos, ordinal))
}

fn matches_at(chars: &[char], pos: usize, literal: &[char]) -> bool {
    chars
        .get(pos..pos + literal.len())
        .is_some_and(|window| window == literal)
}
