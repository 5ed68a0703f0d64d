//! The grid alphabet: printable ASCII, space (0x20) through tilde (0x7E).
//!
//! Every pattern and every grid cell is confined to this range. `.` and
//! negated classes are resolved against it, so all compiled automata agree
//! on what "any character" means.

/// Smallest character of the grid alphabet.
pub(crate) const ALPHABET_MIN: char = ' ';
/// Largest character of the grid alphabet.
pub(crate) const ALPHABET_MAX: char = '~';

/// Membership in the grid alphabet.
pub(crate) trait GridChar {
    fn is_grid_char(&self) -> bool;
}

impl GridChar for char {
    fn is_grid_char(&self) -> bool {
        (ALPHABET_MIN..=ALPHABET_MAX).contains(self)
    }
}

/// Sort inclusive ranges and merge any that overlap or touch.
pub(crate) fn normalize(ranges: &[(char, char)]) -> Vec<(char, char)> {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<(char, char)> = Vec::with_capacity(sorted.len());
    for (min, max) in sorted {
        match merged.last_mut() {
            // Touching counts: ('a','c') + ('d','f') is one range.
            Some((_, prev_max)) if min as u32 <= *prev_max as u32 + 1 => {
                if max > *prev_max {
                    *prev_max = max;
                }
            }
            _ => merged.push((min, max)),
        }
    }
    merged
}

/// The alphabet minus the given ranges: the gaps left between them, clamped
/// to the alphabet bounds. Input ranges outside the alphabet are ignored by
/// construction (the parser rejects such characters first).
pub(crate) fn complement(ranges: &[(char, char)]) -> Vec<(char, char)> {
    let mut gaps = Vec::new();
    let mut next = ALPHABET_MIN as u32;

    for (min, max) in normalize(ranges) {
        if (min as u32) > next {
            // ASCII range, so the u8 casts cannot truncate
            gaps.push((next as u8 as char, (min as u32 - 1) as u8 as char));
        }
        next = next.max(max as u32 + 1);
    }
    if next <= ALPHABET_MAX as u32 {
        gaps.push((next as u8 as char, ALPHABET_MAX));
    }
    gaps
}
