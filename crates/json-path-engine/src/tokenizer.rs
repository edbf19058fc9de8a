//! Path segment tokenizer.
//!
//! Splits a raw path string into structural segments with a single
//! left-to-right scan. Three concerns decide whether a `.` is a segment
//! boundary: bracket depth, quote state, and filter state. Each is modeled
//! as its own type so the transition rules stay exhaustiveness-checked.

use crate::ParseError;

/// One raw segment plus its byte offset within the trimmed source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub text: String,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Outside,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Outside,
    Inside,
}

/// Scan state carried across characters.
#[derive(Debug, Clone, Copy)]
struct Scanner {
    depth: u32,
    quote: QuoteState,
    filter: FilterState,
}

impl Scanner {
    fn new() -> Self {
        Self {
            depth: 0,
            quote: QuoteState::Outside,
            filter: FilterState::Outside,
        }
    }

    /// A `.` splits segments only at top level, outside quotes and filters.
    fn splittable(&self) -> bool {
        self.depth == 0
            && self.quote == QuoteState::Outside
            && self.filter == FilterState::Outside
    }

    /// Advance state for one non-splitting character. `prev` is the raw
    /// previous character (one-char lookbehind), `next` the one-char
    /// lookahead; both drive the quote toggle rules.
    fn step(&mut self, prev: Option<char>, c: char, next: Option<char>) {
        let escaped = prev == Some('\\');

        if c == '\'' && !escaped {
            match self.quote {
                QuoteState::Outside if prev == Some('.') || prev == Some('[') => {
                    self.quote = QuoteState::Inside;
                    return;
                }
                QuoteState::Inside if next == Some(']') || next == Some('.') => {
                    self.quote = QuoteState::Outside;
                    return;
                }
                _ => {}
            }
        }

        if self.quote == QuoteState::Inside {
            return;
        }

        match c {
            '[' => self.depth += 1,
            ']' => self.depth = self.depth.saturating_sub(1),
            '?' | '(' if !escaped && self.filter == FilterState::Outside => {
                self.filter = FilterState::Inside;
            }
            ')' if !escaped && self.filter == FilterState::Inside => {
                self.filter = FilterState::Outside;
            }
            _ => {}
        }
    }
}

/// Split `text` into raw path segments.
///
/// Consecutive dots never produce empty segments: the first dot splits, the
/// rest fold into the next segment as its leading recursion marker. State
/// left open at end of input (unterminated bracket, quote, or filter) is
/// discarded rather than rejected; the final buffer is always emitted, even
/// when empty.
pub fn tokenize(text: &str) -> Result<Vec<RawSegment>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyPath);
    }

    let chars: Vec<(usize, char)> = trimmed.char_indices().collect();
    let mut scanner = Scanner::new();
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut buffer_at = 0usize;
    let mut prev: Option<char> = None;

    for (i, &(at, c)) in chars.iter().enumerate() {
        let next = chars.get(i + 1).map(|&(_, n)| n);

        if c == '.' && scanner.splittable() && prev != Some('.') {
            if !buffer.is_empty() {
                segments.push(RawSegment {
                    text: std::mem::take(&mut buffer),
                    offset: buffer_at,
                });
            }
            prev = Some('.');
            continue;
        }

        scanner.step(prev, c, next);
        if buffer.is_empty() {
            buffer_at = at;
        }
        buffer.push(c);
        prev = Some(c);
    }

    let offset = if buffer.is_empty() {
        trimmed.len()
    } else {
        buffer_at
    };
    segments.push(RawSegment {
        text: buffer,
        offset,
    });

    Ok(segments)
}
