//! Bracket subscript parsing: slices, indices, wildcards, and unions.

use crate::{ParseError, SetKey, SliceDescriptor};

/// A non-filter bracket subscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscript {
    /// Bare signed integer, negative counts from the end.
    Index(isize),
    Slice(SliceDescriptor),
    /// Bare `*`.
    Wildcard,
}

/// Parse a bracket interior as a slice, single index, or wildcard.
///
/// Forms are tried in order: `a:b:c` (empty parts take the descriptor
/// defaults), `a:b`, bare integer, bare `*`. A colon-bearing subscript that
/// does not parse is `ParseError::InvalidSlice`; anything else returns
/// `Ok(None)` so the classifier can fall through to the element-set form.
pub fn parse_slice(subscript: &str, at: usize) -> Result<Option<Subscript>, ParseError> {
    let body = subscript.trim();

    if body.contains(':') {
        let parts: Vec<&str> = body.split(':').collect();
        if parts.len() > 3 {
            return Err(ParseError::InvalidSlice {
                subscript: subscript.to_string(),
                at,
            });
        }
        let defaults = SliceDescriptor::default();
        let start = parse_bound(parts[0], defaults.start)
            .ok_or_else(|| invalid_slice(subscript, at))?;
        let end = parse_bound(parts[1], defaults.end)
            .ok_or_else(|| invalid_slice(subscript, at))?;
        let step = match parts.get(2) {
            Some(part) => {
                parse_bound(part, defaults.step).ok_or_else(|| invalid_slice(subscript, at))?
            }
            None => defaults.step,
        };
        return Ok(Some(Subscript::Slice(SliceDescriptor { start, end, step })));
    }

    if let Ok(index) = body.parse::<isize>() {
        return Ok(Some(Subscript::Index(index)));
    }

    if body == "*" {
        return Ok(Some(Subscript::Wildcard));
    }

    Ok(None)
}

fn parse_bound(part: &str, default: isize) -> Option<isize> {
    let part = part.trim();
    if part.is_empty() {
        return Some(default);
    }
    part.parse::<isize>().ok()
}

fn invalid_slice(subscript: &str, at: usize) -> ParseError {
    ParseError::InvalidSlice {
        subscript: subscript.to_string(),
        at,
    }
}

/// Parse a bracket interior as a union of indices and/or quoted names.
///
/// Accepts `0,2,4`, `'a','b'`, and the single-name access `'store'`. Commas
/// inside quoted names do not split. Returns `None` when any element is
/// neither an integer nor a quoted name.
pub fn parse_set(subscript: &str) -> Option<Vec<SetKey>> {
    let mut keys = Vec::new();
    for item in split_unquoted_commas(subscript.trim()) {
        let item = item.trim();
        if let Some(name) = strip_quotes(item) {
            keys.push(SetKey::Name(unescape(name)));
        } else if let Ok(index) = item.parse::<isize>() {
            keys.push(SetKey::Index(index));
        } else {
            return None;
        }
    }
    if keys.is_empty() {
        return None;
    }
    Some(keys)
}

fn split_unquoted_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        match c {
            '\'' if prev != '\\' => in_quote = !in_quote,
            ',' if !in_quote => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}

fn strip_quotes(item: &str) -> Option<&str> {
    item.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
}

fn unescape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_slice_with_defaults() {
        assert_eq!(
            parse_slice("::", 0).unwrap(),
            Some(Subscript::Slice(SliceDescriptor {
                start: 0,
                end: -1,
                step: 1
            }))
        );
        assert_eq!(
            parse_slice("1:3:2", 0).unwrap(),
            Some(Subscript::Slice(SliceDescriptor {
                start: 1,
                end: 3,
                step: 2
            }))
        );
        assert_eq!(
            parse_slice("0:-1:2", 0).unwrap(),
            Some(Subscript::Slice(SliceDescriptor {
                start: 0,
                end: -1,
                step: 2
            }))
        );
    }

    #[test]
    fn two_part_slice_defaults_step() {
        assert_eq!(
            parse_slice("1:", 0).unwrap(),
            Some(Subscript::Slice(SliceDescriptor {
                start: 1,
                end: -1,
                step: 1
            }))
        );
    }

    #[test]
    fn bare_index_and_wildcard() {
        assert_eq!(parse_slice("-1", 0).unwrap(), Some(Subscript::Index(-1)));
        assert_eq!(parse_slice(" 4 ", 0).unwrap(), Some(Subscript::Index(4)));
        assert_eq!(parse_slice("*", 0).unwrap(), Some(Subscript::Wildcard));
    }

    #[test]
    fn malformed_colon_subscript_is_invalid_slice() {
        assert!(matches!(
            parse_slice("1:x", 7),
            Err(ParseError::InvalidSlice { at: 7, .. })
        ));
        assert!(matches!(
            parse_slice("1:2:3:4", 0),
            Err(ParseError::InvalidSlice { .. })
        ));
    }

    #[test]
    fn unrecognized_subscript_falls_through() {
        assert_eq!(parse_slice("abc", 0).unwrap(), None);
    }

    #[test]
    fn element_sets() {
        assert_eq!(
            parse_set("0,2,4"),
            Some(vec![SetKey::Index(0), SetKey::Index(2), SetKey::Index(4)])
        );
        assert_eq!(
            parse_set("'a', 'b'"),
            Some(vec![
                SetKey::Name("a".to_string()),
                SetKey::Name("b".to_string())
            ])
        );
        assert_eq!(parse_set("'store'"), Some(vec![SetKey::Name("store".to_string())]));
        assert_eq!(
            parse_set("'x,y',1"),
            Some(vec![SetKey::Name("x,y".to_string()), SetKey::Index(1)])
        );
        assert_eq!(parse_set("abc"), None);
        assert_eq!(parse_set("0,abc"), None);
    }
}
