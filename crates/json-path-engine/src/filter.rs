//! Filter subscript parsing.
//!
//! The grammar is self-referential here: a filter's subject is itself a full
//! path expression rooted at `@`, compiled through the same cache as the
//! enclosing path.

use crate::{FilterDescriptor, FilterKind, Operator, ParseError, PathCache};

/// Parse a bracket interior as a filter descriptor.
///
/// Returns `Ok(None)` unless the interior has the outer shape `?( ... )` or
/// `( ... )`, letting the classifier fall through to slice parsing. A failed
/// compilation of the filter subject maps to
/// [`ParseError::InvalidFilterSubject`].
pub fn parse_filter(
    subscript: &str,
    at: usize,
    cache: &PathCache,
) -> Result<Option<FilterDescriptor>, ParseError> {
    let trimmed = subscript.trim();
    let body = match strip_wrapper(trimmed) {
        Some(body) => body,
        None => return Ok(None),
    };

    let (subject, operator, predicate) = match find_operator(body) {
        Some((pos, text, operator)) => (
            body[..pos].trim(),
            Some(operator),
            Some(body[pos + text.len()..].trim().to_string()),
        ),
        None => (body.trim(), None, None),
    };

    let (subject, negate) = match subject.strip_prefix('!') {
        Some(rest) => (rest.trim(), true),
        None => (subject, false),
    };

    let compiled = cache
        .compile(subject)
        .map_err(|err| ParseError::InvalidFilterSubject {
            subject: subject.to_string(),
            at,
            reason: err.to_string(),
        })?;

    Ok(Some(FilterDescriptor {
        raw: body.to_string(),
        negate,
        kind: if operator.is_some() {
            FilterKind::Conditional
        } else {
            FilterKind::Existence
        },
        subject: compiled,
        operator,
        predicate,
    }))
}

fn strip_wrapper(subscript: &str) -> Option<&str> {
    if let Some(inner) = subscript.strip_prefix("?(") {
        return inner.strip_suffix(')');
    }
    if let Some(inner) = subscript.strip_prefix('(') {
        return inner.strip_suffix(')');
    }
    None
}

/// Locate the splitting operator. Operators are probed in
/// [`Operator::SCAN_ORDER`]; the first one found anywhere in the body wins,
/// so list position dominates text position.
fn find_operator(body: &str) -> Option<(usize, &'static str, Operator)> {
    for (text, operator) in Operator::SCAN_ORDER {
        if let Some(pos) = body.find(text) {
            return Some((pos, text, operator));
        }
    }
    None
}
