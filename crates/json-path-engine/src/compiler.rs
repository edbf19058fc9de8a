//! Segment classification and path compilation.

use crate::filter::parse_filter;
use crate::subscript::{parse_set, parse_slice, Subscript};
use crate::tokenizer::{tokenize, RawSegment};
use crate::{CompiledPath, NodeKind, ParseError, PathCache, PathNode};

/// Tokenize and classify `trimmed` into a [`CompiledPath`].
///
/// Callers go through [`PathCache::compile`]; this function does the work on
/// a cache miss. The cache handle is threaded down to the filter parser,
/// which compiles filter subjects recursively.
pub(crate) fn parse_path(trimmed: &str, cache: &PathCache) -> Result<CompiledPath, ParseError> {
    let segments = tokenize(trimmed)?;
    let mut nodes = Vec::with_capacity(segments.len() + 1);

    // Paths may omit the leading `$`; the first node is always a root.
    let first = segments[0].text.as_str();
    if first != "$" && first != "@" {
        nodes.push(PathNode {
            prefix: String::new(),
            segment: "$".to_string(),
            recurse: false,
            subject: None,
            kind: NodeKind::Root,
        });
    }

    let mut prefix = String::new();
    for segment in &segments {
        nodes.push(classify(&prefix, segment, cache)?);
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(&segment.text);
    }

    Ok(CompiledPath {
        source: trimmed.to_string(),
        segments: segments.into_iter().map(|s| s.text).collect(),
        nodes,
    })
}

/// Classify one raw segment into a typed node.
fn classify(prefix: &str, segment: &RawSegment, cache: &PathCache) -> Result<PathNode, ParseError> {
    let text = segment.text.as_str();

    if text == "$" {
        return Ok(plain(prefix, segment, false, None, NodeKind::Root));
    }
    if text == "@" {
        return Ok(plain(prefix, segment, false, None, NodeKind::ContextRoot));
    }

    let recurse = text.starts_with('.');
    let body = text.trim_start_matches('.');
    let dots = text.len() - body.len();

    let open = match body.find('[') {
        None => {
            // An empty body (trailing dot leniency) becomes an empty member
            // name, which matches nothing at evaluation time.
            let subject = Some(body.to_string());
            return Ok(plain(prefix, segment, recurse, subject, NodeKind::Member));
        }
        Some(open) => open,
    };

    let close = match body.rfind(']') {
        Some(close) if close > open => close,
        _ => {
            return Err(ParseError::UnterminatedBracket {
                segment: text.to_string(),
                at: segment.offset,
            });
        }
    };

    let subject = (open > 0).then(|| body[..open].to_string());
    let interior = &body[open + 1..close];
    let interior_at = segment.offset + dots + open + 1;

    let kind = if let Some(filter) = parse_filter(interior, interior_at, cache)? {
        NodeKind::Filter(filter)
    } else if let Some(subscript) = parse_slice(interior, interior_at)? {
        match subscript {
            Subscript::Index(index) => NodeKind::Index(index),
            Subscript::Slice(slice) => NodeKind::Slice(slice),
            Subscript::Wildcard => NodeKind::Wildcard,
        }
    } else if let Some(keys) = parse_set(interior) {
        NodeKind::Set(keys)
    } else {
        return Err(ParseError::InvalidSubscript {
            subscript: interior.to_string(),
            at: interior_at,
        });
    };

    Ok(plain(prefix, segment, recurse, subject, kind))
}

fn plain(
    prefix: &str,
    segment: &RawSegment,
    recurse: bool,
    subject: Option<String>,
    kind: NodeKind,
) -> PathNode {
    PathNode {
        prefix: prefix.to_string(),
        segment: segment.text.clone(),
        recurse,
        subject,
        kind,
    }
}
