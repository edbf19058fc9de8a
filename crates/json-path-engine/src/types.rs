//! Compiled path AST types.

use std::fmt;
use std::sync::Arc;

/// A fully compiled path expression.
///
/// Immutable once constructed. The [`PathCache`](crate::PathCache) publishes
/// compiled paths as `Arc<CompiledPath>`, so every caller compiling the same
/// trimmed source text shares one AST.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    /// Trimmed source text the path was compiled from.
    pub source: String,
    /// Raw segment strings, in order, as produced by the tokenizer.
    pub segments: Vec<String>,
    /// Classified nodes, one per segment (plus an implicit leading root
    /// when the source does not start with `$` or `@`).
    pub nodes: Vec<PathNode>,
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// One classified path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    /// Dot-joined text of the segments preceding this one, for diagnostics.
    pub prefix: String,
    /// Raw segment text, leading recursion dots included.
    pub segment: String,
    /// Reached via `..`: the node's criterion matches at every descendant
    /// depth, not just immediate children.
    pub recurse: bool,
    /// Member name (or `*`) preceding any bracket subscript. Absent for
    /// pure-bracket segments such as `[0]`.
    pub subject: Option<String>,
    pub kind: NodeKind,
}

/// What a path node selects.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `$` — resets the working set to the document root.
    Root,
    /// `@` — the candidate under test; valid only as the first node of a
    /// filter subject path.
    ContextRoot,
    /// Plain member access (or name-level wildcard), no subscript.
    Member,
    /// `[n]` single index, negative counts from the end.
    Index(isize),
    /// `[a:b:c]` slice subscript.
    Slice(SliceDescriptor),
    /// `[*]` whole-element wildcard.
    Wildcard,
    /// `[?(...)]` or `[(...)]` filter subscript.
    Filter(FilterDescriptor),
    /// `[0,2]` / `['a','b']` union subscript.
    Set(Vec<SetKey>),
}

/// Slice bounds as written, resolved against sequence length at evaluation.
///
/// `end = -1` is a sentinel for "last index, inclusive": bounds are inclusive
/// once negative values have been resolved as `len + value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceDescriptor {
    pub start: isize,
    pub end: isize,
    pub step: isize,
}

impl Default for SliceDescriptor {
    fn default() -> Self {
        Self {
            start: 0,
            end: -1,
            step: 1,
        }
    }
}

/// One key of a union subscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetKey {
    Index(isize),
    Name(String),
}

/// A parsed filter subscript.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDescriptor {
    /// Filter body as written, wrapper stripped.
    pub raw: String,
    /// Leading `!` on the subject inverts the outcome.
    pub negate: bool,
    pub kind: FilterKind,
    /// Compiled subject path, rooted at `@`, evaluated once per candidate.
    pub subject: Arc<CompiledPath>,
    /// Present iff `kind` is [`FilterKind::Conditional`].
    pub operator: Option<Operator>,
    /// Right-hand literal of a conditional filter, trimmed but unquoted
    /// lazily at evaluation time.
    pub predicate: Option<String>,
}

/// Filter flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// True iff the subject path resolves to at least one value.
    Existence,
    /// Compares the subject's resolved value against the predicate literal.
    Conditional,
}

/// Conditional filter comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    RegexMatch,
    RegexNotMatch,
}

impl Operator {
    /// Textual forms in source-scan order. The scan takes the first operator
    /// in this list found anywhere in a filter body, so list position wins
    /// over text position.
    pub(crate) const SCAN_ORDER: [(&'static str, Operator); 8] = [
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        (">", Operator::Gt),
        (">=", Operator::Ge),
        ("<", Operator::Lt),
        ("<=", Operator::Le),
        ("=~", Operator::RegexMatch),
        ("!~", Operator::RegexNotMatch),
    ];
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::RegexMatch => "=~",
            Operator::RegexNotMatch => "!~",
        };
        f.write_str(text)
    }
}
