//! Compiled path evaluation.
//!
//! The evaluator walks a node list left to right over a working set of
//! borrowed values, narrowing the set at each node. Type mismatches along
//! the way (indexing a scalar, naming into an array) contribute no matches;
//! only structurally invalid queries fail.

use regex::Regex;
use serde_json::Value;

use crate::{
    CompiledPath, EvaluationError, FilterDescriptor, FilterKind, JsonPathError, NodeKind, Operator,
    PathNode, SetKey, SliceDescriptor,
};

/// Caller-supplied evaluation budget.
///
/// Both limits default to off. `max_depth` caps recursive-descent depth,
/// `max_visits` caps total values visited during descent; exceeding either
/// fails with [`EvaluationError::BudgetExceeded`] instead of letting a
/// pathological document consume unbounded work.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    pub max_depth: Option<usize>,
    pub max_visits: Option<usize>,
}

/// Evaluate a compiled path against a document.
///
/// Returns matches in document traversal order; duplicates are kept when a
/// value is reachable through distinct paths.
pub fn evaluate<'a>(
    path: &CompiledPath,
    doc: &'a Value,
) -> Result<Vec<&'a Value>, EvaluationError> {
    evaluate_with(path, doc, &EvalOptions::default())
}

/// [`evaluate`] with an explicit budget.
pub fn evaluate_with<'a>(
    path: &CompiledPath,
    doc: &'a Value,
    options: &EvalOptions,
) -> Result<Vec<&'a Value>, EvaluationError> {
    let mut engine = Engine {
        options,
        visited: 0,
    };
    engine.eval_path(path, doc, doc)
}

/// Compile (through the default cache) and evaluate in one call.
pub fn find<'a>(text: &str, doc: &'a Value) -> Result<Vec<&'a Value>, JsonPathError> {
    let path = crate::compile(text)?;
    Ok(evaluate(&path, doc)?)
}

struct Engine<'o> {
    options: &'o EvalOptions,
    visited: usize,
}

impl Engine<'_> {
    /// Walk the node list. `root` is the `$` binding, `ctx` the `@` binding;
    /// top-level evaluation binds both to the document, filter sub-evaluation
    /// rebinds `ctx` to the candidate under test.
    fn eval_path<'a>(
        &mut self,
        path: &CompiledPath,
        root: &'a Value,
        ctx: &'a Value,
    ) -> Result<Vec<&'a Value>, EvaluationError> {
        let mut set = vec![ctx];
        for node in &path.nodes {
            set = self.apply(node, set, root, ctx)?;
            if set.is_empty() {
                break;
            }
        }
        Ok(set)
    }

    fn apply<'a>(
        &mut self,
        node: &PathNode,
        set: Vec<&'a Value>,
        root: &'a Value,
        ctx: &'a Value,
    ) -> Result<Vec<&'a Value>, EvaluationError> {
        match &node.kind {
            NodeKind::Root => return Ok(vec![root]),
            NodeKind::ContextRoot => return Ok(vec![ctx]),
            _ => {}
        }

        let base = self.narrow_subject(node, set, root, ctx)?;
        let mut out = Vec::new();
        match &node.kind {
            NodeKind::Root | NodeKind::ContextRoot => unreachable!("handled above"),
            NodeKind::Member => out = base,
            NodeKind::Index(index) => {
                for value in base {
                    if let Value::Array(arr) = value {
                        if let Some(child) = lookup_index(arr, *index) {
                            out.push(child);
                        }
                    }
                }
            }
            NodeKind::Slice(slice) => {
                for value in base {
                    if let Value::Array(arr) = value {
                        apply_slice(arr, slice, &node.segment, &mut out)?;
                    }
                }
            }
            NodeKind::Wildcard => {
                for value in base {
                    push_children(value, &mut out);
                }
            }
            NodeKind::Set(keys) => {
                for value in base {
                    for key in keys {
                        match (key, value) {
                            (SetKey::Index(index), Value::Array(arr)) => {
                                if let Some(child) = lookup_index(arr, *index) {
                                    out.push(child);
                                }
                            }
                            (SetKey::Name(name), Value::Object(map)) => {
                                if let Some(child) = map.get(name) {
                                    out.push(child);
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            NodeKind::Filter(filter) => {
                for value in base {
                    let mut candidates = Vec::new();
                    push_children(value, &mut candidates);
                    for candidate in candidates {
                        if self.eval_filter(filter, root, candidate)? {
                            out.push(candidate);
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Resolve a node's member-name prefix before its subscript is applied.
    ///
    /// `book[0]` collects the `book` members first (at every depth when
    /// recursive), then the caller indexes each collected value. Pure-bracket
    /// recursive nodes (`..[0]`) instead widen the set to every descendant,
    /// so the subscript applies at every depth.
    fn narrow_subject<'a>(
        &mut self,
        node: &PathNode,
        set: Vec<&'a Value>,
        root: &'a Value,
        ctx: &'a Value,
    ) -> Result<Vec<&'a Value>, EvaluationError> {
        match node.subject.as_deref() {
            Some("$") => Ok(vec![root]),
            Some("@") => Ok(vec![ctx]),
            Some(name) => {
                let mut out = Vec::new();
                for value in set {
                    if node.recurse {
                        self.collect_member_recursive(value, name, 0, &mut out)?;
                    } else {
                        collect_member(value, name, &mut out);
                    }
                }
                Ok(out)
            }
            None if node.recurse => {
                let mut out = Vec::new();
                for value in set {
                    self.collect_descendants(value, 0, &mut out)?;
                }
                Ok(out)
            }
            None => Ok(set),
        }
    }

    /// Depth-first, document-order search for `name` (or `*`) members at
    /// every level of `value`, including inside matches.
    fn collect_member_recursive<'a>(
        &mut self,
        value: &'a Value,
        name: &str,
        depth: usize,
        out: &mut Vec<&'a Value>,
    ) -> Result<(), EvaluationError> {
        self.visit(depth)?;
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if name == "*" || key == name {
                        out.push(child);
                    }
                    self.collect_member_recursive(child, name, depth + 1, out)?;
                }
            }
            Value::Array(arr) => {
                for child in arr {
                    if name == "*" {
                        out.push(child);
                    }
                    self.collect_member_recursive(child, name, depth + 1, out)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Collect `value` itself plus every descendant, document order.
    fn collect_descendants<'a>(
        &mut self,
        value: &'a Value,
        depth: usize,
        out: &mut Vec<&'a Value>,
    ) -> Result<(), EvaluationError> {
        self.visit(depth)?;
        out.push(value);
        match value {
            Value::Object(map) => {
                for child in map.values() {
                    self.collect_descendants(child, depth + 1, out)?;
                }
            }
            Value::Array(arr) => {
                for child in arr {
                    self.collect_descendants(child, depth + 1, out)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn eval_filter(
        &mut self,
        filter: &FilterDescriptor,
        root: &Value,
        candidate: &Value,
    ) -> Result<bool, EvaluationError> {
        let resolved = self.eval_path(&filter.subject, root, candidate)?;
        let passed = match filter.kind {
            FilterKind::Existence => !resolved.is_empty(),
            FilterKind::Conditional => {
                let operator = filter
                    .operator
                    .expect("conditional filter always carries an operator");
                let predicate = filter.predicate.as_deref().unwrap_or("");
                match resolved.first() {
                    Some(value) => compare(value, operator, predicate)?,
                    None => false,
                }
            }
        };
        Ok(passed != filter.negate)
    }

    fn visit(&mut self, depth: usize) -> Result<(), EvaluationError> {
        self.visited += 1;
        if let Some(limit) = self.options.max_visits {
            if self.visited > limit {
                return Err(EvaluationError::BudgetExceeded {
                    visited: self.visited,
                });
            }
        }
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(EvaluationError::BudgetExceeded {
                    visited: self.visited,
                });
            }
        }
        Ok(())
    }
}

fn collect_member<'a>(value: &'a Value, name: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if name == "*" {
                out.extend(map.values());
            } else if let Some(child) = map.get(name) {
                out.push(child);
            }
        }
        Value::Array(arr) if name == "*" => out.extend(arr.iter()),
        _ => {}
    }
}

fn push_children<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => out.extend(map.values()),
        Value::Array(arr) => out.extend(arr.iter()),
        _ => {}
    }
}

fn lookup_index(arr: &[Value], index: isize) -> Option<&Value> {
    let resolved = if index < 0 {
        arr.len().checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    arr.get(resolved)
}

/// Select a slice of `arr` into `out`.
///
/// Bounds are resolved against the length (`len + bound` when negative, so
/// the `end = -1` default means "last index") then clamped; both bounds are
/// inclusive. A positive step walks the range forward, a negative step walks
/// it backward.
fn apply_slice<'a>(
    arr: &'a [Value],
    slice: &SliceDescriptor,
    segment: &str,
    out: &mut Vec<&'a Value>,
) -> Result<(), EvaluationError> {
    if slice.step == 0 {
        return Err(EvaluationError::InvalidStep {
            segment: segment.to_string(),
        });
    }
    if arr.is_empty() {
        return Ok(());
    }

    let len = arr.len() as isize;
    let resolve = |bound: isize| -> isize {
        let bound = if bound < 0 { len + bound } else { bound };
        bound.clamp(0, len - 1)
    };
    let a = resolve(slice.start);
    let b = resolve(slice.end);
    let (lo, hi) = (a.min(b), a.max(b));

    if slice.step > 0 {
        let mut i = lo;
        while i <= hi {
            out.push(&arr[i as usize]);
            // An unrepresentable next index is past the bounds by definition.
            i = match i.checked_add(slice.step) {
                Some(next) => next,
                None => break,
            };
        }
    } else {
        let mut i = hi;
        while i >= lo {
            out.push(&arr[i as usize]);
            i = match i.checked_add(slice.step) {
                Some(next) => next,
                None => break,
            };
        }
    }
    Ok(())
}

/// Conditional filter comparison.
///
/// Numeric when both the resolved value and the (unquoted) predicate parse
/// as numbers, lexicographic otherwise. `=~` / `!~` treat the predicate as a
/// pattern (surrounding `/` or quotes stripped) matched against the value's
/// string form; a pattern that does not compile is a structural error.
fn compare(value: &Value, operator: Operator, predicate: &str) -> Result<bool, EvaluationError> {
    if matches!(operator, Operator::RegexMatch | Operator::RegexNotMatch) {
        let pattern = strip_pattern(predicate);
        let regex = Regex::new(pattern).map_err(|_| EvaluationError::TypeMismatch {
            predicate: predicate.to_string(),
            expected: "a regular expression".to_string(),
        })?;
        let matched = regex.is_match(&value_text(value));
        return Ok(match operator {
            Operator::RegexMatch => matched,
            _ => !matched,
        });
    }

    let (literal, quoted) = unquote(predicate);
    if !quoted {
        if let (Some(left), Ok(right)) = (numeric(value), literal.parse::<f64>()) {
            return Ok(compare_ordered(operator, left, right));
        }
    }
    Ok(compare_ordered(
        operator,
        value_text(value).as_str(),
        literal.as_str(),
    ))
}

fn compare_ordered<T: PartialOrd>(operator: Operator, left: T, right: T) -> bool {
    match operator {
        Operator::Eq => left == right,
        Operator::Ne => left != right,
        Operator::Gt => left > right,
        Operator::Ge => left >= right,
        Operator::Lt => left < right,
        Operator::Le => left <= right,
        Operator::RegexMatch | Operator::RegexNotMatch => false,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// String form used for lexicographic and regex comparison.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unquote(literal: &str) -> (String, bool) {
    let trimmed = literal.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        let inner = &trimmed[1..trimmed.len() - 1];
        (inner.replace("\\'", "'").replace("\\\\", "\\"), true)
    } else {
        (trimmed.to_string(), false)
    }
}

fn strip_pattern(predicate: &str) -> &str {
    let trimmed = predicate.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('/') && trimmed.ends_with('/') {
        return &trimmed[1..trimmed.len() - 1];
    }
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        return &trimmed[1..trimmed.len() - 1];
    }
    trimmed
}
