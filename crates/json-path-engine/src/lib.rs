//! JSONPath query engine: compile path expressions into reusable ASTs and
//! evaluate them against `serde_json` values.
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({"store": {"book": [
//!     {"author": "X", "price": 8.95},
//!     {"author": "Y", "price": 12.99}
//! ]}});
//!
//! let path = json_path_engine::compile("$.store.book[?(@.price < 10)].author").unwrap();
//! let matches = json_path_engine::evaluate(&path, &doc).unwrap();
//! assert_eq!(matches, vec![&json!("X")]);
//! ```
//!
//! Compiled paths are memoized in a process-wide cache; [`compile`] returns
//! the shared `Arc<CompiledPath>` for a given trimmed source text. Evaluation
//! is read-only and lock-free.

mod cache;
mod compiler;
mod error;
mod eval;
mod filter;
mod subscript;
mod tokenizer;
mod types;

pub use cache::{compile, PathCache};
pub use error::{EvaluationError, JsonPathError, ParseError};
pub use eval::{evaluate, evaluate_with, find, EvalOptions};
pub use subscript::{parse_set, parse_slice, Subscript};
pub use tokenizer::{tokenize, RawSegment};
pub use types::{
    CompiledPath, FilterDescriptor, FilterKind, NodeKind, Operator, PathNode, SetKey,
    SliceDescriptor,
};
