//! Process-wide memoization of compiled paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;

use crate::compiler::parse_path;
use crate::{CompiledPath, ParseError};

static DEFAULT_CACHE: Lazy<PathCache> = Lazy::new(PathCache::new);

/// Compile a path through the process-wide default cache.
///
/// Two call sites compiling identical trimmed text receive the same
/// `Arc<CompiledPath>`.
pub fn compile(text: &str) -> Result<Arc<CompiledPath>, ParseError> {
    DEFAULT_CACHE.compile(text)
}

/// Insert-once cache of compiled paths, keyed by trimmed source text.
///
/// Entries are never evicted or mutated. The default process-wide instance
/// backs [`compile`]; tests and embedders can hold their own.
#[derive(Debug, Default)]
pub struct PathCache {
    inner: Mutex<HashMap<String, Arc<CompiledPath>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or compile `text`.
    ///
    /// The lock is released while parsing, so a filter subject can re-enter
    /// the cache. Racing insertions of the same key converge: the losing
    /// thread adopts the canonical value already in the map.
    pub fn compile(&self, text: &str) -> Result<Arc<CompiledPath>, ParseError> {
        let trimmed = text.trim();
        if let Some(hit) = self.lock().get(trimmed).cloned() {
            return Ok(hit);
        }

        let compiled = Arc::new(parse_path(trimmed, self)?);
        Ok(self
            .lock()
            .entry(trimmed.to_string())
            .or_insert(compiled)
            .clone())
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<CompiledPath>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
