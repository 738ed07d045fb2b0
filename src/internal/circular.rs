//! Circular dependency and depth detection.

use crate::config::ResolverOptions;
use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Implementations currently under construction within one resolution call.
///
/// Every top-level `resolve`/`get` owns a fresh stack, so independent calls
/// never see each other's entries.
#[derive(Debug)]
pub(crate) struct ResolutionStack {
    path: Vec<Key>,
    detect_cycles: bool,
    max_depth: usize,
}

impl ResolutionStack {
    pub(crate) fn new(options: &ResolverOptions) -> Self {
        Self {
            path: Vec::new(),
            detect_cycles: options.detect_cycles,
            max_depth: options.max_depth,
        }
    }

    /// Marks `key` as under construction.
    ///
    /// Cycle detection runs BEFORE pushing, so the reported path ends with the
    /// repeated key.
    pub(crate) fn enter(&mut self, key: Key) -> DiResult<()> {
        if self.detect_cycles {
            if let Some(start) = self.path.iter().position(|k| *k == key) {
                let mut cycle: Vec<&'static str> =
                    self.path[start..].iter().map(Key::display_name).collect();
                cycle.push(key.display_name());
                return Err(DiError::Circular(cycle));
            }
        }

        if self.path.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.max_depth));
        }

        self.path.push(key);
        Ok(())
    }

    /// Pops the innermost entry.
    pub(crate) fn exit(&mut self) {
        let popped = self.path.pop();
        debug_assert!(popped.is_some(), "unbalanced resolution stack");
    }

    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }
}
