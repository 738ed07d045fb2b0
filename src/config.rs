//! Resolver configuration.
//!
//! Options are plain data with builder-style setters. With the `config`
//! feature they can also be loaded from JSON:
//!
//! ```rust
//! # #[cfg(feature = "config")]
//! # {
//! use ferrous_resolver::{DuplicatePolicy, ResolverOptions};
//!
//! let options = ResolverOptions::from_json(r#"{ "duplicate_policy": "reject", "max_depth": 64 }"#).unwrap();
//! assert_eq!(options.duplicate_policy, DuplicatePolicy::Reject);
//! assert_eq!(options.max_depth, 64);
//! assert!(options.detect_cycles);
//! # }
//! ```

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default bound on the resolution stack.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What happens when a second binding is registered for an interface that is
/// already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DuplicatePolicy {
    /// The first binding stays reachable; the later one is dropped with a warning.
    #[default]
    KeepFirst,
    /// The later binding replaces the earlier one in place.
    Replace,
    /// The later registration fails with [`DiError::AlreadyBound`](crate::DiError::AlreadyBound).
    Reject,
}

/// Options for a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverOptions {
    /// Policy for duplicate registrations
    pub duplicate_policy: DuplicatePolicy,
    /// Fail with `Circular` when a type is requested while it is being built
    pub detect_cycles: bool,
    /// Maximum nesting of constructions within one resolution call
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            detect_cycles: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate registration policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Enables or disables cycle detection.
    ///
    /// With detection off a cycle still terminates, but only once
    /// `max_depth` is hit.
    pub fn detect_cycles(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Sets the maximum construction depth. Values below 1 are raised to 1.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Parses options from a JSON document. Missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
