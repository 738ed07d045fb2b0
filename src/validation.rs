//! Static validation of the binding graph.
//!
//! Resolution only discovers a missing binding or a cycle when it runs into
//! one. [`Resolver::validate`] walks every binding's declared dependencies up
//! front and reports all such problems at once, without building anything.

use std::collections::HashSet;
use std::fmt;

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Registry;
use crate::resolver::Resolver;

/// A problem that makes some resolution fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A binding depends on a type nothing is bound to
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// Bindings depend on each other in a loop
    CircularDependency { cycle: Vec<&'static str> },
}

/// A configuration that works, but only under some conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A transient binding needs a scoped one, directly or through other
    /// transient bindings, so it can only be produced with a scope
    RequiresScope {
        service: &'static str,
        scoped: &'static str,
    },
}

/// Result of [`Resolver::validate`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that will make resolution fail
    pub errors: Vec<ValidationError>,
    /// Configurations worth a second look
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Returns true if validation passed without errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there are warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Formats errors and warnings for display.
    pub fn format_issues(&self) -> String {
        let mut output = String::new();

        if !self.errors.is_empty() {
            output.push_str("Validation Errors:\n");
            for error in &self.errors {
                output.push_str(&format!("  - {error}\n"));
            }
        }

        if !self.warnings.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("Validation Warnings:\n");
            for warning in &self.warnings {
                output.push_str(&format!("  - {warning}\n"));
            }
        }

        output
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingDependency { service, dependency } => {
                write!(f, "'{service}' depends on unbound '{dependency}'")
            }
            ValidationError::CircularDependency { cycle } => {
                write!(f, "Circular dependency: {}", cycle.join(" -> "))
            }
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::RequiresScope { service, scoped } => {
                write!(f, "'{service}' needs scoped '{scoped}' and cannot be produced without a scope")
            }
        }
    }
}

impl Resolver {
    /// Checks every binding's dependencies without building anything.
    ///
    /// ```rust
    /// use ferrous_resolver::{Constructor, Lifetime, Resolver, ValidationError};
    /// use std::rc::Rc;
    ///
    /// struct Config;
    /// struct Client;
    ///
    /// let mut resolver = Resolver::new();
    /// resolver
    ///     .bind_factory::<Client, _>(
    ///         Lifetime::Transient,
    ///         Constructor::from_fn(|(_config,): (Rc<Config>,)| Ok(Client)),
    ///     )
    ///     .unwrap();
    ///
    /// let report = resolver.validate();
    /// assert!(!report.is_valid());
    /// assert!(matches!(report.errors[0], ValidationError::MissingDependency { .. }));
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let registry = self.registry();
        let mut report = ValidationReport::default();

        for binding in registry.iter() {
            let service = binding.key.display_name();
            for dependency in binding.provider.dependencies() {
                if registry.lookup(dependency).is_none() {
                    report.errors.push(ValidationError::MissingDependency {
                        service,
                        dependency: dependency.display_name(),
                    });
                }
            }

            if binding.provider.lifetime() == Lifetime::Transient {
                for scoped in scoped_reachable(registry, binding.key) {
                    report.warnings.push(ValidationWarning::RequiresScope {
                        service,
                        scoped: scoped.display_name(),
                    });
                }
            }
        }

        for cycle in detect_cycles(registry) {
            report.errors.push(ValidationError::CircularDependency { cycle });
        }

        report
    }
}

/// Scoped bindings a transient binding reaches without passing through a
/// singleton or another scoped binding, in discovery order.
fn scoped_reachable(registry: &Registry, start: Key) -> Vec<Key> {
    let mut visited = HashSet::from([start]);
    let mut pending = vec![start];
    let mut scoped = Vec::new();

    while let Some(current) = pending.pop() {
        let Some(provider) = registry.lookup(&current) else {
            continue;
        };
        for &dependency in provider.dependencies() {
            if !visited.insert(dependency) {
                continue;
            }
            match registry.lookup(&dependency).map(|p| p.lifetime()) {
                Some(Lifetime::Scoped) => scoped.push(dependency),
                Some(Lifetime::Transient) => pending.push(dependency),
                _ => {}
            }
        }
    }

    scoped
}

/// Detects circular dependencies using DFS.
fn detect_cycles(registry: &Registry) -> Vec<Vec<&'static str>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for binding in registry.iter() {
        if !visited.contains(&binding.key) {
            dfs_cycles(registry, binding.key, &mut visited, &mut path, &mut cycles);
        }
    }

    cycles
}

fn dfs_cycles(
    registry: &Registry,
    current: Key,
    visited: &mut HashSet<Key>,
    path: &mut Vec<Key>,
    cycles: &mut Vec<Vec<&'static str>>,
) {
    if let Some(cycle_start) = path.iter().position(|k| *k == current) {
        let cycle = path[cycle_start..]
            .iter()
            .chain(std::iter::once(&current))
            .map(Key::display_name)
            .collect();
        cycles.push(cycle);
        return;
    }

    if !visited.insert(current) {
        return;
    }

    let Some(provider) = registry.lookup(&current) else {
        return;
    };

    path.push(current);
    for &dependency in provider.dependencies() {
        dfs_cycles(registry, dependency, visited, path, cycles);
    }
    path.pop();
}
