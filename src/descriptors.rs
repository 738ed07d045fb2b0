//! Binding descriptors for introspection and diagnostics.

use std::fmt;

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Binding;

/// Read-only description of one binding.
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{Key, Lifetime, Resolver};
///
/// struct Database { url: String }
///
/// let mut resolver = Resolver::new();
/// resolver.bind_singleton::<Database, _>(Database { url: "postgres://localhost".to_string() }).unwrap();
///
/// let descriptors = resolver.descriptors();
/// assert_eq!(descriptors.len(), 1);
/// assert_eq!(descriptors[0].key, Key::of::<Database>());
/// assert_eq!(descriptors[0].lifetime, Lifetime::Singleton);
/// assert!(descriptors[0].type_name().ends_with("Database"));
/// assert!(descriptors[0].dependencies.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    /// Interface the binding answers for
    pub key: Key,
    /// Lifetime policy
    pub lifetime: Lifetime,
    /// Implementation type behind the binding
    pub implementation: Key,
    /// Constructor dependencies; empty for materialized singletons
    pub dependencies: Vec<Key>,
}

impl BindingDescriptor {
    pub(crate) fn from_binding(binding: &Binding) -> Self {
        Self {
            key: binding.key,
            lifetime: binding.provider.lifetime(),
            implementation: *binding.provider.implementation(),
            dependencies: binding.provider.dependencies().to_vec(),
        }
    }

    /// Name of the bound interface.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Name of the implementation type.
    pub fn implementation_name(&self) -> &'static str {
        self.implementation.display_name()
    }

    /// Whether the interface is bound to a different implementation type.
    pub fn is_interface_binding(&self) -> bool {
        self.key != self.implementation
    }
}

impl fmt::Display for BindingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.lifetime)?;
        if self.is_interface_binding() {
            write!(f, " => {}", self.implementation)?;
        }
        if !self.dependencies.is_empty() {
            let names: Vec<_> = self.dependencies.iter().map(Key::display_name).collect();
            write!(f, " <- [{}]", names.join(", "))?;
        }
        Ok(())
    }
}
