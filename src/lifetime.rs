//! Binding lifetime definitions.

use std::fmt;

/// Lifetimes controlling instance caching behavior
///
/// Defines how instances are created, cached, and shared by the resolver.
///
/// # Lifetime Characteristics
///
/// - **Singleton**: one instance for the lifetime of the resolver
/// - **Scoped**: one instance per [`Scope`](crate::Scope)
/// - **Transient**: a new instance per request
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{Constructor, Lifetime, Resolver, DiResult};
/// use std::rc::Rc;
///
/// struct RequestModel { id: u32 }
///
/// # fn main() -> DiResult<()> {
/// let mut resolver = Resolver::new();
/// resolver.bind_factory::<RequestModel, _>(
///     Lifetime::Transient,
///     Constructor::from_fn(|()| Ok(RequestModel { id: 7 })),
/// )?;
///
/// let a = resolver.get::<RequestModel>()?;
/// let b = resolver.get::<RequestModel>()?;
/// assert_eq!(a.id, b.id);
/// assert!(!Rc::ptr_eq(&a, &b)); // Always different
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Lifetime {
    /// Single instance per resolver, materialized when the binding is made
    ///
    /// Either supplied by the caller or built eagerly at registration time.
    /// The same instance is handed out regardless of scope.
    Singleton,
    /// Single instance per scope, materialized on first request
    ///
    /// Requests within the same scope return the same instance; different
    /// scopes get different instances. Producing a scoped value without a
    /// scope fails with [`DiError::MissingScope`](crate::DiError::MissingScope).
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        };
        f.write_str(name)
    }
}
