//! Error types for the dependency resolver.

use thiserror::Error;

/// Error type constructors may fail with.
///
/// Anything convertible into a boxed error works, so `?` on an
/// `io::Error` or a `String` inside [`Injectable::construct`](crate::Injectable::construct)
/// just works.
pub type ConstructionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency resolution errors
///
/// Represents the error conditions that can occur during binding
/// registration or resolution.
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{DiError, Resolver};
///
/// let resolver = Resolver::new();
/// match resolver.get::<String>() {
///     Err(DiError::DependencyNotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_resolver::DiError;
///
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// No reachable binding for a required type
    #[error("Dependency not found: {0}")]
    DependencyNotFound(&'static str),
    /// Scoped binding produced without a scope
    #[error("Missing scope: {0} is scoped and was requested without a scope")]
    MissingScope(&'static str),
    /// A constructor failed; the original error is kept as the source
    #[error("Failed to construct {service}: {source}")]
    Construction {
        service: &'static str,
        #[source]
        source: ConstructionError,
    },
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Duplicate registration refused by the duplicate policy
    #[error("Already bound: {0}")]
    AlreadyBound(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
}

impl DiError {
    /// Wraps a constructor failure for `service`.
    pub fn construction<E>(service: &'static str, source: E) -> Self
    where
        E: Into<ConstructionError>,
    {
        DiError::Construction {
            service,
            source: source.into(),
        }
    }
}

/// Result type for resolver operations
pub type DiResult<T> = Result<T, DiError>;
