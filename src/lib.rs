//! # ferrous-resolver
//!
//! Constructor-driven dependency resolution for single-threaded Rust programs.
//!
//! ## Features
//!
//! - **Lifetimes**: Singleton, Scoped, and Transient bindings
//! - **Interface bindings**: bind `dyn Trait` to a concrete implementation
//! - **Declarative constructors**: dependencies are the parameter tuple of [`Injectable::construct`]
//! - **Circular dependency detection**: fails fast with the cycle path
//! - **Scopes**: explicit per-context caches for scoped bindings
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_resolver::{ConstructionError, Injectable, Resolver};
//! use std::rc::Rc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Rc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     type Dependencies = (Rc<Database>,);
//!
//!     fn construct((db,): Self::Dependencies) -> Result<Self, ConstructionError> {
//!         Ok(UserService { db })
//!     }
//! }
//!
//! let mut resolver = Resolver::new();
//! resolver
//!     .bind_singleton::<Database, _>(Database {
//!         connection_string: "postgres://localhost".to_string(),
//!     })
//!     .unwrap();
//!
//! let user_service = resolver.resolve::<UserService>().unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Binding Lifetimes
//!
//! - **Singleton**: one instance for the resolver's lifetime
//! - **Scoped**: one instance per [`Scope`]; producing it without a scope is an error
//! - **Transient**: a new instance on every request
//!
//! ## Scoped Bindings
//!
//! ```rust
//! use ferrous_resolver::{ConstructionError, Injectable, Resolver};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct RequestId(Cell<u32>);
//!
//! impl Injectable for RequestId {
//!     type Dependencies = ();
//!
//!     fn construct(_: ()) -> Result<Self, ConstructionError> {
//!         Ok(RequestId(Cell::new(0)))
//!     }
//! }
//!
//! let mut resolver = Resolver::new();
//! resolver.bind_scoped::<RequestId, RequestId>().unwrap();
//!
//! let mut scope = resolver.make_scope();
//! resolver.get_in::<RequestId>(&mut scope).unwrap().0.set(7);
//! assert_eq!(resolver.get_in::<RequestId>(&mut scope).unwrap().0.get(), 7);
//!
//! let mut other = resolver.make_scope();
//! assert_eq!(resolver.get_in::<RequestId>(&mut other).unwrap().0.get(), 0);
//!
//! assert!(resolver.get::<RequestId>().is_err());
//! ```

pub mod config;
pub mod descriptors;
pub mod error;
pub mod interface;
pub mod introspect;
pub mod key;
pub mod lifetime;
pub mod resolver;
pub mod validation;

mod internal;
mod provider;
mod registration;

pub use config::{DuplicatePolicy, ResolverOptions, DEFAULT_MAX_DEPTH};
pub use descriptors::BindingDescriptor;
pub use error::{ConstructionError, DiError, DiResult};
pub use interface::Upcast;
pub use introspect::{dependencies_of, Constructor, Dependencies, Dependency, Injectable};
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use provider::Scope;
pub use resolver::Resolver;
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
