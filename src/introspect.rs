//! Constructor introspection.
//!
//! The resolver needs, for every type it builds, the ordered list of types
//! its constructor takes. Types declare that list through
//! [`Injectable::Dependencies`], a tuple of `Rc<_>` handles; the tuple's
//! [`Dependencies`] impl turns it into keys and back. A [`Constructor`] is the
//! resulting signature: target key, dependency keys, and a type-erased build
//! step taking the already-resolved handles in order.
//!
//! # Examples
//!
//! ```rust
//! use ferrous_resolver::{dependencies_of, ConstructionError, Injectable, Key};
//! use std::rc::Rc;
//!
//! struct Config { url: String }
//! struct Pool { size: usize }
//!
//! struct Repository {
//!     config: Rc<Config>,
//!     pool: Rc<Pool>,
//! }
//!
//! impl Injectable for Repository {
//!     type Dependencies = (Rc<Config>, Rc<Pool>);
//!
//!     fn construct((config, pool): Self::Dependencies) -> Result<Self, ConstructionError> {
//!         Ok(Repository { config, pool })
//!     }
//! }
//!
//! assert_eq!(dependencies_of::<Repository>(), vec![Key::of::<Config>(), Key::of::<Pool>()]);
//! ```

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::{ConstructionError, DiError, DiResult};
use crate::key::Key;
use crate::registration::{downcast, erase, AnyRc};

/// A single constructor parameter the resolver can supply.
pub trait Dependency: Sized + 'static {
    /// Key of the binding that supplies this parameter.
    fn key() -> Key;

    /// Recovers the parameter from a resolved, type-erased value.
    fn from_resolved(value: &AnyRc) -> DiResult<Self>;
}

impl<T: ?Sized + 'static> Dependency for Rc<T> {
    #[inline]
    fn key() -> Key {
        Key::of::<T>()
    }

    #[inline]
    fn from_resolved(value: &AnyRc) -> DiResult<Self> {
        downcast::<T>(value)
    }
}

/// An ordered constructor parameter list.
///
/// Implemented for tuples of up to twelve [`Dependency`] values, including
/// the empty tuple.
pub trait Dependencies: Sized + 'static {
    /// Keys of the parameters, in positional order.
    fn keys() -> Vec<Key>;

    /// Rebuilds the parameter tuple from values resolved in [`keys`](Self::keys) order.
    fn from_resolved(values: Vec<AnyRc>) -> DiResult<Self>;
}

macro_rules! impl_dependencies {
    ($($param:ident),*) => {
        impl<$($param: Dependency),*> Dependencies for ($($param,)*) {
            fn keys() -> Vec<Key> {
                vec![$($param::key()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_resolved(values: Vec<AnyRc>) -> DiResult<Self> {
                let mut values = values.into_iter();
                Ok(($(
                    $param::from_resolved(
                        &values.next().ok_or(DiError::TypeMismatch(type_name::<Self>()))?,
                    )?,
                )*))
            }
        }
    };
}

impl_dependencies!();
impl_dependencies!(A);
impl_dependencies!(A, B);
impl_dependencies!(A, B, C);
impl_dependencies!(A, B, C, D);
impl_dependencies!(A, B, C, D, E);
impl_dependencies!(A, B, C, D, E, F);
impl_dependencies!(A, B, C, D, E, F, G);
impl_dependencies!(A, B, C, D, E, F, G, H);
impl_dependencies!(A, B, C, D, E, F, G, H, I);
impl_dependencies!(A, B, C, D, E, F, G, H, I, J);
impl_dependencies!(A, B, C, D, E, F, G, H, I, J, K);
impl_dependencies!(A, B, C, D, E, F, G, H, I, J, K, L);

/// A type the resolver can build from its declared dependencies.
///
/// The dependency list is the parameter tuple of [`construct`](Self::construct);
/// nothing else needs to be declared.
pub trait Injectable: Sized + 'static {
    /// Constructor parameters, e.g. `(Rc<Config>, Rc<dyn Logger>)`.
    type Dependencies: Dependencies;

    /// Builds the value from resolved dependencies.
    fn construct(dependencies: Self::Dependencies) -> Result<Self, ConstructionError>;
}

type BuildFn = dyn Fn(Vec<AnyRc>) -> DiResult<AnyRc>;

/// Introspected constructor signature of `T`.
///
/// Either derived from an [`Injectable`] impl with [`Constructor::of`] or
/// written inline with [`Constructor::from_fn`].
pub struct Constructor<T> {
    erased: ErasedConstructor,
    _target: PhantomData<fn() -> T>,
}

impl<T: Injectable> Constructor<T> {
    /// Signature declared by `T`'s [`Injectable`] impl.
    pub fn of() -> Self {
        Self::from_fn(T::construct)
    }
}

impl<T: 'static> Constructor<T> {
    /// Signature for a factory closure; the closure's parameter tuple is the
    /// dependency list.
    ///
    /// ```rust
    /// use ferrous_resolver::{Constructor, Key};
    /// use std::rc::Rc;
    ///
    /// struct Greeting(String);
    ///
    /// let ctor = Constructor::from_fn(|(name,): (Rc<String>,)| Ok(Greeting(format!("hi {name}"))));
    /// assert_eq!(ctor.dependencies(), &[Key::of::<String>()]);
    /// ```
    pub fn from_fn<D, F>(factory: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> Result<T, ConstructionError> + 'static,
    {
        let build = move |values: Vec<AnyRc>| -> DiResult<AnyRc> {
            let dependencies = D::from_resolved(values)?;
            let value = factory(dependencies).map_err(|source| DiError::Construction {
                service: type_name::<T>(),
                source,
            })?;
            Ok(erase(Rc::new(value)))
        };

        Self {
            erased: ErasedConstructor {
                target: Key::of::<T>(),
                dependencies: D::keys(),
                build: Box::new(build),
            },
            _target: PhantomData,
        }
    }

    /// Key of the type this constructor builds.
    pub fn target(&self) -> Key {
        self.erased.target
    }

    /// Ordered dependency keys.
    pub fn dependencies(&self) -> &[Key] {
        &self.erased.dependencies
    }

    pub(crate) fn into_erased(self) -> ErasedConstructor {
        self.erased
    }

    pub(crate) fn erased(&self) -> &ErasedConstructor {
        &self.erased
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.erased, f)
    }
}

/// [`Constructor`] with the target type erased; what providers store.
pub(crate) struct ErasedConstructor {
    target: Key,
    dependencies: Vec<Key>,
    build: Box<BuildFn>,
}

impl ErasedConstructor {
    #[inline]
    pub(crate) fn target(&self) -> &Key {
        &self.target
    }

    #[inline]
    pub(crate) fn dependencies(&self) -> &[Key] {
        &self.dependencies
    }

    /// Runs the build step. The result wraps an `Rc` of the target type.
    #[inline]
    pub(crate) fn build(&self, values: Vec<AnyRc>) -> DiResult<AnyRc> {
        (self.build)(values)
    }
}

impl fmt::Debug for ErasedConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("target", &self.target.display_name())
            .field(
                "dependencies",
                &self.dependencies.iter().map(Key::display_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Ordered dependency keys of `T`'s constructor.
pub fn dependencies_of<T: Injectable>() -> Vec<Key> {
    <T::Dependencies as Dependencies>::keys()
}
