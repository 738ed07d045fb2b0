//! The resolver: binding registration and resolution entry points.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::ResolverOptions;
use crate::descriptors::BindingDescriptor;
use crate::error::DiResult;
use crate::interface::Upcast;
use crate::introspect::{Constructor, Injectable};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::{
    upcaster, Provider, ResolverContext, Scope, ScopedProvider, SingletonProvider,
    TransientProvider,
};
use crate::registration::{downcast, erase, Admission, Registry};

/// Dependency resolver.
///
/// Holds the root bindings. Registration needs `&mut Resolver`; resolution
/// only needs `&Resolver` plus, for scoped bindings, a `&mut Scope`.
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{implements, ConstructionError, Injectable, Resolver};
/// use std::rc::Rc;
///
/// trait Store {
///     fn name(&self) -> &str;
/// }
///
/// struct MemoryStore;
/// impl Store for MemoryStore {
///     fn name(&self) -> &str { "memory" }
/// }
/// implements!(MemoryStore => dyn Store);
///
/// struct Service {
///     store: Rc<dyn Store>,
/// }
///
/// impl Injectable for Service {
///     type Dependencies = (Rc<dyn Store>,);
///
///     fn construct((store,): Self::Dependencies) -> Result<Self, ConstructionError> {
///         Ok(Service { store })
///     }
/// }
///
/// let mut resolver = Resolver::new();
/// resolver.bind_singleton::<dyn Store, _>(MemoryStore).unwrap();
///
/// let service = resolver.resolve::<Service>().unwrap();
/// assert_eq!(service.store.name(), "memory");
/// assert!(Rc::ptr_eq(&service.store, &resolver.get::<dyn Store>().unwrap()));
/// ```
pub struct Resolver {
    registry: Registry,
    options: ResolverOptions,
}

impl Resolver {
    /// Creates an empty resolver with default options.
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    /// Creates an empty resolver with the given options.
    pub fn with_options(options: ResolverOptions) -> Self {
        debug!(?options, "resolver created");
        Self {
            registry: Registry::new(),
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    fn register(&mut self, key: Key, provider: Box<dyn Provider>) -> DiResult<&mut Self> {
        self.registry
            .insert(key, provider, self.options.duplicate_policy)?;
        Ok(self)
    }

    /// Binds `value` as the singleton for interface `I`.
    ///
    /// ```rust
    /// use ferrous_resolver::Resolver;
    /// use std::rc::Rc;
    ///
    /// struct Settings { retries: u32 }
    ///
    /// let mut resolver = Resolver::new();
    /// resolver.bind_singleton::<Settings, _>(Settings { retries: 3 }).unwrap();
    ///
    /// let a = resolver.get::<Settings>().unwrap();
    /// let b = resolver.get::<Settings>().unwrap();
    /// assert!(Rc::ptr_eq(&a, &b));
    /// assert_eq!(a.retries, 3);
    /// ```
    pub fn bind_singleton<I, T>(&mut self, value: T) -> DiResult<&mut Self>
    where
        I: ?Sized + 'static,
        T: Upcast<I>,
    {
        let instance = T::upcast(Rc::new(value));
        let provider = SingletonProvider::new(Key::of::<T>(), erase(instance));
        self.register(Key::of::<I>(), Box::new(provider))
    }

    /// Binds an existing shared handle as the singleton for `I`.
    pub fn bind_instance<I>(&mut self, instance: Rc<I>) -> DiResult<&mut Self>
    where
        I: ?Sized + 'static,
    {
        let provider = SingletonProvider::new(Key::of::<I>(), erase(instance));
        self.register(Key::of::<I>(), Box::new(provider))
    }

    /// Builds `T` now, from what is already bound, and binds the result as
    /// the singleton for `I`.
    ///
    /// Only bindings registered before this call are visible. Fails with
    /// [`MissingScope`](crate::DiError::MissingScope) if `T` needs a scoped
    /// binding.
    pub fn bind_singleton_eager<I, T>(&mut self) -> DiResult<&mut Self>
    where
        I: ?Sized + 'static,
        T: Injectable + Upcast<I>,
    {
        self.bind_factory::<I, T>(Lifetime::Singleton, Constructor::of())
    }

    /// Binds `T` as a transient implementation of `I`.
    pub fn bind_transient<I, T>(&mut self) -> DiResult<&mut Self>
    where
        I: ?Sized + 'static,
        T: Injectable + Upcast<I>,
    {
        self.bind_factory::<I, T>(Lifetime::Transient, Constructor::of())
    }

    /// Binds `T` as the scoped implementation of `I`.
    pub fn bind_scoped<I, T>(&mut self) -> DiResult<&mut Self>
    where
        I: ?Sized + 'static,
        T: Injectable + Upcast<I>,
    {
        self.bind_factory::<I, T>(Lifetime::Scoped, Constructor::of())
    }

    /// Binds `I` to the implementation built by `constructor` under the given
    /// lifetime. [`Lifetime::Singleton`] builds immediately, as
    /// [`bind_singleton_eager`](Self::bind_singleton_eager) does.
    ///
    /// ```rust
    /// use ferrous_resolver::{Constructor, Lifetime, Resolver};
    /// use std::rc::Rc;
    ///
    /// struct Port(u16);
    /// struct Endpoint(String);
    ///
    /// let mut resolver = Resolver::new();
    /// resolver.bind_singleton::<Port, _>(Port(8080)).unwrap();
    /// resolver
    ///     .bind_factory::<Endpoint, _>(
    ///         Lifetime::Transient,
    ///         Constructor::from_fn(|(port,): (Rc<Port>,)| Ok(Endpoint(format!("localhost:{}", port.0)))),
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(resolver.get::<Endpoint>().unwrap().0, "localhost:8080");
    /// ```
    pub fn bind_factory<I, T>(
        &mut self,
        lifetime: Lifetime,
        constructor: Constructor<T>,
    ) -> DiResult<&mut Self>
    where
        I: ?Sized + 'static,
        T: Upcast<I>,
    {
        let key = Key::of::<I>();
        let provider: Box<dyn Provider> = match lifetime {
            Lifetime::Singleton => {
                if self.registry.admit(&key, self.options.duplicate_policy)? == Admission::Ignore {
                    warn!(key = %key, "ignoring duplicate binding, first registration wins");
                    return Ok(self);
                }
                let value = {
                    let mut ctx = ResolverContext::new(&self.registry, None, &self.options);
                    ctx.construct(constructor.erased())?
                };
                let instance = upcaster::<I, T>()(&value)?;
                Box::new(SingletonProvider::new(constructor.target(), instance))
            }
            Lifetime::Transient => Box::new(TransientProvider::new(
                constructor.into_erased(),
                upcaster::<I, T>(),
            )),
            Lifetime::Scoped => Box::new(ScopedProvider::new(
                constructor.into_erased(),
                upcaster::<I, T>(),
            )),
        };
        self.register(key, provider)
    }

    /// Constructs a new `T` from root bindings only.
    ///
    /// `T` itself need not be bound; its dependencies must be. Touching a
    /// scoped binding fails with [`MissingScope`](crate::DiError::MissingScope).
    pub fn resolve<T: Injectable>(&self) -> DiResult<Rc<T>> {
        self.construct::<T>(None)
    }

    /// Constructs a new `T`, caching scoped dependencies in `scope`.
    pub fn resolve_in<T: Injectable>(&self, scope: &mut Scope) -> DiResult<Rc<T>> {
        self.construct::<T>(Some(scope))
    }

    /// Constructs a new `T` with a scope that lives for this call only.
    pub fn resolve_ephemeral<T: Injectable>(&self) -> DiResult<Rc<T>> {
        let mut scope = Scope::new();
        self.resolve_in(&mut scope)
    }

    fn construct<T: Injectable>(&self, scope: Option<&mut Scope>) -> DiResult<Rc<T>> {
        let constructor = Constructor::<T>::of();
        let mut ctx = ResolverContext::new(&self.registry, scope, &self.options);
        let value = ctx.construct(constructor.erased())?;
        downcast::<T>(&value)
    }

    /// Produces the value bound to `I`, without a scope.
    pub fn get<I: ?Sized + 'static>(&self) -> DiResult<Rc<I>> {
        self.produce::<I>(None)
    }

    /// Produces the value bound to `I`, caching scoped values in `scope`.
    pub fn get_in<I: ?Sized + 'static>(&self, scope: &mut Scope) -> DiResult<Rc<I>> {
        self.produce::<I>(Some(scope))
    }

    fn produce<I: ?Sized + 'static>(&self, scope: Option<&mut Scope>) -> DiResult<Rc<I>> {
        let mut ctx = ResolverContext::new(&self.registry, scope, &self.options);
        let value = ctx.produce(&Key::of::<I>())?;
        downcast::<I>(&value)
    }

    /// Creates a new, empty scope.
    pub fn make_scope(&self) -> Scope {
        Scope::new()
    }

    /// Number of distinct bound interfaces.
    pub fn size(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether interface `I` is bound.
    pub fn contains<I: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&Key::of::<I>())
    }

    /// Descriptors of all bindings, in registration order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry
            .iter()
            .map(BindingDescriptor::from_binding)
            .collect()
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Human-readable dump of all bindings.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Resolver Debug ===\n");
        for descriptor in self.descriptors() {
            s.push_str(&format!("  {descriptor}\n"));
        }
        s
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("bindings", &self.registry.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tracing_test::traced_test;

    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::error::{ConstructionError, DiError};

    trait Named {
        fn name(&self) -> &'static str;
    }

    struct Alpha;
    struct Beta;

    impl Named for Alpha {
        fn name(&self) -> &'static str {
            "alpha"
        }
    }

    impl Named for Beta {
        fn name(&self) -> &'static str {
            "beta"
        }
    }

    crate::implements!(Alpha => dyn Named);
    crate::implements!(Beta => dyn Named);

    struct Built(Rc<Cell<u32>>);

    impl Injectable for Built {
        type Dependencies = (Rc<Cell<u32>>,);

        fn construct((calls,): Self::Dependencies) -> Result<Self, ConstructionError> {
            calls.set(calls.get() + 1);
            Ok(Built(calls))
        }
    }

    #[traced_test]
    #[test]
    fn duplicate_is_ignored_with_warning() {
        let mut resolver = Resolver::new();
        resolver
            .bind_singleton::<dyn Named, _>(Alpha)
            .unwrap()
            .bind_singleton::<dyn Named, _>(Beta)
            .unwrap();

        assert_eq!(resolver.size(), 1);
        assert_eq!(resolver.get::<dyn Named>().unwrap().name(), "alpha");
        assert!(logs_contain("ignoring duplicate binding"));
    }

    #[test]
    fn replace_policy_last_wins() {
        let mut resolver =
            Resolver::with_options(ResolverOptions::new().duplicate_policy(DuplicatePolicy::Replace));
        resolver.bind_singleton::<dyn Named, _>(Alpha).unwrap();
        resolver.bind_singleton::<dyn Named, _>(Beta).unwrap();

        assert_eq!(resolver.size(), 1);
        assert_eq!(resolver.get::<dyn Named>().unwrap().name(), "beta");
    }

    #[test]
    fn reject_policy_errors() {
        let mut resolver =
            Resolver::with_options(ResolverOptions::new().duplicate_policy(DuplicatePolicy::Reject));
        resolver.bind_singleton::<dyn Named, _>(Alpha).unwrap();
        let err = resolver.bind_singleton::<dyn Named, _>(Beta).unwrap_err();
        assert!(matches!(err, DiError::AlreadyBound(_)));
    }

    #[test]
    fn ignored_eager_duplicate_builds_nothing() {
        let calls = Rc::new(Cell::new(0));
        let mut resolver = Resolver::new();
        resolver.bind_instance::<Cell<u32>>(calls.clone()).unwrap();
        resolver.bind_singleton_eager::<Built, Built>().unwrap();
        resolver.bind_singleton_eager::<Built, Built>().unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(resolver.size(), 2);
    }

    #[test]
    fn eager_singleton_sees_only_earlier_bindings() {
        let mut resolver = Resolver::new();
        let err = resolver.bind_singleton_eager::<Built, Built>().unwrap_err();
        assert!(matches!(err, DiError::DependencyNotFound(_)));
        assert!(!resolver.contains::<Built>());
    }

    #[test]
    fn descriptors_follow_registration_order() {
        let mut resolver = Resolver::new();
        resolver.bind_instance::<Cell<u32>>(Rc::new(Cell::new(0))).unwrap();
        resolver.bind_transient::<Built, Built>().unwrap();

        let descriptors = resolver.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].lifetime, Lifetime::Singleton);
        assert_eq!(descriptors[1].lifetime, Lifetime::Transient);
        assert_eq!(descriptors[1].dependencies, vec![Key::of::<Cell<u32>>()]);
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    fn debug_string_lists_bindings() {
        let mut resolver = Resolver::new();
        resolver.bind_transient::<Built, Built>().unwrap();
        let dump = resolver.to_debug_string();
        assert!(dump.contains("Built"));
        assert!(dump.contains("transient"));
    }
}
