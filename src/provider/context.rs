//! Per-call resolution state.

use tracing::trace;

use crate::config::ResolverOptions;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionStack;
use crate::introspect::ErasedConstructor;
use crate::key::Key;
use crate::registration::{AnyRc, Registry};

use super::{Provider, Scope};

/// State threaded through one top-level resolution: the bindings, the scope
/// the caller supplied (if any) and the construction path.
pub(crate) struct ResolverContext<'a> {
    registry: &'a Registry,
    scope: Option<&'a mut Scope>,
    stack: ResolutionStack,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        scope: Option<&'a mut Scope>,
        options: &ResolverOptions,
    ) -> Self {
        Self {
            registry,
            scope,
            stack: ResolutionStack::new(options),
        }
    }

    /// The caller's scope, if the call was made with one.
    pub(crate) fn scope(&mut self) -> Option<&mut Scope> {
        self.scope.as_deref_mut()
    }

    /// Produces the value bound to `key`.
    pub(crate) fn produce(&mut self, key: &Key) -> DiResult<AnyRc> {
        let registry = self.registry;
        let provider = registry
            .lookup(key)
            .ok_or(DiError::DependencyNotFound(key.display_name()))?;
        provider.produce(self)
    }

    /// Builds `ctor`'s target after producing each of its dependencies in
    /// declaration order.
    ///
    /// Every dependency must have a binding before anything is built, so a
    /// missing one never leaves half the graph materialized.
    pub(crate) fn construct(&mut self, ctor: &ErasedConstructor) -> DiResult<AnyRc> {
        self.stack.enter(*ctor.target())?;
        let result = self.construct_entered(ctor);
        self.stack.exit();
        result
    }

    fn construct_entered(&mut self, ctor: &ErasedConstructor) -> DiResult<AnyRc> {
        let registry = self.registry;
        let providers = ctor
            .dependencies()
            .iter()
            .map(|key| {
                registry
                    .lookup(key)
                    .ok_or(DiError::DependencyNotFound(key.display_name()))
            })
            .collect::<DiResult<Vec<&dyn Provider>>>()?;

        let mut values = Vec::with_capacity(providers.len());
        for provider in providers {
            values.push(provider.produce(self)?);
        }

        trace!(
            key = %ctor.target(),
            depth = self.stack.depth(),
            "constructing"
        );
        ctor.build(values)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::introspect::Constructor;
    use crate::provider::{upcaster, ScopedProvider, SingletonProvider, TransientProvider};
    use crate::registration::{downcast, erase};

    struct Counter(Cell<u32>);

    struct Service {
        counter: Rc<Counter>,
    }

    fn registry_with(lifetime_scoped: bool) -> Registry {
        let mut registry = Registry::new();
        registry
            .insert(
                Key::of::<Counter>(),
                Box::new(SingletonProvider::new(
                    Key::of::<Counter>(),
                    erase(Rc::new(Counter(Cell::new(0)))),
                )),
                DuplicatePolicy::KeepFirst,
            )
            .unwrap();

        let ctor = Constructor::from_fn(|(counter,): (Rc<Counter>,)| {
            counter.0.set(counter.0.get() + 1);
            Ok(Service { counter })
        })
        .into_erased();
        let provider: Box<dyn Provider> = if lifetime_scoped {
            Box::new(ScopedProvider::new(ctor, upcaster::<Service, Service>()))
        } else {
            Box::new(TransientProvider::new(ctor, upcaster::<Service, Service>()))
        };
        registry
            .insert(Key::of::<Service>(), provider, DuplicatePolicy::KeepFirst)
            .unwrap();
        registry
    }

    #[test]
    fn transient_builds_each_time() {
        let registry = registry_with(false);
        let options = ResolverOptions::default();

        let mut ctx = ResolverContext::new(&registry, None, &options);
        let a = downcast::<Service>(&ctx.produce(&Key::of::<Service>()).unwrap()).unwrap();
        let b = downcast::<Service>(&ctx.produce(&Key::of::<Service>()).unwrap()).unwrap();

        assert!(!Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&a.counter, &b.counter));
        assert_eq!(a.counter.0.get(), 2);
    }

    #[test]
    fn scoped_without_scope_is_an_error() {
        let registry = registry_with(true);
        let options = ResolverOptions::default();
        let mut ctx = ResolverContext::new(&registry, None, &options);

        assert!(matches!(
            ctx.produce(&Key::of::<Service>()),
            Err(DiError::MissingScope(_))
        ));
    }

    #[test]
    fn scoped_is_cached_in_the_scope() {
        let registry = registry_with(true);
        let options = ResolverOptions::default();
        let mut scope = Scope::new();

        let first = {
            let mut ctx = ResolverContext::new(&registry, Some(&mut scope), &options);
            downcast::<Service>(&ctx.produce(&Key::of::<Service>()).unwrap()).unwrap()
        };
        let second = {
            let mut ctx = ResolverContext::new(&registry, Some(&mut scope), &options);
            downcast::<Service>(&ctx.produce(&Key::of::<Service>()).unwrap()).unwrap()
        };

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.counter.0.get(), 1);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn missing_dependency_is_reported_before_building() {
        let registry = Registry::new();
        let options = ResolverOptions::default();
        let built = Rc::new(Cell::new(false));
        let flag = built.clone();
        let ctor = Constructor::from_fn(move |(_c,): (Rc<Counter>,)| {
            flag.set(true);
            Ok(0u8)
        })
        .into_erased();

        let mut ctx = ResolverContext::new(&registry, None, &options);
        match ctx.construct(&ctor) {
            Err(DiError::DependencyNotFound(name)) => assert!(name.ends_with("Counter")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
        assert!(!built.get());
        assert_eq!(ctx.stack.depth(), 0);
    }
}
