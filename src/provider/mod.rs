//! Lifetime providers.
//!
//! A provider is what a binding stores: given the current resolution context
//! it produces a value for the binding's interface. There is one provider per
//! lifetime policy.

use tracing::trace;

use crate::error::{DiError, DiResult};
use crate::interface::Upcast;
use crate::introspect::ErasedConstructor;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{downcast, erase, AnyRc};

mod context;
mod scope;

pub(crate) use context::ResolverContext;
pub use scope::Scope;

/// Converts an erased implementation handle into an erased interface handle.
pub(crate) type Upcaster = fn(&AnyRc) -> DiResult<AnyRc>;

pub(crate) fn upcaster<I, T>() -> Upcaster
where
    I: ?Sized + 'static,
    T: Upcast<I>,
{
    fn convert<I: ?Sized + 'static, T: Upcast<I>>(value: &AnyRc) -> DiResult<AnyRc> {
        let concrete = downcast::<T>(value)?;
        Ok(erase::<I>(T::upcast(concrete)))
    }
    convert::<I, T>
}

/// Produces instances for one binding.
pub(crate) trait Provider {
    /// Lifetime policy this provider implements.
    fn lifetime(&self) -> Lifetime;

    /// Key of the implementation type behind the binding.
    fn implementation(&self) -> &Key;

    /// Dependencies of the implementation's constructor; empty for
    /// already-materialized values.
    fn dependencies(&self) -> &[Key] {
        &[]
    }

    /// The materialized instance, for providers holding one.
    fn instance(&self) -> Option<&AnyRc> {
        None
    }

    /// Produces a value, erased as an `Rc` of the bound interface.
    fn produce(&self, ctx: &mut ResolverContext<'_>) -> DiResult<AnyRc>;
}

/// Holds one already-materialized instance.
pub(crate) struct SingletonProvider {
    implementation: Key,
    value: AnyRc,
}

impl SingletonProvider {
    pub(crate) fn new(implementation: Key, value: AnyRc) -> Self {
        Self { implementation, value }
    }
}

impl Provider for SingletonProvider {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }

    fn implementation(&self) -> &Key {
        &self.implementation
    }

    fn instance(&self) -> Option<&AnyRc> {
        Some(&self.value)
    }

    #[inline]
    fn produce(&self, _ctx: &mut ResolverContext<'_>) -> DiResult<AnyRc> {
        Ok(self.value.clone())
    }
}

/// Builds a new instance on every request.
pub(crate) struct TransientProvider {
    constructor: ErasedConstructor,
    upcast: Upcaster,
}

impl TransientProvider {
    pub(crate) fn new(constructor: ErasedConstructor, upcast: Upcaster) -> Self {
        Self { constructor, upcast }
    }
}

impl Provider for TransientProvider {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Transient
    }

    fn implementation(&self) -> &Key {
        self.constructor.target()
    }

    fn dependencies(&self) -> &[Key] {
        self.constructor.dependencies()
    }

    fn produce(&self, ctx: &mut ResolverContext<'_>) -> DiResult<AnyRc> {
        let value = ctx.construct(&self.constructor)?;
        (self.upcast)(&value)
    }
}

/// Builds at most one instance per scope, cached in the scope under the
/// implementation key.
pub(crate) struct ScopedProvider {
    constructor: ErasedConstructor,
    upcast: Upcaster,
}

impl ScopedProvider {
    pub(crate) fn new(constructor: ErasedConstructor, upcast: Upcaster) -> Self {
        Self { constructor, upcast }
    }
}

impl Provider for ScopedProvider {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Scoped
    }

    fn implementation(&self) -> &Key {
        self.constructor.target()
    }

    fn dependencies(&self) -> &[Key] {
        self.constructor.dependencies()
    }

    fn produce(&self, ctx: &mut ResolverContext<'_>) -> DiResult<AnyRc> {
        let target = *self.constructor.target();
        let scope = ctx
            .scope()
            .ok_or(DiError::MissingScope(target.display_name()))?;

        if let Some(cached) = scope.cached(&target) {
            trace!(scope = scope.id(), key = %target, "scoped cache hit");
            return (self.upcast)(&cached);
        }

        let value = ctx.construct(&self.constructor)?;
        if let Some(scope) = ctx.scope() {
            trace!(scope = scope.id(), key = %target, "scoped instance materialized");
            scope.cache(target, value.clone());
        }
        (self.upcast)(&value)
    }
}
