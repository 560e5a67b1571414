//! Service descriptors: one registration each.
//!
//! A descriptor pairs a contract with the implementation that satisfies it
//! and knows how to materialize that implementation. Everything except the
//! singleton cache slot is fixed once the descriptor is created.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::component::{Component, Constructor, Dispose, Implements};
use crate::container::Container;
use crate::disposer::Disposer;
use crate::error::{Result, SandiqError};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::resolve::ResolveContext;

/// A type-erased resolved instance.
///
/// Always holds an `Arc<C>` where `C` is the descriptor's contract, so
/// `downcast_ref::<Arc<C>>()` recovers the typed handle.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

type BuildFn = Arc<dyn Fn(&ResolveContext<'_>) -> Result<Constructed> + Send + Sync>;

/// Output of one construction: the erased contract handle plus the
/// implementation's disposal capability, if any.
pub(crate) struct Constructed {
    instance: Instance,
    disposable: Option<Arc<dyn Dispose>>,
}

impl Constructed {
    fn of<C, I>(value: I) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Component + Implements<C>,
    {
        let shared = Arc::new(value);
        let disposable = I::into_dispose(Arc::clone(&shared));
        let contract: Arc<C> = shared.upcast();
        Self {
            instance: Arc::new(contract),
            disposable,
        }
    }
}

/// Recovers the typed contract handle from an erased instance.
pub(crate) fn downcast<C: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Result<Arc<C>> {
    instance
        .downcast_ref::<Arc<C>>()
        .cloned()
        .ok_or_else(|| {
            SandiqError::construction::<C>(format!(
                "type mismatch: expected Arc<{}>",
                std::any::type_name::<C>()
            ))
        })
}

/// How a descriptor produces its instance.
enum Activation {
    /// A pre-built instance supplied at registration.
    Instance(Instance),
    /// A user factory receiving the resolution container.
    Factory(BuildFn),
    /// The implementation's single declared constructor.
    Constructor { label: &'static str, build: BuildFn },
}

/// The registered record of contract, implementation, lifetime and
/// activation, plus the singleton cache slot.
pub struct ServiceDescriptor {
    contract: TypeKey,
    implementation: TypeKey,
    lifetime: Lifetime,
    activation: Activation,
    cached: OnceCell<Instance>,
}

impl ServiceDescriptor {
    pub(crate) fn with_constructor<C, I>(lifetime: Lifetime, constructor: Constructor<I>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Component + Implements<C>,
    {
        let label = constructor.label();
        let build: BuildFn = Arc::new(move |ctx: &ResolveContext<'_>| {
            constructor.invoke(ctx).map(Constructed::of::<C, I>)
        });

        Self::new::<C, I>(lifetime, Activation::Constructor { label, build })
    }

    pub(crate) fn with_factory<C, I>(
        lifetime: Lifetime,
        factory: impl Fn(&Container) -> Result<I> + Send + Sync + 'static,
    ) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Component + Implements<C>,
    {
        let build: BuildFn = Arc::new(move |ctx: &ResolveContext<'_>| {
            factory(ctx.container()).map(Constructed::of::<C, I>)
        });

        Self::new::<C, I>(lifetime, Activation::Factory(build))
    }

    pub(crate) fn with_instance<I: Component>(instance: Arc<I>, lifetime: Lifetime) -> Self {
        let erased: Instance = Arc::new(instance);
        Self::new::<I, I>(lifetime, Activation::Instance(erased))
    }

    fn new<C: ?Sized + 'static, I: 'static>(lifetime: Lifetime, activation: Activation) -> Self {
        Self {
            contract: TypeKey::of::<C>(),
            implementation: TypeKey::of::<I>(),
            lifetime,
            activation,
            cached: OnceCell::new(),
        }
    }

    /// The type callers resolve by.
    pub fn contract(&self) -> TypeKey {
        self.contract
    }

    /// The concrete type constructed; unique within one container.
    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Returns `true` if construction is delegated to a user factory.
    pub fn has_factory(&self) -> bool {
        matches!(self.activation, Activation::Factory(_))
    }

    /// Returns `true` if an instance exists: pre-supplied or an already
    /// materialized singleton.
    pub fn is_materialized(&self) -> bool {
        matches!(self.activation, Activation::Instance(_)) || self.cached.get().is_some()
    }

    /// Returns the cached instance or builds a new one.
    ///
    /// The build runs against `ctx.container()`, the container the lookup
    /// was issued on. A disposable singleton is handed to `disposer`. The
    /// first construction that reaches the cache wins; later ones are
    /// discarded.
    pub(crate) fn materialize(
        &self,
        ctx: &ResolveContext<'_>,
        disposer: &Disposer,
    ) -> Result<Instance> {
        let build = match &self.activation {
            Activation::Instance(instance) => return Ok(Arc::clone(instance)),
            Activation::Factory(build) | Activation::Constructor { build, .. } => build,
        };

        if let Some(cached) = self.cached.get() {
            trace!(implementation = %self.implementation, "Singleton cache hit");
            return Ok(Arc::clone(cached));
        }

        let constructed = build(ctx)?;
        trace!(implementation = %self.implementation, lifetime = %self.lifetime, "Constructed");

        if !self.lifetime.is_cached() {
            return Ok(constructed.instance);
        }

        match self.cached.try_insert(constructed.instance) {
            Ok(stored) => {
                if let Some(disposable) = constructed.disposable {
                    disposer.track(self.implementation, disposable);
                }
                Ok(Arc::clone(stored))
            }
            Err((winner, _)) => Ok(Arc::clone(winner)),
        }
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activation = match &self.activation {
            Activation::Instance(_) => "instance",
            Activation::Factory(_) => "factory",
            Activation::Constructor { label, .. } => *label,
        };
        f.debug_struct("ServiceDescriptor")
            .field("contract", &self.contract)
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("activation", &activation)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}
