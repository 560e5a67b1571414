//! What the container needs to know about an implementation type.
//!
//! Rust has no runtime reflection, so every registrable type describes
//! itself through [`Component`]:
//! - which constructors it declares (exactly one is needed to register it
//!   without a factory),
//! - whether it is disposable.
//!
//! Upcasting to a contract such as `dyn Logger` is expressed with
//! [`Implements`]. Both are normally generated by `#[derive(Component)]`;
//! hand-written impls look like this:
//!
//! ```rust
//! use sandiq_container::prelude::*;
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {}
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {}
//!
//! impl Component for ConsoleLogger {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new("ConsoleLogger", |_| Ok(ConsoleLogger))]
//!     }
//! }
//! sandiq_container::implements!(dyn Logger => ConsoleLogger);
//!
//! let mut builder = Container::builder();
//! builder.register::<dyn Logger, ConsoleLogger>(Lifetime::Singleton).unwrap();
//! let container = builder.build().unwrap();
//! let _logger: Arc<dyn Logger> = container.resolve_one(ResolveStrategy::Any).unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::resolve::ResolveContext;

/// Capability of releasing resources when the owning container is torn down.
///
/// Instances are shared, so `dispose` takes `&self`; implementations use
/// interior mutability for their state.
pub trait Dispose: Send + Sync {
    fn dispose(&self);
}

/// A concrete type the container can register and construct.
pub trait Component: Send + Sync + Sized + 'static {
    /// Whether instances are disposable.
    ///
    /// Checked at registration time: disposable types cannot be transient.
    const DISPOSABLE: bool = false;

    /// Constructors this type declares.
    ///
    /// Registration without a factory requires exactly one. An empty list
    /// marks the type as abstract.
    fn constructors() -> Vec<Constructor<Self>>;

    /// Hands out the disposal capability of a freshly built singleton.
    ///
    /// Must return `Some` when [`DISPOSABLE`](Component::DISPOSABLE) is `true`.
    fn into_dispose(this: Arc<Self>) -> Option<Arc<dyn Dispose>> {
        let _ = this;
        None
    }
}

/// Conversion of a shared implementation into a shared contract.
///
/// Every type implements itself. Trait-object contracts are wired with
/// [`implements!`](crate::implements) or `#[component(implements = "...")]`.
pub trait Implements<C: ?Sized>: Send + Sync + 'static {
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

impl<T: ?Sized + Send + Sync + 'static> Implements<T> for T {
    #[inline]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares that implementation types can be upcast to a contract.
///
/// ```rust
/// trait Logger: Send + Sync {}
/// struct ConsoleLogger;
/// struct FileLogger;
/// impl Logger for ConsoleLogger {}
/// impl Logger for FileLogger {}
///
/// sandiq_container::implements!(dyn Logger => ConsoleLogger, FileLogger);
/// ```
#[macro_export]
macro_rules! implements {
    ($contract:ty => $($implementation:ty),+ $(,)?) => {
        $(
            impl $crate::component::Implements<$contract> for $implementation {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}

type BuildFn<T> = Arc<dyn Fn(&ResolveContext<'_>) -> Result<T> + Send + Sync>;

/// A declared constructor: a label for diagnostics and a build function
/// that pulls its parameters out of a [`ResolveContext`].
pub struct Constructor<T> {
    label: &'static str,
    build: BuildFn<T>,
}

impl<T> Constructor<T> {
    pub fn new(
        label: &'static str,
        build: impl Fn(&ResolveContext<'_>) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label,
            build: Arc::new(build),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn invoke(&self, ctx: &ResolveContext<'_>) -> Result<T> {
        (self.build)(ctx)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            build: Arc::clone(&self.build),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor").field("label", &self.label).finish()
    }
}
