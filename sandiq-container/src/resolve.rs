//! Parameter resolution for constructors.
//!
//! A [`ResolveContext`] is handed to every declared constructor. It pins the
//! container doing the construction and the strategy of the top-level call,
//! so parameters are looked up exactly where the caller asked.
//!
//! The shape of a parameter picks the lookup, via [`Dependency`]:
//!
//! | parameter            | lookup                                   |
//! |----------------------|------------------------------------------|
//! | `Arc<C>`             | `resolve_one::<C>`                       |
//! | `Vec<Arc<C>>`        | `resolve_many::<C>`                      |
//! | `Option<Arc<C>>`     | `resolve_one::<C>`, `None` when missing  |
//! | `u32`, `()`, `&str`  | always an invalid-argument error         |

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{Result, SandiqError};
use crate::key::TypeKey;
use crate::strategy::ResolveStrategy;

/// Where and how the current construction resolves its parameters.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    container: &'a Container,
    strategy: ResolveStrategy,
    path: &'a [TypeKey],
}

impl<'a> ResolveContext<'a> {
    pub(crate) fn new(container: &'a Container, strategy: ResolveStrategy, path: &'a [TypeKey]) -> Self {
        Self {
            container,
            strategy,
            path,
        }
    }

    /// The container performing the construction.
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The strategy propagated from the top-level resolve call.
    pub fn strategy(&self) -> ResolveStrategy {
        self.strategy
    }

    /// Implementations currently under construction, outermost first.
    pub fn path(&self) -> &'a [TypeKey] {
        self.path
    }

    /// Resolves a single instance of `C`.
    pub fn one<C: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<C>> {
        self.container.resolve_one_at::<C>(self.strategy, self.path)
    }

    /// Resolves every instance of `C` visible under the current strategy.
    pub fn many<C: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<C>>> {
        self.container.resolve_many_at::<C>(self.strategy, self.path)
    }

    /// Resolves a parameter of any supported shape.
    pub fn get<D: Dependency>(&self) -> Result<D> {
        D::resolve_from(self)
    }
}

impl fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("strategy", &self.strategy)
            .field("path", &self.path)
            .finish()
    }
}

/// A value a constructor can receive as a parameter.
pub trait Dependency: Sized {
    fn resolve_from(ctx: &ResolveContext<'_>) -> Result<Self>;
}

impl<C: ?Sized + Send + Sync + 'static> Dependency for Arc<C> {
    fn resolve_from(ctx: &ResolveContext<'_>) -> Result<Self> {
        ctx.one::<C>()
    }
}

impl<C: ?Sized + Send + Sync + 'static> Dependency for Vec<Arc<C>> {
    fn resolve_from(ctx: &ResolveContext<'_>) -> Result<Self> {
        ctx.many::<C>()
    }
}

impl<C: ?Sized + Send + Sync + 'static> Dependency for Option<Arc<C>> {
    fn resolve_from(ctx: &ResolveContext<'_>) -> Result<Self> {
        match ctx.one::<C>() {
            Ok(instance) => Ok(Some(instance)),
            Err(SandiqError::NotFound(err)) if err.requested == TypeKey::of::<C>() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

macro_rules! value_types {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Dependency for $ty {
                fn resolve_from(_: &ResolveContext<'_>) -> Result<Self> {
                    Err(value_type_error(type_name::<$ty>()))
                }
            }
        )+

        /// Returns `true` for scalars that can never be a service.
        pub(crate) fn is_value_type(key: TypeKey) -> bool {
            [$(TypeKey::of::<$ty>()),+].contains(&key)
        }
    };
}

value_types!(
    (),
    bool,
    char,
    &'static str,
    f32,
    f64,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
);

pub(crate) fn value_type_error(name: &str) -> SandiqError {
    SandiqError::InvalidArgument(format!(
        "{name} is a value type; only shared services (Arc<T>, Vec<Arc<T>>) can be resolved"
    ))
}
