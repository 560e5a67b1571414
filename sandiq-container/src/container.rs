//! # The Container — heart of Sandiq
//!
//! Resolves registered services, caches singletons per container and owns
//! the teardown of the disposable singletons it built.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container ◄──────── parent ──┐
//!                                    │                        │
//!                         create_child_container()            │
//!                                    │                        │
//!                                    ▼                        │
//!                             ContainerBuilder ──build()──> Container (child)
//! ```
//!
//! A child only holds a shared reference to its parent; the parent knows
//! nothing about its children. Disposing either never touches the other.
//!
//! # Examples
//! ```rust
//! use sandiq_container::prelude::*;
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) -> String { format!("[console] {msg}") }
//! }
//! impl Component for ConsoleLogger {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new("ConsoleLogger", |_| Ok(ConsoleLogger))]
//!     }
//! }
//! sandiq_container::implements!(dyn Logger => ConsoleLogger);
//!
//! struct UserService {
//!     logger: Arc<dyn Logger>,
//! }
//! impl Component for UserService {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new("UserService", |ctx| Ok(UserService { logger: ctx.get()? }))]
//!     }
//! }
//!
//! let mut builder = Container::builder();
//! builder
//!     .register::<dyn Logger, ConsoleLogger>(Lifetime::Singleton)?
//!     .register_self::<UserService>(Lifetime::Transient)?;
//! let root = builder.build()?;
//!
//! let request = root.create_child_container()?.build()?;
//! let service: Arc<UserService> = request.resolve_one(ResolveStrategy::Any)?;
//! assert_eq!(service.logger.log("hi"), "[console] hi");
//!
//! request.dispose()?;
//! root.dispose()?;
//! # Ok::<(), SandiqError>(())
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sandiq_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, trace};

use crate::descriptor::{Instance, ServiceDescriptor, downcast};
use crate::disposer::Disposer;
use crate::error::{AmbiguousError, NotFoundError, Result, SandiqError};
use crate::key::TypeKey;
use crate::registry::ContainerBuilder;
use crate::resolve::{Dependency, ResolveContext, is_value_type, value_type_error};
use crate::strategy::ResolveStrategy;

/// An instance together with the implementation type that produced it.
struct Resolved {
    implementation: TypeKey,
    instance: Instance,
}

/// A built, immutable set of registrations.
///
/// Created by [`ContainerBuilder::build()`].
pub struct Container {
    descriptors: Vec<ServiceDescriptor>,
    parent: Option<Arc<Container>>,
    disposer: Disposer,
    disposed: AtomicBool,
    depth: usize,
}

impl Container {
    /// Create a builder for a root container.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn new(descriptors: Vec<ServiceDescriptor>, parent: Option<Arc<Container>>) -> Self {
        let depth = parent.as_ref().map_or(0, |parent| parent.depth + 1);
        Self {
            descriptors,
            parent,
            disposer: Disposer::new(),
            disposed: AtomicBool::new(false),
            depth,
        }
    }

    /// Starts a builder for a child of this container.
    ///
    /// # Errors
    /// [`SandiqError::Disposed`] if this container was disposed.
    pub fn create_child_container(self: &Arc<Self>) -> Result<ContainerBuilder> {
        self.ensure_alive()?;
        debug!(depth = self.depth + 1, "Creating child container");
        Ok(ContainerBuilder::with_parent(Arc::clone(self)))
    }

    // ── Resolution ──

    /// Resolve a single instance of contract `C`.
    ///
    /// ```rust,ignore
    /// let logger: Arc<dyn Logger> = container.resolve_one(ResolveStrategy::Any)?;
    /// ```
    pub fn resolve_one<C: ?Sized + Send + Sync + 'static>(
        &self,
        strategy: ResolveStrategy,
    ) -> Result<Arc<C>> {
        self.ensure_alive()?;
        self.resolve_one_at::<C>(strategy, &[])
    }

    /// Resolve every instance of contract `C` visible under `strategy`.
    pub fn resolve_many<C: ?Sized + Send + Sync + 'static>(
        &self,
        strategy: ResolveStrategy,
    ) -> Result<Vec<Arc<C>>> {
        self.ensure_alive()?;
        self.resolve_many_at::<C>(strategy, &[])
    }

    /// Resolve by shape: `Arc<C>` resolves one, `Vec<Arc<C>>` resolves many.
    ///
    /// ```rust,ignore
    /// let loggers: Vec<Arc<dyn Logger>> = container.resolve(ResolveStrategy::Any)?;
    /// ```
    pub fn resolve<D: Dependency>(&self, strategy: ResolveStrategy) -> Result<D> {
        self.ensure_alive()?;
        D::resolve_from(&ResolveContext::new(self, strategy, &[]))
    }

    /// Only the container a resolution starts on must be alive; nested
    /// lookups may pass through disposed ancestors.
    pub(crate) fn resolve_one_at<C: ?Sized + Send + Sync + 'static>(
        &self,
        strategy: ResolveStrategy,
        path: &[TypeKey],
    ) -> Result<Arc<C>> {
        let key = resolvable::<C>()?;
        let instance = self.resolve_one_erased(key, strategy, path)?;
        downcast::<C>(&instance)
    }

    pub(crate) fn resolve_many_at<C: ?Sized + Send + Sync + 'static>(
        &self,
        strategy: ResolveStrategy,
        path: &[TypeKey],
    ) -> Result<Vec<Arc<C>>> {
        let key = resolvable::<C>()?;
        self.resolve_many_erased(key, strategy, path)?
            .iter()
            .map(|resolved| downcast::<C>(&resolved.instance))
            .collect()
    }

    fn resolve_one_erased(
        &self,
        key: TypeKey,
        strategy: ResolveStrategy,
        path: &[TypeKey],
    ) -> Result<Instance> {
        trace!(contract = %key, %strategy, depth = self.depth, "Resolving");

        match strategy {
            ResolveStrategy::Local => match self.matches(key).as_slice() {
                [] => Err(self.not_found(key, strategy, path)),
                [descriptor] => self.materialize(self, descriptor, strategy, path),
                many => Err(ambiguous(key, many)),
            },
            ResolveStrategy::NonLocal => self
                .parent_for(key)?
                .resolve_one_erased(key, ResolveStrategy::Any, path),
            ResolveStrategy::Any => {
                for container in self.lineage() {
                    match container.matches(key).as_slice() {
                        [] => continue,
                        [descriptor] => {
                            return self.materialize(container, descriptor, strategy, path);
                        }
                        many => return Err(ambiguous(key, many)),
                    }
                }
                Err(self.not_found(key, strategy, path))
            }
        }
    }

    fn resolve_many_erased(
        &self,
        key: TypeKey,
        strategy: ResolveStrategy,
        path: &[TypeKey],
    ) -> Result<Vec<Resolved>> {
        trace!(contract = %key, %strategy, depth = self.depth, "Resolving many");

        match strategy {
            ResolveStrategy::Local => self.resolve_local_many(key, strategy, path),
            ResolveStrategy::NonLocal => self
                .parent_for(key)?
                .resolve_many_erased(key, ResolveStrategy::Any, path),
            ResolveStrategy::Any => {
                let mut resolved = self.resolve_local_many(key, strategy, path)?;
                if let Some(parent) = &self.parent {
                    let local: Vec<TypeKey> = resolved.iter().map(|r| r.implementation).collect();
                    let inherited = parent.resolve_many_erased(key, ResolveStrategy::Any, path)?;
                    resolved.extend(
                        inherited
                            .into_iter()
                            .filter(|r| !local.contains(&r.implementation)),
                    );
                }
                Ok(resolved)
            }
        }
    }

    fn resolve_local_many(
        &self,
        key: TypeKey,
        strategy: ResolveStrategy,
        path: &[TypeKey],
    ) -> Result<Vec<Resolved>> {
        self.matches(key)
            .into_iter()
            .map(|descriptor| {
                Ok(Resolved {
                    implementation: descriptor.implementation(),
                    instance: self.materialize(self, descriptor, strategy, path)?,
                })
            })
            .collect()
    }

    /// Materializes a descriptor of `owner` (this container or an ancestor).
    ///
    /// Factories and constructor parameters resolve against this container.
    /// A new disposable singleton is tracked by `owner`, or by this
    /// container once `owner` has been disposed.
    fn materialize(
        &self,
        owner: &Container,
        descriptor: &ServiceDescriptor,
        strategy: ResolveStrategy,
        path: &[TypeKey],
    ) -> Result<Instance> {
        let disposer = if owner.is_disposed() {
            &self.disposer
        } else {
            &owner.disposer
        };

        let mut path = path.to_vec();
        path.push(descriptor.implementation());
        descriptor.materialize(&ResolveContext::new(self, strategy, &path), disposer)
    }

    fn matches(&self, key: TypeKey) -> Vec<&ServiceDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.contract() == key)
            .collect()
    }

    /// This container followed by its ancestors, nearest first.
    fn lineage(&self) -> impl Iterator<Item = &Container> {
        std::iter::successors(Some(self), |container| container.parent.as_deref())
    }

    fn parent_for(&self, key: TypeKey) -> Result<&Container> {
        self.parent
            .as_deref()
            .ok_or(SandiqError::MissingParent { requested: key })
    }

    fn not_found(&self, key: TypeKey, strategy: ResolveStrategy, path: &[TypeKey]) -> SandiqError {
        let searched: Vec<&Container> = match strategy {
            ResolveStrategy::Local => vec![self],
            _ => self.lineage().collect(),
        };
        let descriptors = searched.iter().flat_map(|container| &container.descriptors);

        let registered_as = descriptors
            .clone()
            .filter(|descriptor| descriptor.implementation() == key && descriptor.contract() != key)
            .map(ServiceDescriptor::contract)
            .collect();

        let mut contracts: Vec<&str> = descriptors
            .map(|descriptor| descriptor.contract().type_name())
            .collect();
        contracts.sort_unstable();
        contracts.dedup();

        SandiqError::NotFound(NotFoundError {
            requested: key,
            strategy,
            path: path.to_vec(),
            registered_as,
            suggestions: suggest_similar(key.type_name(), &contracts, 3),
        })
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(SandiqError::Disposed);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn disposer(&self) -> &Disposer {
        &self.disposer
    }

    // ── Lifecycle ──

    /// Disposes every tracked singleton, most recently built first.
    ///
    /// Parent and children are not affected.
    ///
    /// # Errors
    /// [`SandiqError::Disposed`] if this container was already disposed.
    #[instrument(skip(self), fields(depth = self.depth))]
    pub fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return Err(SandiqError::Disposed);
        }

        let count = self.disposer.dispose_all();
        info!(disposed = count, "Container disposed");
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    // ── Introspection ──

    /// The registrations of this container, in registration order.
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    /// Number of ancestors; 0 for a root container.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if !self.is_disposed() && !self.disposer.is_empty() {
            debug!(depth = self.depth, "Disposing container on drop");
            self.disposer.dispose_all();
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.descriptors.len())
            .field("depth", &self.depth)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn resolvable<C: ?Sized + 'static>() -> Result<TypeKey> {
    let key = TypeKey::of::<C>();
    if is_value_type(key) {
        return Err(value_type_error(key.type_name()));
    }
    Ok(key)
}

fn ambiguous(key: TypeKey, matches: &[&ServiceDescriptor]) -> SandiqError {
    SandiqError::Ambiguous(AmbiguousError {
        requested: key,
        candidates: matches.iter().map(|descriptor| descriptor.implementation()).collect(),
    })
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::component::{Component, Constructor, Dispose, Implements};
    pub use crate::error::{ErrorKind, Result, SandiqError};
    pub use crate::key::TypeKey;
    pub use crate::lifetime::Lifetime;
    pub use crate::registry::ContainerBuilder;
    pub use crate::resolve::{Dependency, ResolveContext};
    pub use crate::scan::ScanEntry;
    pub use crate::strategy::ResolveStrategy;
}
