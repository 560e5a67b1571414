//! The container builder: the registry of pending descriptors.
//!
//! Every registration is validated eagerly; a rejected registration leaves
//! the builder untouched. [`ContainerBuilder::build`] freezes the registry
//! into a [`Container`] exactly once.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::component::{Component, Implements};
use crate::container::Container;
use crate::descriptor::ServiceDescriptor;
use crate::error::{RegistrationFailure, Result, SandiqError};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::scan::{self, ScanEntry};

/// Collects registrations for one [`Container`].
///
/// Created standalone for a root container with [`Container::builder`], or
/// from an existing container with [`Container::create_child_container`].
///
/// # Examples
/// ```rust,ignore
/// let mut builder = Container::builder();
/// builder
///     .register::<dyn Logger, ConsoleLogger>(Lifetime::Singleton)?
///     .register_self::<FileSystem>(Lifetime::Transient)?;
/// let container = builder.build()?;
/// ```
pub struct ContainerBuilder {
    pending: Vec<ServiceDescriptor>,
    parent: Option<Arc<Container>>,
    built: bool,
}

impl ContainerBuilder {
    /// Creates a builder for a root container.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            parent: None,
            built: false,
        }
    }

    pub(crate) fn with_parent(parent: Arc<Container>) -> Self {
        Self {
            pending: Vec::new(),
            parent: Some(parent),
            built: false,
        }
    }

    /// The container the built container will be a child of.
    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    /// Number of accepted registrations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    // ── Declared constructor ──

    /// Registers `I` as an implementation of contract `C`.
    ///
    /// `I` must declare exactly one constructor; its parameters are
    /// resolved on every construction.
    pub fn register<C, I>(&mut self, lifetime: Lifetime) -> Result<&mut Self>
    where
        C: ?Sized + Send + Sync + 'static,
        I: Component + Implements<C>,
    {
        self.check::<I>(lifetime)?;

        let mut constructors = I::constructors();
        let constructor = match constructors.len() {
            1 => constructors.remove(0),
            0 => return Err(Self::rejected::<I>(RegistrationFailure::NoConstructor)),
            count => {
                return Err(Self::rejected::<I>(RegistrationFailure::AmbiguousConstructors {
                    count,
                }));
            }
        };

        Ok(self.push(ServiceDescriptor::with_constructor::<C, I>(lifetime, constructor)))
    }

    /// Registers `I` under its own type.
    pub fn register_self<I: Component>(&mut self, lifetime: Lifetime) -> Result<&mut Self> {
        self.register::<I, I>(lifetime)
    }

    // ── Factory ──

    /// Registers `I` as an implementation of `C`, built by `factory`.
    ///
    /// The factory receives the container resolving it and bypasses the
    /// declared constructors, so types with none or several are accepted.
    pub fn register_factory<C, I>(
        &mut self,
        lifetime: Lifetime,
        factory: impl Fn(&Container) -> Result<I> + Send + Sync + 'static,
    ) -> Result<&mut Self>
    where
        C: ?Sized + Send + Sync + 'static,
        I: Component + Implements<C>,
    {
        self.check::<I>(lifetime)?;
        Ok(self.push(ServiceDescriptor::with_factory::<C, I>(lifetime, factory)))
    }

    /// Registers `I` under its own type, built by `factory`.
    pub fn register_self_factory<I: Component>(
        &mut self,
        lifetime: Lifetime,
        factory: impl Fn(&Container) -> Result<I> + Send + Sync + 'static,
    ) -> Result<&mut Self> {
        self.register_factory::<I, I>(lifetime, factory)
    }

    // ── Pre-built instance ──

    /// Registers an already built instance under its own type.
    ///
    /// Every resolve returns this exact instance. It is never tracked for
    /// disposal: the caller keeps ownership of its teardown.
    pub fn register_instance<I: Component>(
        &mut self,
        instance: Arc<I>,
        lifetime: Lifetime,
    ) -> Result<&mut Self> {
        self.check::<I>(lifetime)?;
        Ok(self.push(ServiceDescriptor::with_instance(instance, lifetime)))
    }

    // ── Scanning ──

    /// Registers every scanned type declared in `module` or below it.
    /// An empty `module` registers every collected entry.
    ///
    /// Entries go through the ordinary registration path. If one is
    /// rejected, the registrations added by this call are rolled back.
    pub fn register_by_scan(&mut self, module: &str) -> Result<&mut Self> {
        self.ensure_open(TypeKey::of::<ScanEntry>())?;
        let entries = scan::scanned(module);
        debug!(module, entries = entries.len(), "Registering scanned types");
        self.register_scanned(entries)
    }

    /// Registers an explicit table of scan entries, in order.
    pub fn register_scanned<'e>(
        &mut self,
        entries: impl IntoIterator<Item = &'e ScanEntry>,
    ) -> Result<&mut Self> {
        self.ensure_open(TypeKey::of::<ScanEntry>())?;

        let before = self.pending.len();
        for entry in entries {
            if let Err(err) = entry.apply(self) {
                self.pending.truncate(before);
                return Err(err);
            }
        }
        Ok(self)
    }

    // ── Build ──

    /// Freezes the registrations into a container.
    ///
    /// # Errors
    /// [`SandiqError::AlreadyBuilt`] if this builder was built before.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(&mut self) -> Result<Arc<Container>> {
        if self.built {
            return Err(SandiqError::AlreadyBuilt);
        }
        self.built = true;

        let descriptors = std::mem::take(&mut self.pending);
        info!(
            registered = descriptors.len(),
            child = self.parent.is_some(),
            "Building container"
        );
        Ok(Arc::new(Container::new(descriptors, self.parent.clone())))
    }

    // ── Internal ──

    fn check<I: Component>(&self, lifetime: Lifetime) -> Result<()> {
        let implementation = TypeKey::of::<I>();
        self.ensure_open(implementation)?;

        if lifetime == Lifetime::Transient && I::DISPOSABLE {
            return Err(Self::rejected::<I>(RegistrationFailure::TransientDisposable));
        }

        if self
            .pending
            .iter()
            .any(|descriptor| descriptor.implementation() == implementation)
        {
            return Err(Self::rejected::<I>(RegistrationFailure::AlreadyRegistered));
        }

        Ok(())
    }

    fn ensure_open(&self, subject: TypeKey) -> Result<()> {
        if self.built {
            return Err(SandiqError::registration(subject, RegistrationFailure::BuilderFrozen));
        }
        Ok(())
    }

    fn rejected<I: 'static>(reason: RegistrationFailure) -> SandiqError {
        SandiqError::registration(TypeKey::of::<I>(), reason)
    }

    fn push(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        debug!(
            contract = %descriptor.contract(),
            implementation = %descriptor.implementation(),
            lifetime = %descriptor.lifetime(),
            factory = descriptor.has_factory(),
            "Registered service"
        );
        self.pending.push(descriptor);
        self
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("pending", &self.pending.len())
            .field("child", &self.parent.is_some())
            .field("built", &self.built)
            .finish()
    }
}
