//! Error types for Sandiq container operations.
//!
//! Every failure is returned to the immediate caller; nothing is retried
//! and nothing is logged at error level. Messages name the types involved
//! and end with a hint on how to fix the registration.

use std::fmt;

use sandiq_support::rendering::{render_list, render_path, shorten_type_name};

use crate::key::TypeKey;
use crate::strategy::ResolveStrategy;

/// Main error type for all Sandiq operations.
#[derive(Debug, thiserror::Error)]
pub enum SandiqError {
    /// A registration was rejected. The builder is left unchanged.
    #[error("{}", .0)]
    Registration(RegistrationError),

    /// `build()` was called on a builder that already produced its container.
    #[error("Container builder was already built. Each builder produces exactly one container")]
    AlreadyBuilt,

    /// The container has been disposed.
    #[error("Container was disposed\n  Hint: Resolve from a live container; disposing a parent does not dispose its children")]
    Disposed,

    /// An argument can never be resolved or parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Nothing is registered for the requested contract in the searched scope.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// More than one registration matches where exactly one was required.
    #[error("{}", .0)]
    Ambiguous(AmbiguousError),

    /// A `NonLocal` resolution was issued on a root container.
    #[error("Cannot resolve {requested} with strategy NonLocal: container has no parent\n  Hint: Use ResolveStrategy::Any or ResolveStrategy::Local on root containers")]
    MissingParent {
        /// The contract that was requested.
        requested: TypeKey,
    },

    /// A factory failed, or produced something of the wrong type.
    #[error("Failed to construct {key}: {source}")]
    Construction {
        key: TypeKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Coarse classification of [`SandiqError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Registration,
    InvalidState,
    InvalidArgument,
    ServiceNotFound,
    AmbiguousResolution,
    MissingParent,
    Construction,
}

impl SandiqError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SandiqError::Registration(_) => ErrorKind::Registration,
            SandiqError::AlreadyBuilt | SandiqError::Disposed => ErrorKind::InvalidState,
            SandiqError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SandiqError::NotFound(_) => ErrorKind::ServiceNotFound,
            SandiqError::Ambiguous(_) => ErrorKind::AmbiguousResolution,
            SandiqError::MissingParent { .. } => ErrorKind::MissingParent,
            SandiqError::Construction { .. } => ErrorKind::Construction,
        }
    }

    /// Wraps a failure raised inside a user factory.
    pub fn construction<T: ?Sized + 'static>(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SandiqError::Construction {
            key: TypeKey::of::<T>(),
            source: source.into(),
        }
    }

    pub(crate) fn registration(implementation: TypeKey, reason: RegistrationFailure) -> Self {
        SandiqError::Registration(RegistrationError { implementation, reason })
    }
}

/// Why a registration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationFailure {
    /// The implementation type already has a registration in this builder.
    AlreadyRegistered,
    /// The type declares no constructor and no factory was given.
    NoConstructor,
    /// The type declares several constructors and no factory was given.
    AmbiguousConstructors { count: usize },
    /// A disposable type was registered as transient.
    TransientDisposable,
    /// The builder has already been built.
    BuilderFrozen,
}

/// Error when a registration is rejected.
#[derive(Debug)]
pub struct RegistrationError {
    /// The implementation type of the rejected registration.
    pub implementation: TypeKey,
    pub reason: RegistrationFailure,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.implementation;
        match &self.reason {
            RegistrationFailure::AlreadyRegistered => {
                write!(f, "Implementation already registered: {name}")?;
                write!(f, "\n  Hint: Each implementation type may be registered once per container; register it in a child container to shadow it")
            }
            RegistrationFailure::NoConstructor => {
                write!(f, "Cannot register {name}: it declares no constructor")?;
                write!(f, "\n  Hint: Register a concrete type, or supply a factory with .register_factory()")
            }
            RegistrationFailure::AmbiguousConstructors { count } => {
                write!(f, "Cannot register {name}: it declares {count} constructors")?;
                write!(f, "\n  Hint: Declare exactly one constructor, or pick one with .register_factory()")
            }
            RegistrationFailure::TransientDisposable => {
                write!(f, "Cannot register {name} as Transient: it is disposable")?;
                write!(f, "\n  Hint: Transient instances are never tracked for disposal; register it as Singleton")
            }
            RegistrationFailure::BuilderFrozen => {
                write!(f, "Cannot register {name}: container builder was already built")?;
                write!(f, "\n  Hint: Register dependencies before calling .build(), or create a child container")
            }
        }
    }
}

/// Error when a contract could not be found.
///
/// Includes the resolution path and hints about what went wrong.
#[derive(Debug)]
pub struct NotFoundError {
    /// The contract that was requested.
    pub requested: TypeKey,
    /// The strategy of the failed lookup.
    pub strategy: ResolveStrategy,
    /// Implementations under construction when the lookup failed, outermost first.
    pub path: Vec<TypeKey>,
    /// Contracts under which `requested` is registered as an implementation.
    pub registered_as: Vec<TypeKey>,
    /// Similar contracts that are registered (for "did you mean?" suggestions).
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Service not found: {} (strategy {})",
            self.requested, self.strategy
        )?;

        if !self.path.is_empty() {
            let names: Vec<&str> = self.path.iter().map(TypeKey::type_name).collect();
            write!(f, "\n  Required by: {}", render_path(&names))?;
        }

        if !self.registered_as.is_empty() {
            let names: Vec<&str> = self.registered_as.iter().map(TypeKey::type_name).collect();
            write!(
                f,
                "\n  {} is registered as an implementation of: {}",
                shorten_type_name(self.requested.type_name()),
                render_list(&names)
            )?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to register an implementation of {}?",
            shorten_type_name(self.requested.type_name())
        )
    }
}

/// Error when several registrations match a single-instance request.
#[derive(Debug)]
pub struct AmbiguousError {
    pub requested: TypeKey,
    /// Implementation types of every matching registration.
    pub candidates: Vec<TypeKey>,
}

impl fmt::Display for AmbiguousError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.candidates.iter().map(TypeKey::type_name).collect();
        write!(
            f,
            "Ambiguous resolution: {} services registered for {}: {}",
            self.candidates.len(),
            self.requested,
            render_list(&names)
        )?;
        write!(f, "\n  Hint: Use .resolve_many() to resolve them all")
    }
}

/// Convenient Result type for Sandiq operations.
pub type Result<T> = std::result::Result<T, SandiqError>;

#[cfg(test)]
mod tests {
    use super::*;

    trait Logger {}
    struct ConsoleLogger;
    struct FileLogger;
    struct FileSystem;

    #[test]
    fn not_found_error_display() {
        let err = SandiqError::NotFound(NotFoundError {
            requested: TypeKey::of::<dyn Logger>(),
            strategy: ResolveStrategy::Local,
            path: vec![TypeKey::of::<FileSystem>()],
            registered_as: vec![],
            suggestions: vec![],
        });

        let msg = err.to_string();
        assert!(msg.contains("Service not found"));
        assert!(msg.contains("Logger"));
        assert!(msg.contains("Required by: FileSystem"));
        assert!(msg.contains("Local"));
        assert_eq!(err.kind(), ErrorKind::ServiceNotFound);
    }

    #[test]
    fn not_found_mentions_contract_registration() {
        let err = NotFoundError {
            requested: TypeKey::of::<ConsoleLogger>(),
            strategy: ResolveStrategy::Any,
            path: vec![],
            registered_as: vec![TypeKey::of::<dyn Logger>()],
            suggestions: vec![],
        };

        assert!(err.to_string().contains("registered as an implementation of: dyn Logger"));
    }

    #[test]
    fn ambiguous_error_display() {
        let err = SandiqError::Ambiguous(AmbiguousError {
            requested: TypeKey::of::<dyn Logger>(),
            candidates: vec![TypeKey::of::<ConsoleLogger>(), TypeKey::of::<FileLogger>()],
        });

        let msg = err.to_string();
        assert!(msg.contains("ConsoleLogger, FileLogger"));
        assert!(msg.contains("resolve_many"));
        assert_eq!(err.kind(), ErrorKind::AmbiguousResolution);
    }

    #[test]
    fn registration_error_display() {
        let err = SandiqError::registration(
            TypeKey::of::<FileLogger>(),
            RegistrationFailure::AmbiguousConstructors { count: 3 },
        );

        let msg = err.to_string();
        assert!(msg.contains("3 constructors"));
        assert!(msg.contains("FileLogger"));
        assert_eq!(err.kind(), ErrorKind::Registration);
    }

    #[test]
    fn invalid_state_kinds() {
        assert_eq!(SandiqError::AlreadyBuilt.kind(), ErrorKind::InvalidState);
        assert_eq!(SandiqError::Disposed.kind(), ErrorKind::InvalidState);
        assert!(SandiqError::Disposed.to_string().contains("disposed"));
    }

    #[test]
    fn construction_wraps_source() {
        let err = SandiqError::construction::<FileSystem>("disk unavailable");
        assert!(err.to_string().contains("disk unavailable"));
        assert_eq!(err.kind(), ErrorKind::Construction);
    }
}
