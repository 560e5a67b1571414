//! Core container implementation for Sandiq DI.

pub mod component;
pub mod container;
pub mod descriptor;
pub mod disposer;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod registry;
pub mod resolve;
pub mod scan;
pub mod strategy;

#[cfg(test)]
mod fixtures;

pub use component::{Component, Constructor, Dispose, Implements};
pub use container::{Container, prelude};
pub use descriptor::ServiceDescriptor;
pub use disposer::Disposer;
pub use error::{
    AmbiguousError, ErrorKind, NotFoundError, RegistrationError, RegistrationFailure, Result,
    SandiqError,
};
pub use key::TypeKey;
pub use lifetime::Lifetime;
pub use registry::ContainerBuilder;
pub use resolve::{Dependency, ResolveContext};
pub use scan::{ScanEntry, ScanRegisterFn};
pub use strategy::ResolveStrategy;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
