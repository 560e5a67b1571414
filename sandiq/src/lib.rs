//! # Sandiq — hierarchical dependency injection for Rust
//!
//! Containers are built from a [`ContainerBuilder`], can spawn child
//! containers that see their ancestors' registrations, and dispose the
//! singletons they built in reverse construction order.
//!
//! ```rust
//! use sandiq::prelude::*;
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! #[derive(Component)]
//! #[component(implements = "dyn Logger")]
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn name(&self) -> &'static str { "console" }
//! }
//!
//! #[derive(Component)]
//! struct UserService {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! let mut builder = Container::builder();
//! builder.register::<dyn Logger, ConsoleLogger>(Lifetime::Singleton)?;
//! let root = builder.build()?;
//!
//! let mut builder = root.create_child_container()?;
//! builder.register_self::<UserService>(Lifetime::Transient)?;
//! let request = builder.build()?;
//!
//! let service: Arc<UserService> = request.resolve_one(ResolveStrategy::Any)?;
//! assert_eq!(service.logger.name(), "console");
//! # Ok::<(), SandiqError>(())
//! ```

pub use sandiq_container::*;
pub use sandiq_derive::*;
pub use sandiq_support::*;

pub mod prelude {
    pub use sandiq_container::prelude::*;
    pub use sandiq_derive::Component;
}
