//! Derive macros for Sandiq.

pub use sandiq_macros::Component;
