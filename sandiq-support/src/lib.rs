//! # Sandiq Support
//!
//! Shared helpers for the Sandiq DI crates.
//!
//! This crate provides:
//! - Rendering of resolution paths and type names for error messages
//! - "Did you mean" suggestions over registered type names

pub mod rendering;
