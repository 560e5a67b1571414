//! Proc-macro implementations for Sandiq.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod component;

/// Implements `Component` for a struct, and optionally `Implements` and a
/// scan entry.
///
/// Without `no_constructor` the struct gets a single constructor that
/// resolves every field through `Dependency`, so fields must be `Arc<T>`,
/// `Vec<Arc<T>>` or `Option<Arc<T>>`.
///
/// # Attributes
/// - `#[component(dispose)]`: the struct implements `Dispose`; instances are
///   tracked for disposal and may only be registered as singletons.
/// - `#[component(implements = "dyn Trait")]`: the struct can be registered
///   under that contract. Repeatable.
/// - `#[component(no_constructor)]`: declares no constructor; register the
///   struct through a factory or as an instance.
/// - `#[component(register(lifetime = "singleton", contract = "dyn Trait"))]`:
///   emits a scan entry picked up by `ContainerBuilder::register_by_scan`.
///   `lifetime` defaults to `"singleton"`, `contract` to the struct itself.
///
/// # Example
/// ```ignore
/// use sandiq::prelude::*;
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {}
///
/// #[derive(Component)]
/// #[component(register(lifetime = "singleton", contract = "dyn Logger"))]
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {}
///
/// #[derive(Component)]
/// struct UserService {
///     logger: Arc<dyn Logger>,
/// }
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    component::expand_component(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
