//! Scanned registrations.
//!
//! A [`ScanEntry`] is the static description of one declaratively marked
//! type: where it lives, its lifetime, an optional contract, and a function
//! forwarding it into the ordinary registration path. Entries are emitted by
//! `#[derive(Component)]` with a `register(...)` marker and collected at
//! link time; [`ContainerBuilder::register_by_scan`] picks those of one
//! module. A manually maintained `&[ScanEntry]` table works the same way
//! through [`ContainerBuilder::register_scanned`].
//!
//! [`ContainerBuilder::register_by_scan`]: crate::registry::ContainerBuilder::register_by_scan
//! [`ContainerBuilder::register_scanned`]: crate::registry::ContainerBuilder::register_scanned

use std::fmt;

use crate::error::Result;
use crate::lifetime::Lifetime;
use crate::registry::ContainerBuilder;

/// Forwards one scanned type into a builder.
pub type ScanRegisterFn = fn(&mut ContainerBuilder, Lifetime) -> Result<()>;

/// One `(implementation, lifetime, contract?)` tuple produced by scanning.
pub struct ScanEntry {
    module_path: &'static str,
    implementation: &'static str,
    contract: Option<&'static str>,
    lifetime: Lifetime,
    register: ScanRegisterFn,
}

impl ScanEntry {
    pub const fn new(
        module_path: &'static str,
        implementation: &'static str,
        contract: Option<&'static str>,
        lifetime: Lifetime,
        register: ScanRegisterFn,
    ) -> Self {
        Self {
            module_path,
            implementation,
            contract,
            lifetime,
            register,
        }
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    pub fn contract(&self) -> Option<&'static str> {
        self.contract
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Returns `true` if the entry was declared in `module` or below it.
    ///
    /// `module` is a crate or module path such as `my_app::services`; the
    /// empty string matches every entry.
    pub fn is_in(&self, module: &str) -> bool {
        module.is_empty()
            || self
                .module_path
                .strip_prefix(module)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    }

    pub(crate) fn apply(&self, builder: &mut ContainerBuilder) -> Result<()> {
        (self.register)(builder, self.lifetime)
    }
}

impl fmt::Debug for ScanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanEntry")
            .field("module_path", &self.module_path)
            .field("implementation", &self.implementation)
            .field("contract", &self.contract)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

inventory::collect!(ScanEntry);

/// Collected entries declared in `module` or below, ordered by module path
/// and then implementation name.
pub fn scanned(module: &str) -> Vec<&'static ScanEntry> {
    let mut entries: Vec<&'static ScanEntry> = inventory::iter::<ScanEntry>
        .into_iter()
        .filter(|entry| entry.is_in(module))
        .collect();
    entries.sort_by_key(|entry| (entry.module_path, entry.implementation));
    entries
}
