//! Type identification keys.
//!
//! [`TypeKey`] identifies a contract or implementation type inside the
//! container. Equality and hashing go through [`TypeId`]; the type name is
//! carried along only for diagnostics.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use sandiq_support::rendering::shorten_type_name;

/// Uniquely identifies a type known to the container.
///
/// # Examples
/// ```
/// use sandiq_container::key::TypeKey;
///
/// trait Logger {}
///
/// let key = TypeKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key.short_name(), "String");
///
/// // Trait objects are keys too
/// assert_ne!(TypeKey::of::<dyn Logger>(), key);
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    /// Creates a key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of this type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without module paths.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.type_name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
