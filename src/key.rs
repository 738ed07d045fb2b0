//! Type identity keys for binding storage and lookup.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key for binding storage and lookup.
///
/// A key identifies one type taking part in the object graph, either as an
/// interface (including unsized ones such as `dyn Trait`) or as an
/// implementation. Equality, ordering and hashing only look at the `TypeId`;
/// the type name is carried along for diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{Key, key_of_type};
///
/// trait Logger {}
///
/// let a = key_of_type::<String>();
/// let b = Key::of::<String>();
/// assert_eq!(a, b);
/// assert_eq!(a.display_name(), "alloc::string::String");
///
/// // Unsized interfaces have keys too
/// let logger = Key::of::<dyn Logger>();
/// assert_ne!(logger, a);
/// assert!(logger.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for the type `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    ///
    /// Returns the human-readable type name for debugging and error
    /// messages. This is the `std::any::type_name` result.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// Hot path: TypeId comparison only, the name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
