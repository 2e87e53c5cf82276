use alloc::{borrow::Cow, sync::Arc};
use core::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

use crate::{
    any::{Instance, TypeInfo},
    errors::InstantiateErrorKind,
};

pub(crate) type KeyConstructor = fn() -> Result<Instance, InstantiateErrorKind>;

/// Opaque identifier for a thing that can be requested from an injector.
///
/// Keys are compared by identity of what they name, never structurally
/// interpreted: two type keys are equal iff their [`core::any::TypeId`]s are,
/// two named keys iff their strings are.
#[derive(Debug, Clone)]
pub struct Key {
    kind: KeyKind,
    constructor: Option<KeyConstructor>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyKind {
    Type(TypeInfo),
    Named(Cow<'static, str>),
}

impl Key {
    /// Creates a key identifying the type `T`.
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            kind: KeyKind::Type(TypeInfo::of::<T>()),
            constructor: None,
        }
    }

    /// Creates a key for `T` that can act as its own provider.
    ///
    /// An injector with default providers enabled resolves such a key even
    /// without a binding, and a binding with [`crate::Target::key`] invokes
    /// the carried constructor.
    #[inline]
    #[must_use]
    pub fn of_default<T>() -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        fn construct<T: Default + Send + Sync + 'static>() -> Result<Instance, InstantiateErrorKind> {
            Ok(Arc::new(T::default()) as _)
        }

        Self {
            kind: KeyKind::Type(TypeInfo::of::<T>()),
            constructor: Some(construct::<T>),
        }
    }

    /// Creates a string alias key.
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: KeyKind::Named(name.into()),
            constructor: None,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn constructor(&self) -> Option<KeyConstructor> {
        self.constructor
    }
}

// The constructor is deliberately ignored: `Key::of::<T>()` and
// `Key::of_default::<T>()` address the same binding.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind.cmp(&other.kind)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            KeyKind::Type(type_info) => f.write_str(type_info.short_name()),
            KeyKind::Named(name) => write!(f, "\"{name}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::{String, ToString as _};

    use super::Key;

    struct A;

    #[test]
    fn test_type_keys_compare_by_type_id() {
        assert_eq!(Key::of::<A>(), Key::of::<A>());
        assert_ne!(Key::of::<A>(), Key::of::<String>());
        assert_eq!(Key::of::<String>(), Key::of_default::<String>());
    }

    #[test]
    fn test_named_keys_compare_by_name() {
        assert_eq!(Key::named("db"), Key::named("db".to_string()));
        assert_ne!(Key::named("db"), Key::named("cache"));
        assert_ne!(Key::named("db"), Key::of::<A>());
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::of::<A>().to_string(), "A");
        assert_eq!(Key::named("db").to_string(), "\"db\"");
    }
}
