use core::any::TypeId;

use super::instantiate::InstantiateErrorKind;
use crate::key::Key;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No injector registered")]
    NoInjectorRegistered,
    #[error("No provider bound for key `{key}`")]
    NoProvider { key: Key },
    #[error("Incorrect instance type for key `{key}`. Expected {expected:?}, actual {actual:?}")]
    IncorrectType { key: Key, expected: TypeId, actual: TypeId },
    #[error(transparent)]
    Instantiate(#[from] InstantiateErrorKind),
}

impl ResolveErrorKind {
    /// Whether the failure happened during lookup rather than construction.
    ///
    /// Only lookup failures are converted by the absent-value fallback;
    /// construction failures always propagate.
    #[inline]
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::NoInjectorRegistered | Self::NoProvider { .. })
    }
}
