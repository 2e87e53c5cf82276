use crate::key::Key;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Key `{key}` has no bound target and is not self-constructible")]
    KeyNotConstructible { key: Key },
    #[error(transparent)]
    Factory(#[from] anyhow::Error),
}
