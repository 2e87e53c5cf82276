#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Function does not accept an injected param `{name}`")]
pub struct NoParamError {
    pub name: &'static str,
}
