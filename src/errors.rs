mod inject;
mod instantiate;
mod resolve;

pub use inject::NoParamError;
pub use instantiate::InstantiateErrorKind;
pub use resolve::ResolveErrorKind;
