#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod errors;
pub(crate) mod injection;
pub(crate) mod injector;
pub(crate) mod key;
pub(crate) mod param;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod scope;

pub use any::{Instance, TypeInfo};
pub use errors::{InstantiateErrorKind, NoParamError, ResolveErrorKind};
pub use injection::{AttrInjection, InjectionPoint};
pub use injector::Injector;
pub use key::Key;
pub use param::ParamInjections;
pub use provider::{Provider, Target};
pub use registry::{get_instance, global, is_registered, register, try_get_instance, unregister, unregister_if, InjectorRegistry};
pub use scope::{AppScope, NoScope, Scope};
