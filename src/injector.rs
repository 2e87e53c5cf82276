use alloc::{boxed::Box, collections::BTreeMap, sync::Arc};
use core::any::TypeId;
use parking_lot::RwLock;
use tracing::{debug, error, info_span};

use crate::{
    any::Instance,
    errors::ResolveErrorKind,
    key::Key,
    provider::{provide_fn, synthesize, BoxCloneProvider, Provider, Target},
    scope::Scope,
};

/// Binding table plus provider synthesis.
///
/// Binding happens in a configuration phase; afterwards the injector is
/// typically registered in the process-wide [`crate::InjectorRegistry`] and
/// only read. Concurrent reads are safe; a provider is cloned out of the
/// table and invoked outside the table lock.
pub struct Injector {
    bindings: RwLock<BTreeMap<Key, BoxCloneProvider>>,
    default_providers: bool,
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl Injector {
    /// Creates an injector that resolves bound keys only.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(BTreeMap::new()),
            default_providers: false,
        }
    }

    /// Creates an injector that additionally resolves unbound
    /// self-constructible keys by calling them directly.
    #[inline]
    #[must_use]
    pub fn with_default_providers() -> Self {
        Self {
            bindings: RwLock::new(BTreeMap::new()),
            default_providers: true,
        }
    }

    /// Registers a binding, overwriting any existing one for the key.
    ///
    /// The provider is synthesized and scope-wrapped here, once, so repeated
    /// resolutions reuse the same decision. Instance targets ignore the scope.
    /// Binding never fails: a malformed target surfaces when the provider is
    /// invoked.
    pub fn bind(&self, key: Key, target: Target, scope: Option<&dyn Scope>) {
        let (raw, scopeable) = synthesize(&key, target);
        let provider = match scope {
            Some(scope) if scopeable => {
                debug!(key = %key, scope = scope.name(), "Bound scoped provider");
                scope.wrap(raw)
            }
            _ => {
                debug!(key = %key, "Bound provider");
                raw
            }
        };

        self.bindings.write().insert(key, provider);
    }

    /// Applies a configurator, a callable grouping `bind` calls.
    ///
    /// Returns the injector, so configurators chain.
    #[must_use]
    pub fn configure(self, configurator: impl FnOnce(&Self)) -> Self {
        configurator(&self);
        self
    }

    /// Returns the provider bound for the key.
    ///
    /// When the key is unbound, the injector has default providers enabled
    /// and the key is self-constructible, an unscoped provider is synthesized
    /// on the fly without being stored.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::NoProvider`] when the key is unbound and
    /// no default-provider fallback applies.
    pub fn get_provider(&self, key: &Key) -> Result<Provider, ResolveErrorKind> {
        if let Some(provider) = self.bindings.read().get(key) {
            return Ok(Provider(provider.clone()));
        }

        if self.default_providers {
            if let Some(constructor) = key.constructor() {
                debug!(key = %key, "Synthesized default provider");
                return Ok(Provider(BoxCloneProvider(Box::new(provide_fn(constructor)))));
            }
        }

        let err = ResolveErrorKind::NoProvider { key: key.clone() };
        error!("{err}");
        Err(err)
    }

    /// Resolves an instance for the key.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoProvider`] as [`Self::get_provider`]
    /// - Returns [`ResolveErrorKind::Instantiate`] when the provider fails
    /// - Returns [`ResolveErrorKind::IncorrectType`] when the bound instance
    ///   is not a `T`, which can happen with alias keys
    pub fn get_instance<T>(&self, key: &Key) -> Result<Arc<T>, ResolveErrorKind>
    where
        T: Send + Sync + 'static,
    {
        let span = info_span!("get_instance", key = %key);
        let _guard = span.enter();

        self.provide_erased(key)?.downcast::<T>().map_err(|instance| {
            let err = ResolveErrorKind::IncorrectType {
                key: key.clone(),
                expected: TypeId::of::<T>(),
                actual: (*instance).type_id(),
            };
            error!("{err}");
            err
        })
    }

    pub(crate) fn provide_erased(&self, key: &Key) -> Result<Instance, ResolveErrorKind> {
        self.get_provider(key)?.provide().map_err(|err| {
            error!("{err}");
            ResolveErrorKind::Instantiate(err)
        })
    }
}
