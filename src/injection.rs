use alloc::sync::Arc;
use parking_lot::Mutex;

use crate::{
    any::Instance,
    errors::ResolveErrorKind,
    key::Key,
    registry::{self, InjectorRegistry},
};

/// The resolution contract every injection-point flavor delegates to.
///
/// An injection point is an immutable `(key, allow_absent)` pair, created
/// once per declared injection site. It holds no injector reference:
/// resolution is re-executed on every access against whichever injector is
/// registered at that moment, so points declared before the composition root
/// runs start working as soon as an injector is registered.
#[derive(Debug)]
pub struct InjectionPoint {
    key: Key,
    allow_absent: bool,
}

impl InjectionPoint {
    /// Creates a point that fails resolution when the lookup fails.
    #[inline]
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self { key, allow_absent: false }
    }

    /// Creates a point that resolves to an absent value when the lookup
    /// fails, instead of failing.
    #[inline]
    #[must_use]
    pub const fn allow_absent(key: Key) -> Self {
        Self { key, allow_absent: true }
    }

    #[inline]
    #[must_use]
    pub const fn key(&self) -> &Key {
        &self.key
    }

    /// Resolves a type-erased instance through the process-wide registry.
    ///
    /// `Ok(None)` is only reachable for points created with
    /// [`Self::allow_absent`].
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoInjectorRegistered`] and
    ///   [`ResolveErrorKind::NoProvider`] for lookup failures, unless absent
    ///   values are allowed
    /// - Propagates construction failures unconditionally
    pub fn get_instance(&self) -> Result<Option<Instance>, ResolveErrorKind> {
        self.get_instance_in(registry::global())
    }

    /// [`Self::get_instance`] against a specific registry.
    #[allow(clippy::missing_errors_doc)]
    pub fn get_instance_in(&self, registry: &InjectorRegistry) -> Result<Option<Instance>, ResolveErrorKind> {
        match registry.get_erased(&self.key) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) if self.allow_absent && err.is_lookup() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Typed variant of [`Self::get_instance`].
    #[allow(clippy::missing_errors_doc)]
    pub fn resolve<T>(&self) -> Result<Option<Arc<T>>, ResolveErrorKind>
    where
        T: Send + Sync + 'static,
    {
        self.resolve_in(registry::global())
    }

    /// [`Self::resolve`] against a specific registry.
    #[allow(clippy::missing_errors_doc)]
    pub fn resolve_in<T>(&self, registry: &InjectorRegistry) -> Result<Option<Arc<T>>, ResolveErrorKind>
    where
        T: Send + Sync + 'static,
    {
        match registry.get_instance::<T>(&self.key) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) if self.allow_absent && err.is_lookup() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Attribute-style accessor: a typed injection point that memoizes the first
/// resolved instance, so later accesses skip the registry entirely.
///
/// Built with [`Self::reinjecting`] it re-resolves on every access instead,
/// which also covers the class-attribute flavor.
pub struct AttrInjection<T> {
    point: InjectionPoint,
    reinject: bool,
    resolved: Mutex<Option<Arc<T>>>,
}

impl<T> Default for AttrInjection<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AttrInjection<T>
where
    T: Send + Sync + 'static,
{
    /// Creates an accessor for the type key of `T`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(Key::of::<T>())
    }

    /// Creates an accessor resolving an explicit key, e.g. an alias.
    #[inline]
    #[must_use]
    pub fn with_key(key: Key) -> Self {
        Self {
            point: InjectionPoint::new(key),
            reinject: false,
            resolved: Mutex::new(None),
        }
    }

    /// Re-resolve on every access instead of memoizing the first instance.
    #[inline]
    #[must_use]
    pub fn reinjecting(mut self) -> Self {
        self.reinject = true;
        self
    }

    /// Resolves the attribute value.
    #[allow(clippy::missing_errors_doc)]
    pub fn get(&self) -> Result<Arc<T>, ResolveErrorKind> {
        self.get_in(registry::global())
    }

    /// [`Self::get`] against a specific registry.
    #[allow(clippy::missing_errors_doc)]
    pub fn get_in(&self, registry: &InjectorRegistry) -> Result<Arc<T>, ResolveErrorKind> {
        if !self.reinject {
            if let Some(instance) = self.resolved.lock().as_ref() {
                return Ok(instance.clone());
            }
        }

        match self.point.resolve_in::<T>(registry)? {
            Some(instance) => {
                if !self.reinject {
                    *self.resolved.lock() = Some(instance.clone());
                }
                Ok(instance)
            }
            // The point is built without allow_absent, so lookup failures
            // surface as errors above; this arm is unreachable in practice.
            None => Err(ResolveErrorKind::NoProvider {
                key: self.point.key().clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{AttrInjection, InjectionPoint};
    use crate::{
        errors::{InstantiateErrorKind, ResolveErrorKind},
        injector::Injector,
        key::Key,
        provider::Target,
        registry::InjectorRegistry,
    };

    use alloc::{
        format,
        string::{String, ToString as _},
        sync::Arc,
    };
    use tracing_test::traced_test;

    struct A;

    fn registry_with_binding() -> InjectorRegistry {
        let registry = InjectorRegistry::new();
        let injector = Injector::new();
        injector.bind(Key::of::<A>(), Target::factory(|| Ok::<_, InstantiateErrorKind>(A)), None);
        registry.register(Arc::new(injector));
        registry
    }

    #[test]
    #[traced_test]
    fn test_point_resolves_through_registry() {
        let registry = registry_with_binding();
        let point = InjectionPoint::new(Key::of::<A>());

        let instance = point.resolve_in::<A>(&registry).unwrap();
        assert!(instance.is_some());
    }

    #[test]
    fn test_point_fails_without_injector() {
        let registry = InjectorRegistry::new();
        let point = InjectionPoint::new(Key::of::<A>());

        assert!(matches!(
            point.resolve_in::<A>(&registry),
            Err(ResolveErrorKind::NoInjectorRegistered)
        ));
    }

    #[test]
    fn test_allow_absent_point_returns_none_on_lookup_failure() {
        let registry = InjectorRegistry::new();
        let point = InjectionPoint::allow_absent(Key::of::<A>());

        assert!(point.resolve_in::<A>(&registry).unwrap().is_none());
        assert!(point.get_instance_in(&registry).unwrap().is_none());

        // Registered injector, unbound key: still a lookup failure.
        registry.register(Arc::new(Injector::new()));
        assert!(point.resolve_in::<A>(&registry).unwrap().is_none());
    }

    #[test]
    fn test_allow_absent_point_propagates_construction_failure() {
        let registry = InjectorRegistry::new();
        let injector = Injector::new();
        injector.bind(
            Key::of::<A>(),
            Target::factory(|| Err::<A, _>(InstantiateErrorKind::Factory(anyhow::anyhow!("boom")))),
            None,
        );
        registry.register(Arc::new(injector));

        let point = InjectionPoint::allow_absent(Key::of::<A>());
        assert!(point.resolve_in::<A>(&registry).is_err());
    }

    #[test]
    fn test_attr_memoizes_first_instance() {
        let registry = registry_with_binding();
        let attr = AttrInjection::<A>::new();

        let first = attr.get_in(&registry).unwrap();
        let second = attr.get_in(&registry).unwrap();
        // The binding is unscoped, so the identity comes from the attr cache.
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_reinjecting_attr_resolves_every_access() {
        let registry = registry_with_binding();
        let attr = AttrInjection::<A>::new().reinjecting();

        let first = attr.get_in(&registry).unwrap();
        let second = attr.get_in(&registry).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_attr_declared_before_registration() {
        let registry = InjectorRegistry::new();
        let attr = AttrInjection::<A>::new();

        assert!(attr.get_in(&registry).is_err());

        let injector = Injector::new();
        injector.bind(Key::of::<A>(), Target::factory(|| Ok::<_, InstantiateErrorKind>(A)), None);
        registry.register(Arc::new(injector));

        assert!(attr.get_in(&registry).is_ok());
    }
}
