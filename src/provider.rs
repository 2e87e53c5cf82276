use alloc::{boxed::Box, sync::Arc};

use crate::{any::Instance, errors::InstantiateErrorKind, key::Key};

/// Zero-argument construction strategy producing a type-erased instance.
pub(crate) trait Provide {
    fn provide(&mut self) -> Result<Instance, InstantiateErrorKind>;
}

pub(crate) trait CloneProvide: Provide {
    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneProvide + Send + Sync>;
}

impl<T> CloneProvide for T
where
    T: Provide + Clone + Send + Sync + 'static,
{
    #[inline]
    fn clone_box(&self) -> Box<dyn CloneProvide + Send + Sync> {
        Box::new(self.clone())
    }
}

pub(crate) struct BoxCloneProvider(pub(crate) Box<dyn CloneProvide + Send + Sync>);

impl Clone for BoxCloneProvider {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl Provide for BoxCloneProvider {
    #[inline]
    fn provide(&mut self) -> Result<Instance, InstantiateErrorKind> {
        self.0.provide()
    }
}

#[inline]
#[must_use]
pub(crate) const fn provide_fn<F>(f: F) -> ProvideFn<F> {
    ProvideFn { f }
}

#[derive(Clone)]
pub(crate) struct ProvideFn<F> {
    f: F,
}

impl<F> Provide for ProvideFn<F>
where
    F: FnMut() -> Result<Instance, InstantiateErrorKind>,
{
    #[inline]
    fn provide(&mut self) -> Result<Instance, InstantiateErrorKind> {
        (self.f)()
    }
}

/// Cloneable handle to a synthesized provider.
///
/// Clones share scope state, so a clone of an app-scoped provider observes
/// the same cached instance.
#[derive(Clone)]
pub struct Provider(pub(crate) BoxCloneProvider);

impl Provider {
    /// Invokes the provider, producing a type-erased instance.
    ///
    /// # Errors
    /// Propagates the construction failure of the underlying factory.
    #[inline]
    pub fn provide(&mut self) -> Result<Instance, InstantiateErrorKind> {
        self.0.provide()
    }
}

/// What a binding points at.
pub struct Target {
    kind: TargetKind,
}

enum TargetKind {
    Factory(BoxCloneProvider),
    Instance(Instance),
    Key,
}

impl Target {
    /// A callable target: the factory is invoked on each (unscoped) resolution.
    #[must_use]
    pub fn factory<T, F, E>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, E> + Clone + Send + Sync + 'static,
        E: Into<InstantiateErrorKind>,
    {
        Self {
            kind: TargetKind::Factory(BoxCloneProvider(Box::new(provide_fn(move || match f() {
                Ok(value) => Ok(Arc::new(value) as _),
                Err(err) => Err(err.into()),
            })))),
        }
    }

    /// A pre-built instance: every resolution returns exactly this value.
    #[must_use]
    pub fn instance<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            kind: TargetKind::Instance(Arc::new(value)),
        }
    }

    /// No target: the key itself is called, via the constructor it carries.
    #[inline]
    #[must_use]
    pub const fn key() -> Self {
        Self { kind: TargetKind::Key }
    }
}

/// Builds a raw provider from a bind target, per the synthesis rules.
///
/// The second value reports whether the provider may be scope-wrapped:
/// an instance has no lifecycle to scope, so instance providers never are.
/// A key target without a constructor still binds; the provider fails at
/// invocation time instead.
pub(crate) fn synthesize(key: &Key, target: Target) -> (BoxCloneProvider, bool) {
    match target.kind {
        TargetKind::Factory(raw) => (raw, true),
        TargetKind::Instance(value) => (BoxCloneProvider(Box::new(provide_fn(move || Ok(value.clone())))), false),
        TargetKind::Key => match key.constructor() {
            Some(constructor) => (BoxCloneProvider(Box::new(provide_fn(constructor))), true),
            None => {
                let key = key.clone();
                (
                    BoxCloneProvider(Box::new(provide_fn(move || {
                        Err(InstantiateErrorKind::KeyNotConstructible { key: key.clone() })
                    }))),
                    true,
                )
            }
        },
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{synthesize, Provide as _, Target};
    use crate::{errors::InstantiateErrorKind, key::Key};

    use alloc::sync::Arc;

    #[derive(Default)]
    struct A;
    struct B;

    #[test]
    fn test_factory_target_produces_fresh_instances() {
        let (mut provider, scopeable) = synthesize(&Key::of::<A>(), Target::factory(|| Ok::<_, InstantiateErrorKind>(B)));
        assert!(scopeable);

        let first = provider.provide().unwrap().downcast::<B>().unwrap();
        let second = provider.provide().unwrap().downcast::<B>().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_instance_target_preserves_identity() {
        let (mut provider, scopeable) = synthesize(&Key::of::<A>(), Target::instance(B));
        assert!(!scopeable);

        let first = provider.provide().unwrap().downcast::<B>().unwrap();
        let second = provider.provide().unwrap().downcast::<B>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_key_target_calls_constructor() {
        let (mut provider, _) = synthesize(&Key::of_default::<A>(), Target::key());
        provider.provide().unwrap().downcast::<A>().unwrap();
    }

    #[test]
    fn test_key_target_without_constructor_fails_lazily() {
        let (mut provider, _) = synthesize(&Key::of::<B>(), Target::key());
        assert!(matches!(
            provider.provide(),
            Err(InstantiateErrorKind::KeyNotConstructible { .. })
        ));
    }
}
