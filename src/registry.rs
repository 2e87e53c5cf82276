use alloc::sync::Arc;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{any::Instance, errors::ResolveErrorKind, injector::Injector, key::Key};

/// Process-wide slot holding at most one active injector.
///
/// Injection points resolve through whichever injector is active at access
/// time, never through a captured reference. That indirection is the point:
/// injection sites are declared at definition time, while the composition
/// root constructs and registers the injector later.
///
/// Registering replaces any previous occupant, mirroring the binding table's
/// last-write-wins rule.
pub struct InjectorRegistry {
    slot: Mutex<Option<Arc<Injector>>>,
}

impl Default for InjectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectorRegistry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// Makes the injector active, replacing any previous one.
    pub fn register(&self, injector: Arc<Injector>) {
        if self.slot.lock().replace(injector).is_some() {
            debug!("Replaced previously registered injector");
        } else {
            debug!("Registered injector");
        }
    }

    /// Unconditionally clears the slot.
    pub fn unregister(&self) {
        self.slot.lock().take();
        debug!("Unregistered injector");
    }

    /// Clears the slot only if it holds exactly this injector.
    ///
    /// A stale unregister racing a newer register is a no-op; returns whether
    /// the slot was cleared.
    pub fn unregister_if(&self, injector: &Arc<Injector>) -> bool {
        let mut guard = self.slot.lock();
        match guard.as_ref() {
            Some(active) if Arc::ptr_eq(active, injector) => {
                *guard = None;
                debug!("Unregistered injector");
                true
            }
            _ => false,
        }
    }

    /// Whether the slot currently holds exactly this injector.
    #[must_use]
    pub fn is_registered(&self, injector: &Arc<Injector>) -> bool {
        self.slot.lock().as_ref().is_some_and(|active| Arc::ptr_eq(active, injector))
    }

    /// Returns the active injector, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Injector>> {
        self.slot.lock().clone()
    }

    /// Resolves an instance for the key through the active injector.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::NoInjectorRegistered`] when the slot is
    /// empty; otherwise delegates to [`Injector::get_instance`].
    pub fn get_instance<T>(&self, key: &Key) -> Result<Arc<T>, ResolveErrorKind>
    where
        T: Send + Sync + 'static,
    {
        self.active()?.get_instance(key)
    }

    /// Absent-value variant of [`Self::get_instance`]: lookup failures become
    /// `Ok(None)`, construction failures still propagate.
    pub fn try_get_instance<T>(&self, key: &Key) -> Result<Option<Arc<T>>, ResolveErrorKind>
    where
        T: Send + Sync + 'static,
    {
        match self.get_instance(key) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) if err.is_lookup() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn get_erased(&self, key: &Key) -> Result<Instance, ResolveErrorKind> {
        self.active()?.provide_erased(key)
    }

    fn active(&self) -> Result<Arc<Injector>, ResolveErrorKind> {
        self.current().ok_or_else(|| {
            let err = ResolveErrorKind::NoInjectorRegistered;
            error!("{err}");
            err
        })
    }
}

static GLOBAL: InjectorRegistry = InjectorRegistry::new();

/// Returns the process-wide registry backing the free functions and all
/// injection points.
#[inline]
#[must_use]
pub fn global() -> &'static InjectorRegistry {
    &GLOBAL
}

/// See [`InjectorRegistry::register`].
pub fn register(injector: Arc<Injector>) {
    GLOBAL.register(injector);
}

/// See [`InjectorRegistry::unregister`].
pub fn unregister() {
    GLOBAL.unregister();
}

/// See [`InjectorRegistry::unregister_if`].
pub fn unregister_if(injector: &Arc<Injector>) -> bool {
    GLOBAL.unregister_if(injector)
}

/// See [`InjectorRegistry::is_registered`].
#[must_use]
pub fn is_registered(injector: &Arc<Injector>) -> bool {
    GLOBAL.is_registered(injector)
}

/// See [`InjectorRegistry::get_instance`].
#[allow(clippy::missing_errors_doc)]
pub fn get_instance<T>(key: &Key) -> Result<Arc<T>, ResolveErrorKind>
where
    T: Send + Sync + 'static,
{
    GLOBAL.get_instance(key)
}

/// See [`InjectorRegistry::try_get_instance`].
#[allow(clippy::missing_errors_doc)]
pub fn try_get_instance<T>(key: &Key) -> Result<Option<Arc<T>>, ResolveErrorKind>
where
    T: Send + Sync + 'static,
{
    GLOBAL.try_get_instance(key)
}
