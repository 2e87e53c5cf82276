use alloc::{boxed::Box, sync::Arc};
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    any::Instance,
    errors::InstantiateErrorKind,
    provider::{BoxCloneProvider, Provide},
};

/// Lifetime policy controlling whether a provider's result is cached.
///
/// A scope is applied exactly once, at bind time, so every resolution of the
/// binding goes through the same wrapping decision.
pub trait Scope: Send + Sync {
    #[must_use]
    fn name(&self) -> &'static str;

    #[must_use]
    fn wrap(&self, raw: BoxCloneProvider) -> BoxCloneProvider;
}

/// Calls the raw provider on every resolution.
pub struct NoScope;

impl Scope for NoScope {
    #[inline]
    fn name(&self) -> &'static str {
        "none"
    }

    #[inline]
    fn wrap(&self, raw: BoxCloneProvider) -> BoxCloneProvider {
        raw
    }
}

/// Calls the raw provider once and reuses the result for the process lifetime.
pub struct AppScope;

impl Scope for AppScope {
    #[inline]
    fn name(&self) -> &'static str {
        "app"
    }

    fn wrap(&self, raw: BoxCloneProvider) -> BoxCloneProvider {
        BoxCloneProvider(Box::new(CachedProvider {
            raw,
            cell: Arc::new(Mutex::new(None)),
        }))
    }
}

#[derive(Clone)]
struct CachedProvider {
    raw: BoxCloneProvider,
    // Shared across provider clones so every caller observes one instance.
    cell: Arc<Mutex<Option<Instance>>>,
}

impl Provide for CachedProvider {
    fn provide(&mut self) -> Result<Instance, InstantiateErrorKind> {
        let mut guard = self.cell.lock();
        if let Some(instance) = guard.as_ref() {
            debug!("Found in app scope cache");
            return Ok(instance.clone());
        }

        // The lock is held across the call: concurrent first users wait here
        // and then hit the cache above. A failed call leaves the cell empty,
        // so the next resolution retries construction.
        let instance = self.raw.provide()?;
        *guard = Some(instance.clone());

        debug!("Cached in app scope");
        Ok(instance)
    }
}
