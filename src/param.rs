use alloc::collections::BTreeMap;

use crate::{
    any::Instance,
    errors::{NoParamError, ResolveErrorKind},
    injection::InjectionPoint,
    registry::{self, InjectorRegistry},
};

/// Explicit parameter-injection table for a function wrapper.
///
/// The accepted parameter names are declared up front and every injected name
/// is validated against them when the table is built, so a typo fails fast at
/// configuration time instead of silently never injecting.
#[derive(Debug)]
pub struct ParamInjections {
    accepted: &'static [&'static str],
    injections: BTreeMap<&'static str, InjectionPoint>,
}

impl ParamInjections {
    /// Creates a table for a function accepting exactly these parameters.
    #[inline]
    #[must_use]
    pub const fn new(accepted: &'static [&'static str]) -> Self {
        Self {
            accepted,
            injections: BTreeMap::new(),
        }
    }

    /// Adds an injection for a parameter.
    ///
    /// # Errors
    /// Returns [`NoParamError`] when the function does not declare `name`.
    pub fn inject(mut self, name: &'static str, point: InjectionPoint) -> Result<Self, NoParamError> {
        if !self.accepted.contains(&name) {
            return Err(NoParamError { name });
        }

        self.injections.insert(name, point);
        Ok(self)
    }

    /// Resolves every injected parameter the caller did not supply.
    ///
    /// Absent-value points contribute `None`; strict points fail the whole
    /// call on a lookup failure.
    #[allow(clippy::missing_errors_doc)]
    pub fn resolve_missing(&self, given: &[&str]) -> Result<BTreeMap<&'static str, Option<Instance>>, ResolveErrorKind> {
        self.resolve_missing_in(registry::global(), given)
    }

    /// [`Self::resolve_missing`] against a specific registry.
    #[allow(clippy::missing_errors_doc)]
    pub fn resolve_missing_in(
        &self,
        registry: &InjectorRegistry,
        given: &[&str],
    ) -> Result<BTreeMap<&'static str, Option<Instance>>, ResolveErrorKind> {
        let mut resolved = BTreeMap::new();
        for (name, point) in &self.injections {
            if given.contains(name) {
                continue;
            }
            resolved.insert(*name, point.get_instance_in(registry)?);
        }
        Ok(resolved)
    }
}
