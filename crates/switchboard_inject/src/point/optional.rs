// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use super::InjectionPoint;
use crate::InjectionCause;

/// Assigns a value through another point only when one is present.
///
/// Pairs with [`OptionalLookupRetriever`][crate::OptionalLookupRetriever]: when the looked-up name
/// is not bound the target is left untouched.
///
/// # Examples
///
/// ```
/// use switchboard_inject::{FieldInjectionPoint, InjectionPoint, OptionalInjectionPoint};
///
/// struct Bean {
///     retries: u32,
/// }
///
/// let point = OptionalInjectionPoint::new(FieldInjectionPoint::new("retries", |bean: &mut Bean| &mut bean.retries));
/// let mut bean = Bean { retries: 3 };
///
/// point.set(&mut bean, None)?;
/// assert_eq!(bean.retries, 3);
///
/// point.set(&mut bean, Some(5))?;
/// assert_eq!(bean.retries, 5);
/// # Ok::<(), switchboard_inject::InjectionCause>(())
/// ```
#[derive(Debug, Clone)]
pub struct OptionalInjectionPoint<P> {
    inner: P,
}

impl<P> OptionalInjectionPoint<P> {
    /// Wraps `inner`.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// The wrapped point.
    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: fmt::Display> fmt::Display for OptionalInjectionPoint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "optional {}", self.inner)
    }
}

impl<T, V, P> InjectionPoint<T, Option<V>> for OptionalInjectionPoint<P>
where
    T: ?Sized,
    P: InjectionPoint<T, V>,
{
    fn set(&self, target: &mut T, value: Option<V>) -> Result<(), InjectionCause> {
        match value {
            Some(value) => self.inner.set(target, value),
            None => Ok(()),
        }
    }
}
