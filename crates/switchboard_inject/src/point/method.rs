// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use super::{Erased, InjectionPoint, Typed, downcast, owner_name};
use crate::{Error, InjectionCause, Value, naming};

/// Assigns through a single-argument mutator of `T`.
///
/// The mutator shape (one parameter, no return value) is enforced by the setter's function type.
/// The name is validated when the point is created: it must be `set` followed by either `_` or an
/// uppercase letter and at least one more character, such as `set_name` or `setName`.
///
/// # Examples
///
/// ```
/// use switchboard_inject::{ConstantRetriever, Injector, MethodInjectionPoint};
///
/// #[derive(Default)]
/// struct Bean {
///     retries: u32,
/// }
///
/// impl Bean {
///     fn set_retries(&mut self, retries: u32) {
///         self.retries = retries;
///     }
/// }
///
/// let point = MethodInjectionPoint::new("set_retries", Bean::set_retries)?;
/// let injector = Injector::new(point, ConstantRetriever::new(3_u32));
///
/// let mut bean = Bean::default();
/// injector.apply(&mut bean)?;
/// assert_eq!(bean.retries, 3);
///
/// assert!(MethodInjectionPoint::new("retries", Bean::set_retries).is_err());
/// # Ok::<(), switchboard_inject::Error>(())
/// ```
pub struct MethodInjectionPoint<T, A, S = Typed> {
    method: Cow<'static, str>,
    setter: fn(&mut T, A),
    _state: PhantomData<fn() -> S>,
}

impl<T, A> MethodInjectionPoint<T, A, Typed> {
    /// Creates an injection point calling `setter`, known as `method`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInjectionTarget`] if `method` is not a mutator-style name.
    pub fn new(method: impl Into<Cow<'static, str>>, setter: fn(&mut T, A)) -> Result<Self, Error> {
        let method = method.into();
        if naming::setter_property(&method).is_none() {
            return Err(Error::invalid_target(
                format_args!("method `{}::{method}`", owner_name::<T>()),
                "a setter name must start with `set_` or `set` followed by an uppercase letter",
            ));
        }

        Ok(Self {
            method,
            setter,
            _state: PhantomData,
        })
    }

    /// Converts this point into one accepting type-erased values.
    #[must_use]
    pub fn erased(self) -> MethodInjectionPoint<T, A, Erased> {
        MethodInjectionPoint {
            method: self.method,
            setter: self.setter,
            _state: PhantomData,
        }
    }
}

impl<T, A, S> MethodInjectionPoint<T, A, S> {
    /// The name of the setter.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl<T, A, S> fmt::Display for MethodInjectionPoint<T, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method `{}::{}`", owner_name::<T>(), self.method)
    }
}

impl<T, A, S> fmt::Debug for MethodInjectionPoint<T, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInjectionPoint")
            .field("owner", &owner_name::<T>())
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl<T, A> InjectionPoint<T, A> for MethodInjectionPoint<T, A, Typed> {
    fn set(&self, target: &mut T, value: A) -> Result<(), InjectionCause> {
        (self.setter)(target, value);
        Ok(())
    }
}

impl<T, A> InjectionPoint<T, Value> for MethodInjectionPoint<T, A, Erased>
where
    A: Any + Clone,
{
    fn set(&self, target: &mut T, value: Value) -> Result<(), InjectionCause> {
        let argument = downcast(self, &value)?;
        (self.setter)(target, argument);
        Ok(())
    }
}
