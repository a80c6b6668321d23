// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use super::{Erased, InjectionPoint, Typed, downcast, owner_name};
use crate::{InjectionCause, Value};

/// Assigns directly into a field of `T` of type `F`.
///
/// The field is reached through an accessor function, typically a non-capturing closure such as
/// `|bean| &mut bean.name`.
///
/// # Examples
///
/// ```
/// use switchboard_inject::{ConstantRetriever, FieldInjectionPoint, Injector};
///
/// #[derive(Default)]
/// struct Bean {
///     name: String,
/// }
///
/// let point = FieldInjectionPoint::new("name", |bean: &mut Bean| &mut bean.name);
/// let injector = Injector::new(point, ConstantRetriever::new(String::from("injected")));
///
/// let mut bean = Bean::default();
/// injector.apply(&mut bean)?;
/// assert_eq!(bean.name, "injected");
/// # Ok::<(), switchboard_inject::Error>(())
/// ```
pub struct FieldInjectionPoint<T, F, S = Typed> {
    field: Cow<'static, str>,
    accessor: fn(&mut T) -> &mut F,
    _state: PhantomData<fn() -> S>,
}

impl<T, F> FieldInjectionPoint<T, F, Typed> {
    /// Creates an injection point for the field named `field`.
    pub fn new(field: impl Into<Cow<'static, str>>, accessor: fn(&mut T) -> &mut F) -> Self {
        Self {
            field: field.into(),
            accessor,
            _state: PhantomData,
        }
    }

    /// Converts this point into one accepting type-erased values.
    #[must_use]
    pub fn erased(self) -> FieldInjectionPoint<T, F, Erased> {
        FieldInjectionPoint {
            field: self.field,
            accessor: self.accessor,
            _state: PhantomData,
        }
    }
}

impl<T, F, S> FieldInjectionPoint<T, F, S> {
    /// The name of the field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl<T, F, S> fmt::Display for FieldInjectionPoint<T, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field `{}::{}`", owner_name::<T>(), self.field)
    }
}

impl<T, F, S> fmt::Debug for FieldInjectionPoint<T, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInjectionPoint")
            .field("owner", &owner_name::<T>())
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl<T, F> InjectionPoint<T, F> for FieldInjectionPoint<T, F, Typed> {
    fn set(&self, target: &mut T, value: F) -> Result<(), InjectionCause> {
        *(self.accessor)(target) = value;
        Ok(())
    }
}

impl<T, F> InjectionPoint<T, Value> for FieldInjectionPoint<T, F, Erased>
where
    F: Any + Clone,
{
    fn set(&self, target: &mut T, value: Value) -> Result<(), InjectionCause> {
        *(self.accessor)(target) = downcast(self, &value)?;
        Ok(())
    }
}
