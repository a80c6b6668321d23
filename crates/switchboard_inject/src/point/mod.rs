// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Assignment locations.

mod binding;
mod field;
mod method;
mod optional;

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

pub use binding::BindingInjectionPoint;
pub use field::FieldInjectionPoint;
pub use method::MethodInjectionPoint;
pub use optional::OptionalInjectionPoint;

use crate::{InjectionCause, Value};

/// Assigns a value of type `V` into a target of type `T`.
///
/// An injection point only identifies a location. It holds no per-target state and can be shared
/// by any number of [`Injector`][crate::Injector]s and applied to any number of targets.
///
/// The [`Display`][fmt::Display] output describes the location and is used in error reports.
pub trait InjectionPoint<T: ?Sized, V>: fmt::Display + Send + Sync {
    /// Assigns `value` into `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target rejects the value.
    fn set(&self, target: &mut T, value: V) -> Result<(), InjectionCause>;
}

impl<T: ?Sized, V, P> InjectionPoint<T, V> for Arc<P>
where
    P: InjectionPoint<T, V> + ?Sized,
{
    fn set(&self, target: &mut T, value: V) -> Result<(), InjectionCause> {
        (**self).set(target, value)
    }
}

/// Marker for member injection points accepting values of the member's own type.
///
/// The value type is checked by the compiler when the [`Injector`][crate::Injector] is built.
#[derive(Debug)]
pub struct Typed;

/// Marker for member injection points accepting type-erased [`Value`]s.
///
/// The value type is checked at assignment time and a mismatch is reported as
/// [`InjectionCause::IncompatibleValue`].
#[derive(Debug)]
pub struct Erased;

fn downcast<F>(point: &dyn fmt::Display, value: &Value) -> Result<F, InjectionCause>
where
    F: Any + Clone,
{
    value
        .downcast_ref::<F>()
        .cloned()
        .ok_or_else(|| InjectionCause::incompatible(point, type_name::<F>(), value.type_name()))
}

/// The unqualified name of `T`, used to describe members in messages.
fn owner_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let generic_start = full.find('<').unwrap_or(full.len());
    full[..generic_start].rsplit("::").next().unwrap_or(full)
}
