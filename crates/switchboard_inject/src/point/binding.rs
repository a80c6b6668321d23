// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use super::InjectionPoint;
use crate::{Entry, Error, InjectionCause, Namespace};

/// Binds a value into a [`Namespace`] under a fixed name.
///
/// Any value convertible into an [`Entry`] is accepted, which covers plain [`Value`][crate::Value]s,
/// [`Link`][crate::Link]s and [`Constant`][crate::Constant]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInjectionPoint {
    name: String,
}

impl BindingInjectionPoint {
    /// Creates an injection point binding under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInjectionTarget`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_target("binding ``", "the binding name is empty"));
        }

        Ok(Self { name })
    }

    /// The name entries are bound under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BindingInjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding `{}`", self.name)
    }
}

impl<N, V> InjectionPoint<N, V> for BindingInjectionPoint
where
    N: Namespace + ?Sized,
    V: Into<Entry>,
{
    fn set(&self, target: &mut N, value: V) -> Result<(), InjectionCause> {
        target
            .bind(&self.name, value.into())
            .map_err(|source| InjectionCause::BindingFailed {
                name: self.name.clone(),
                source,
            })
    }
}
