// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{InjectionCause, Link, Namespace, NamingError, Value};

/// A deferred supplier of one value.
///
/// A retriever is consulted every time an [`Injector`][crate::Injector] is applied, so a
/// retriever performing a lookup yields a fresh value for every target.
pub trait ValueRetriever<V>: fmt::Debug + Send + Sync {
    /// Produces the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be obtained.
    fn retrieve(&self) -> Result<V, InjectionCause>;
}

/// Returns a clone of a fixed value.
#[derive(Debug, Clone)]
pub struct ConstantRetriever<V> {
    value: V,
}

impl<V> ConstantRetriever<V> {
    /// Creates a retriever that always yields `value`.
    pub fn new(value: V) -> Self {
        Self { value }
    }
}

impl<V> ValueRetriever<V> for ConstantRetriever<V>
where
    V: Clone + fmt::Debug + Send + Sync,
{
    fn retrieve(&self) -> Result<V, InjectionCause> {
        Ok(self.value.clone())
    }
}

/// Yields a [`Link`] to another namespace entry instead of the entry itself.
///
/// Binding the link lets the namespace redirect lookups to the target, which may be bound only
/// later in the deployment sequence.
#[derive(Debug, Clone)]
pub struct LinkRetriever {
    link: Link,
}

impl LinkRetriever {
    /// Creates a retriever yielding a link to `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self { link: Link::new(target) }
    }

    /// The name the produced link points at.
    #[must_use]
    pub fn target(&self) -> &str {
        self.link.target()
    }
}

impl From<Link> for LinkRetriever {
    fn from(link: Link) -> Self {
        Self { link }
    }
}

impl ValueRetriever<Link> for LinkRetriever {
    fn retrieve(&self) -> Result<Link, InjectionCause> {
        Ok(self.link.clone())
    }
}

/// Looks a name up in a namespace on every call.
///
/// The namespace handle is explicit; there is no ambient default namespace.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use switchboard_inject::{Entry, InMemoryNamespace, LookupRetriever, Namespace, Value, ValueRetriever};
///
/// let namespace = Arc::new(InMemoryNamespace::new());
/// let retriever = LookupRetriever::new(Arc::clone(&namespace), "env/count");
/// assert!(retriever.retrieve().is_err());
///
/// namespace.bind("env/count", Entry::Value(Value::new(3_u32)))?;
/// assert_eq!(retriever.retrieve()?.downcast_ref::<u32>(), Some(&3));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LookupRetriever<N> {
    namespace: N,
    name: String,
}

impl<N> LookupRetriever<N> {
    /// Creates a retriever looking `name` up in `namespace`.
    pub fn new(namespace: N, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }

    /// The name that is looked up.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<N> fmt::Debug for LookupRetriever<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupRetriever").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<N: Namespace> ValueRetriever<Value> for LookupRetriever<N> {
    fn retrieve(&self) -> Result<Value, InjectionCause> {
        self.namespace
            .lookup(&self.name)
            .map_err(|error| InjectionCause::lookup_failed(&self.name, error))
    }
}

/// Looks a name up in a namespace on every call, yielding `None` while the name is not bound.
///
/// Only a missing entry under the looked-up name itself is tolerated. A link bound under the name
/// whose target is missing still fails, as does any other naming error.
pub struct OptionalLookupRetriever<N> {
    lookup: LookupRetriever<N>,
}

impl<N> OptionalLookupRetriever<N> {
    /// Creates a retriever looking `name` up in `namespace`.
    pub fn new(namespace: N, name: impl Into<String>) -> Self {
        Self {
            lookup: LookupRetriever::new(namespace, name),
        }
    }

    /// The name that is looked up.
    #[must_use]
    pub fn name(&self) -> &str {
        self.lookup.name()
    }
}

impl<N> fmt::Debug for OptionalLookupRetriever<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalLookupRetriever")
            .field("name", &self.lookup.name)
            .finish_non_exhaustive()
    }
}

impl<N: Namespace> ValueRetriever<Option<Value>> for OptionalLookupRetriever<N> {
    fn retrieve(&self) -> Result<Option<Value>, InjectionCause> {
        match self.lookup.namespace.lookup(&self.lookup.name) {
            Ok(value) => Ok(Some(value)),
            Err(NamingError::NotFound(missing)) if missing == self.lookup.name => Ok(None),
            Err(error) => Err(InjectionCause::lookup_failed(&self.lookup.name, error)),
        }
    }
}
