// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use switchboard_inject::{Constant, Entry, Link};

/// The value a reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolvedValue {
    /// A link to another namespace entry, resolved by the namespace on lookup.
    Link(Link),
    /// A literal constant.
    Constant(Constant),
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(link) => link.fmt(f),
            Self::Constant(constant) => constant.fmt(f),
        }
    }
}

impl From<Link> for ResolvedValue {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<Constant> for ResolvedValue {
    fn from(constant: Constant) -> Self {
        Self::Constant(constant)
    }
}

impl From<ResolvedValue> for Entry {
    fn from(value: ResolvedValue) -> Self {
        match value {
            ResolvedValue::Link(link) => Self::Link(link),
            ResolvedValue::Constant(constant) => constant.into(),
        }
    }
}

/// The outcome of resolving one declaration.
///
/// Two results are equal only if the reference name, the value and the dependency are all equal.
///
/// # Examples
///
/// ```
/// use switchboard_resolve::ResolverResult;
///
/// let result = ResolverResult::link("env/test", "global:testBean").with_dependency("testBean");
/// assert_eq!(result.ref_name(), "env/test");
/// assert_eq!(result.dependency(), Some("testBean"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverResult {
    ref_name: String,
    value: ResolvedValue,
    dependency: Option<String>,
}

impl ResolverResult {
    /// Creates a result binding `value` under `ref_name`, without a dependency.
    pub fn new(ref_name: impl Into<String>, value: impl Into<ResolvedValue>) -> Self {
        Self {
            ref_name: ref_name.into(),
            value: value.into(),
            dependency: None,
        }
    }

    /// Creates a result binding a link to `target` under `ref_name`.
    pub fn link(ref_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(ref_name, Link::new(target))
    }

    /// Creates a result binding `constant` under `ref_name`.
    pub fn constant(ref_name: impl Into<String>, constant: Constant) -> Self {
        Self::new(ref_name, constant)
    }

    /// Records the identifier of a prerequisite that must be available before the value is used.
    #[must_use]
    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    /// The name the value is bound under.
    #[must_use]
    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }

    /// The resolved value.
    #[must_use]
    pub fn value(&self) -> &ResolvedValue {
        &self.value
    }

    /// The identifier of the prerequisite, if any.
    #[must_use]
    pub fn dependency(&self) -> Option<&str> {
        self.dependency.as_deref()
    }

    /// Splits the result into its reference name, value and dependency.
    #[must_use]
    pub fn into_parts(self) -> (String, ResolvedValue, Option<String>) {
        (self.ref_name, self.value, self.dependency)
    }
}
