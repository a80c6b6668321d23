// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt;

use crate::NamingError;

/// A specialized `Result` type for injection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised while constructing or applying injectors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An injection point was constructed over a structurally invalid target.
    ///
    /// This is detected eagerly, when the injection point is built, never when it is applied.
    #[error("invalid injection target {target}: {reason}")]
    InvalidInjectionTarget {
        /// Description of the rejected target.
        target: String,
        /// Why the target was rejected.
        reason: Cow<'static, str>,
    },

    /// Retrieving or assigning a value failed while an injector was applied.
    #[error("injection into {point} failed")]
    InjectionFailed {
        /// Description of the injection point that was being applied.
        point: String,
        /// The underlying failure.
        #[source]
        cause: InjectionCause,
    },

    /// A lazily populated operator could not obtain its namespace.
    #[error("unable to obtain the namespace to populate")]
    NamespaceUnavailable(#[source] NamingError),
}

impl Error {
    pub(crate) fn invalid_target(target: impl fmt::Display, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidInjectionTarget {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the underlying cause if this is an [`Error::InjectionFailed`].
    #[must_use]
    pub fn cause(&self) -> Option<&InjectionCause> {
        match self {
            Self::InjectionFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Why a single injection failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InjectionCause {
    /// A namespace lookup performed by a retriever failed.
    #[error("unable to look up `{name}`: {root_cause}")]
    LookupFailed {
        /// The name that was looked up.
        name: String,
        /// Message of the innermost error in the source chain.
        root_cause: String,
        /// The error reported by the namespace.
        #[source]
        source: NamingError,
    },

    /// The runtime type of a value does not match the type expected by the target.
    #[error("cannot assign a value of type `{actual}` to {target} of type `{expected}`{mismatch}")]
    IncompatibleValue {
        /// Description of the target.
        target: String,
        /// The type the target accepts.
        expected: &'static str,
        /// The type of the offered value.
        actual: &'static str,
        /// The flavor of mismatch.
        mismatch: Mismatch,
    },

    /// The namespace rejected a bind.
    #[error("failed to bind `{name}`")]
    BindingFailed {
        /// The name that was being bound.
        name: String,
        /// The error reported by the namespace.
        #[source]
        source: NamingError,
    },
}

impl InjectionCause {
    pub(crate) fn lookup_failed(name: impl Into<String>, source: NamingError) -> Self {
        let root_cause = root_cause(&source);
        Self::LookupFailed {
            name: name.into(),
            root_cause,
            source,
        }
    }

    pub(crate) fn incompatible(target: impl fmt::Display, expected: &'static str, actual: &'static str) -> Self {
        let mismatch = if expected == actual { Mismatch::Origin } else { Mismatch::Type };
        Self::IncompatibleValue {
            target: target.to_string(),
            expected,
            actual,
            mismatch,
        }
    }
}

/// Distinguishes a genuine type mismatch from a type identity mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Mismatch {
    /// The value and target types are different types.
    Type,
    /// The value and target types share the same path but are distinct types, which happens when
    /// two versions of the same crate end up in one dependency graph.
    Origin,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => Ok(()),
            Self::Origin => f.write_str("; the types share a name but originate from different crate versions"),
        }
    }
}

fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}
