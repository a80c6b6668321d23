// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{BoxError, Kind};

/// A specialized `Result` type for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised while processing environments.
///
/// Declarations are identified by their `Debug` representation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A declaration's kind has no registered resolver.
    #[error("no resolver registered for kind `{kind}` to resolve {declaration}")]
    NoResolverFound {
        /// The kind of the declaration.
        kind: Kind,
        /// The unresolvable declaration.
        declaration: String,
    },

    /// A resolver failed, or returned no result for a mandatory declaration.
    #[error("failed to resolve {declaration} of kind `{kind}`")]
    ResolutionFailed {
        /// The kind of the declaration.
        kind: Kind,
        /// The declaration being resolved.
        declaration: String,
        /// The error reported by the resolver, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// Two declarations resolve to the same reference name but cannot coexist.
    #[error("conflicting references for `{ref_name}`: {new} conflicts with {previous} ({reason})")]
    ConflictingReferences {
        /// The shared reference name.
        ref_name: String,
        /// The declaration seen first.
        previous: String,
        /// The declaration seen last.
        new: String,
        /// Why the declarations conflict.
        reason: ConflictReason,
    },
}

/// Why two declarations sharing a reference name conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictReason {
    /// The declarations are of different kinds.
    KindMismatch {
        /// The kind of the declaration seen first.
        previous: Kind,
        /// The kind of the declaration seen last.
        new: Kind,
    },
    /// The declarations are of the same kind but not equivalent.
    NotEquivalent,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { previous, new } => write!(f, "kind `{new}` differs from `{previous}`"),
            Self::NotEquivalent => f.write_str("the declarations are not equivalent"),
        }
    }
}
