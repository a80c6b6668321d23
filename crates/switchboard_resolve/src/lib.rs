// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Resolution of named dependency references.
//!
//! A deployable unit declares what it depends on: "give me the resource named X", "link me to
//! the component Y", "bind the constant Z". Each such request is a [`Declaration`] of some
//! [`Kind`], and declarations are grouped into environments, such as the environment of a module
//! and the environments of its components.
//!
//! The [`EnvironmentProcessor`] turns one or more environments into an ordered list of
//! [`ResolverResult`]s. It is configured per kind with:
//!
//! - a [`Visitor`] extracting the declarations of the kind from an environment,
//! - a [`Resolver`] mapping one declaration to a result within a resolution context,
//! - optionally a [`DuplicateReferenceValidator`] deciding whether two declarations resolving to
//!   the same name are a benign duplicate or a conflict.
//!
//! New kinds are added by registering these three pieces; the processor itself never changes.
//!
//! # Logging
//!
//! Skipped declarations without a resolver are reported through [`tracing`] at `WARN` level under
//! the `switchboard.resolve.missing_resolver` event name. Tolerated duplicates and skipped
//! optional declarations are reported at `DEBUG` level.

mod declaration;
mod error;
mod processor;
mod result;
mod spi;

pub use declaration::{Declaration, InjectionTarget, Kind};
pub use error::{ConflictReason, Error, Result};
pub use processor::EnvironmentProcessor;
pub use result::{ResolvedValue, ResolverResult};
pub use spi::{BoxError, DuplicateReferenceValidator, ReferencePair, Resolver, ResultOnlyValidator, Visitor};
