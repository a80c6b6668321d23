// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Deferred, type-checked injection of late-bound values.
//!
//! This crate separates three concerns that are usually tangled together when a component is
//! wired to its dependencies:
//!
//! - **Where** a value goes: an [`InjectionPoint`], such as a field ([`FieldInjectionPoint`]),
//!   a setter ([`MethodInjectionPoint`]) or a name in a naming directory
//!   ([`BindingInjectionPoint`]).
//! - **How** a value is obtained: a [`ValueRetriever`], such as a fixed value
//!   ([`ConstantRetriever`]), a link to another name ([`LinkRetriever`]) or a fresh lookup in a
//!   [`Namespace`] ([`LookupRetriever`]).
//! - **When** the assignment happens: an [`Injector`] pairs one point with one retriever, checks
//!   at compile time that both agree on the value type, and assigns only when applied.
//!
//! Operators ([`SwitchBoardOperator`] and [`EncPopulator`]) apply a list of injectors against a
//! namespace at a single lifecycle trigger.
//!
//! # Namespaces
//!
//! A [`Namespace`] is a hierarchical bind/lookup-by-name store. [`InMemoryNamespace`] is a
//! thread-safe in-process implementation that resolves [`Link`] entries at lookup time, which
//! allows a link to be bound before its target exists.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use switchboard_inject::{
//!     BindingInjectionPoint, ConstantRetriever, InMemoryNamespace, Injector, LinkRetriever, Namespace,
//!     SwitchBoardOperator, Value,
//! };
//!
//! let namespace = Arc::new(InMemoryNamespace::new());
//! let mut operator = SwitchBoardOperator::new(
//!     Arc::clone(&namespace),
//!     [Injector::new(BindingInjectionPoint::new("env/test")?, LinkRetriever::new("global:testBean"))],
//! );
//!
//! assert!(namespace.lookup("env/test").is_err());
//! operator.apply()?;
//!
//! // The link is bound, its target arrives later.
//! namespace.bind("global:testBean", Value::new(String::from("Test Value")).into())?;
//! let value = namespace.lookup("env/test")?;
//! assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("Test Value"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod injector;
pub mod naming;
mod namespace;
mod operator;
mod point;
mod retriever;
mod value;

pub use error::{Error, InjectionCause, Mismatch, Result};
pub use injector::Injector;
pub use namespace::{InMemoryNamespace, MAX_LINK_HOPS, Namespace, NamingError};
pub use operator::{EncPopulator, SwitchBoardOperator};
pub use point::{
    BindingInjectionPoint, Erased, FieldInjectionPoint, InjectionPoint, MethodInjectionPoint, OptionalInjectionPoint, Typed,
};
pub use retriever::{ConstantRetriever, LinkRetriever, LookupRetriever, OptionalLookupRetriever, ValueRetriever};
pub use value::{Constant, ConstantError, ConstantType, Entry, Link, Value};
