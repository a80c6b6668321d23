// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Resolves the references a deployment declares and populates its component namespace.
//!
//! A deployment describes its dependencies as [`SwitchBoardMetadata`]: a module-level
//! [`SwitchBoardEnvironment`] plus one environment per component, each holding declarations of
//! the standard kinds ([`EnvEntry`], [`ResourceRef`], [`ComponentRef`] and
//! [`PersistenceUnitRef`]).
//!
//! The [`SwitchBoardDeployer`] resolves every declaration and produces a [`Deployment`]: a
//! [`SwitchBoardOperator`] that binds each resolved reference into a [`Namespace`] when applied,
//! and the list of prerequisites the operator depends on. The [`InjectionProcessor`] then builds
//! injectors assigning the bound references into the members of component instances.
//!
//! Resolution is provided by [`switchboard_resolve`] and injection by [`switchboard_inject`],
//! both re-exported as [`resolve`] and [`inject`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use switchboard::{
//!     ComponentRef, InMemoryNamespace, Namespace, SwitchBoardDeployer, SwitchBoardEnvironment, SwitchBoardMetadata, Value,
//! };
//!
//! let metadata = SwitchBoardMetadata::new(SwitchBoardEnvironment::new())
//!     .with_component("frontend", SwitchBoardEnvironment::new().with_component_ref(ComponentRef::new("test").with_link("global:testBean")));
//!
//! let namespace = Arc::new(InMemoryNamespace::new());
//! let deployer = SwitchBoardDeployer::<()>::with_defaults();
//! let (mut operator, dependencies) = deployer
//!     .deploy_metadata(&(), Arc::clone(&namespace), &metadata)?
//!     .expect("a reference was declared")
//!     .into_parts();
//! assert_eq!(dependencies, ["global:testBean"]);
//!
//! // The prerequisite is bound by its own deployment.
//! namespace.bind("global:testBean", Value::new(String::from("Test Value")).into()).expect("bind");
//!
//! assert!(namespace.lookup("env/test").is_err());
//! operator.apply()?;
//! let value = namespace.lookup("env/test").expect("bound by the operator");
//! assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("Test Value"));
//! # Ok::<(), switchboard::Error>(())
//! ```

mod component;
mod deployer;
mod error;
pub mod metadata;
pub mod resolvers;

pub use component::{InjectionProcessor, TargetDescriptor};
pub use deployer::{Deployment, SwitchBoardDeployer};
pub use error::{Error, Result};
pub use metadata::{
    ComponentRef, EnvEntry, EnvironmentVisitor, LinkedDeclaration, PersistenceUnitRef, ResourceRef, SwitchBoardEnvironment,
    SwitchBoardMetadata,
};
pub use resolvers::{EnvEntryResolver, LinkResolver};
pub use switchboard_inject as inject;
pub use switchboard_inject::{ConstantType, EncPopulator, InMemoryNamespace, Injector, Namespace, SwitchBoardOperator, Value};
pub use switchboard_resolve as resolve;
pub use switchboard_resolve::{Declaration, EnvironmentProcessor, InjectionTarget, Kind, ResolverResult};
