// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashSet;
use std::fmt;

use switchboard_inject::{BindingInjectionPoint, ConstantRetriever, Injector, LinkRetriever, Namespace, SwitchBoardOperator};
use switchboard_resolve::{EnvironmentProcessor, ResolvedValue, ResolverResult, ResultOnlyValidator};
use tracing::Level;

use crate::metadata::{ComponentRef, EnvEntry, EnvironmentVisitor, PersistenceUnitRef, ResourceRef, SwitchBoardEnvironment, SwitchBoardMetadata};
use crate::resolvers::{EnvEntryResolver, LinkResolver};
use crate::{Error, Result};

/// Turns environments into a [`SwitchBoardOperator`] populating a component namespace.
///
/// Every resolved reference becomes an injector binding the resolved value under the reference
/// name. The dependencies of the results are collected so the caller can order the operator after
/// the components it links to.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use switchboard::{ComponentRef, InMemoryNamespace, Namespace, SwitchBoardDeployer, SwitchBoardEnvironment};
///
/// let deployer = SwitchBoardDeployer::<()>::with_defaults();
/// let environment = SwitchBoardEnvironment::new().with_component_ref(ComponentRef::new("test").with_link("global:testBean"));
///
/// let namespace = Arc::new(InMemoryNamespace::new());
/// let deployment = deployer.deploy(&(), Arc::clone(&namespace), [&environment])?.expect("one reference resolved");
///
/// assert_eq!(deployment.dependencies(), ["global:testBean"]);
/// # Ok::<(), switchboard::Error>(())
/// ```
pub struct SwitchBoardDeployer<C, E: ?Sized = SwitchBoardEnvironment> {
    processor: EnvironmentProcessor<C, E>,
}

impl<C, E: ?Sized> fmt::Debug for SwitchBoardDeployer<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchBoardDeployer").field("processor", &self.processor).finish()
    }
}

impl<C: 'static, E: ?Sized + 'static> SwitchBoardDeployer<C, E> {
    /// Creates a deployer resolving references with `processor`.
    #[must_use]
    pub fn new(processor: EnvironmentProcessor<C, E>) -> Self {
        Self { processor }
    }

    /// The processor resolving references.
    #[must_use]
    pub fn processor(&self) -> &EnvironmentProcessor<C, E> {
        &self.processor
    }

    /// Resolves `environments` in one pass and builds the operator binding the results.
    ///
    /// Returns `None` when nothing resolved, in which case there is nothing to deploy.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails or a result cannot be turned into an injector.
    pub fn deploy<'e, N, I>(&self, context: &C, namespace: N, environments: I) -> Result<Option<Deployment<N>>>
    where
        N: Namespace + 'static,
        I: IntoIterator<Item = &'e E>,
    {
        let results = self.processor.process(context, environments)?;
        if results.is_empty() {
            tracing::event!(name: "switchboard.deploy.skipped", Level::DEBUG, "no references resolved");
            return Ok(None);
        }

        let dependencies = dependencies(&results);
        let injectors = results.into_iter().map(injector::<N>).collect::<Result<Vec<_>>>()?;

        tracing::event!(
            name: "switchboard.deploy.created",
            Level::DEBUG,
            deploy.injectors = injectors.len(),
            deploy.dependencies = dependencies.len(),
        );

        Ok(Some(Deployment {
            operator: SwitchBoardOperator::new(namespace, injectors),
            dependencies,
        }))
    }
}

impl<C: 'static> SwitchBoardDeployer<C> {
    /// Creates a deployer handling the standard declaration kinds.
    ///
    /// Kinds are processed in this order: environment entries, resource references, component
    /// references, persistence unit references. Duplicate resource references are compared by
    /// their results only, so descriptions may differ.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut processor = EnvironmentProcessor::<C, SwitchBoardEnvironment>::new();
        processor
            .add_visitor::<EnvEntry, _>(EnvironmentVisitor)
            .add_visitor::<ResourceRef, _>(EnvironmentVisitor)
            .add_visitor::<ComponentRef, _>(EnvironmentVisitor)
            .add_visitor::<PersistenceUnitRef, _>(EnvironmentVisitor)
            .add_resolver::<EnvEntry, _>(EnvEntryResolver)
            .add_resolver::<ResourceRef, _>(LinkResolver)
            .add_resolver::<ComponentRef, _>(LinkResolver)
            .add_resolver::<PersistenceUnitRef, _>(LinkResolver)
            .add_duplicate_validator::<ResourceRef, _>(ResultOnlyValidator);
        Self::new(processor)
    }

    /// Deploys the module environment and every component environment of `metadata` together.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails or a result cannot be turned into an injector.
    pub fn deploy_metadata<N>(&self, context: &C, namespace: N, metadata: &SwitchBoardMetadata) -> Result<Option<Deployment<N>>>
    where
        N: Namespace + 'static,
    {
        self.deploy(context, namespace, metadata.environments())
    }
}

/// The outcome of a deployment: the operator and the prerequisites it depends on.
pub struct Deployment<N> {
    operator: SwitchBoardOperator<N>,
    dependencies: Vec<String>,
}

impl<N> fmt::Debug for Deployment<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployment")
            .field("operator", &self.operator)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

impl<N> Deployment<N> {
    /// The operator binding the resolved references.
    #[must_use]
    pub fn operator(&self) -> &SwitchBoardOperator<N> {
        &self.operator
    }

    /// The distinct dependencies of the resolved references, in first-seen order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Splits the deployment into the operator and its dependencies.
    #[must_use]
    pub fn into_parts(self) -> (SwitchBoardOperator<N>, Vec<String>) {
        (self.operator, self.dependencies)
    }
}

fn dependencies(results: &[ResolverResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter_map(ResolverResult::dependency)
        .filter(|dependency| seen.insert(*dependency))
        .map(str::to_owned)
        .collect()
}

fn injector<N: Namespace + 'static>(result: ResolverResult) -> Result<Injector<N>> {
    let (ref_name, value, _) = result.into_parts();
    let point = BindingInjectionPoint::new(ref_name).map_err(Error::Inject)?;

    Ok(match value {
        ResolvedValue::Link(link) => Injector::new(point, LinkRetriever::from(link)),
        ResolvedValue::Constant(constant) => Injector::new(point, ConstantRetriever::new(constant)),
        other => Injector::new(point, ConstantRetriever::new(other)),
    })
}
