// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Declarations of the standard kinds and the environments that carry them.

mod references;

pub use references::{ComponentRef, EnvEntry, LinkedDeclaration, PersistenceUnitRef, ResourceRef};
use switchboard_resolve::Visitor;

/// The declarations of one deployable unit or component, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchBoardEnvironment {
    env_entries: Vec<EnvEntry>,
    resource_refs: Vec<ResourceRef>,
    component_refs: Vec<ComponentRef>,
    persistence_unit_refs: Vec<PersistenceUnitRef>,
}

impl SwitchBoardEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an environment entry.
    #[must_use]
    pub fn with_env_entry(mut self, entry: EnvEntry) -> Self {
        self.env_entries.push(entry);
        self
    }

    /// Adds a resource reference.
    #[must_use]
    pub fn with_resource_ref(mut self, reference: ResourceRef) -> Self {
        self.resource_refs.push(reference);
        self
    }

    /// Adds a component reference.
    #[must_use]
    pub fn with_component_ref(mut self, reference: ComponentRef) -> Self {
        self.component_refs.push(reference);
        self
    }

    /// Adds a persistence unit reference.
    #[must_use]
    pub fn with_persistence_unit_ref(mut self, reference: PersistenceUnitRef) -> Self {
        self.persistence_unit_refs.push(reference);
        self
    }

    /// The environment entries in declaration order.
    #[must_use]
    pub fn env_entries(&self) -> &[EnvEntry] {
        &self.env_entries
    }

    /// The resource references in declaration order.
    #[must_use]
    pub fn resource_refs(&self) -> &[ResourceRef] {
        &self.resource_refs
    }

    /// The component references in declaration order.
    #[must_use]
    pub fn component_refs(&self) -> &[ComponentRef] {
        &self.component_refs
    }

    /// The persistence unit references in declaration order.
    #[must_use]
    pub fn persistence_unit_refs(&self) -> &[PersistenceUnitRef] {
        &self.persistence_unit_refs
    }

    /// Whether the environment declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.env_entries.is_empty()
            && self.resource_refs.is_empty()
            && self.component_refs.is_empty()
            && self.persistence_unit_refs.is_empty()
    }
}

/// The environments of a deployment: one for the module and one per component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchBoardMetadata {
    module: SwitchBoardEnvironment,
    components: Vec<(String, SwitchBoardEnvironment)>,
}

impl SwitchBoardMetadata {
    /// Creates metadata around the module-level environment.
    #[must_use]
    pub fn new(module: SwitchBoardEnvironment) -> Self {
        Self {
            module,
            components: Vec::new(),
        }
    }

    /// Adds the environment of the component named `name`.
    ///
    /// Adding a component twice replaces its environment.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, environment: SwitchBoardEnvironment) -> Self {
        let name = name.into();
        match self.components.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = environment,
            None => self.components.push((name, environment)),
        }
        self
    }

    /// The module-level environment.
    #[must_use]
    pub fn module(&self) -> &SwitchBoardEnvironment {
        &self.module
    }

    /// The environment of the component named `name`.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&SwitchBoardEnvironment> {
        self.components
            .iter()
            .find_map(|(existing, environment)| (existing == name).then_some(environment))
    }

    /// The component names in insertion order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|(name, _)| name.as_str())
    }

    /// Every environment, the module first, then components in insertion order.
    pub fn environments(&self) -> impl Iterator<Item = &SwitchBoardEnvironment> {
        std::iter::once(&self.module).chain(self.components.iter().map(|(_, environment)| environment))
    }
}

/// Extracts the standard declaration kinds from a [`SwitchBoardEnvironment`].
///
/// Kinds without declarations are reported as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentVisitor;

fn non_empty<D>(declarations: &[D]) -> Option<&[D]> {
    (!declarations.is_empty()).then_some(declarations)
}

impl Visitor<SwitchBoardEnvironment, EnvEntry> for EnvironmentVisitor {
    fn declarations<'e>(&self, environment: &'e SwitchBoardEnvironment) -> Option<&'e [EnvEntry]> {
        non_empty(environment.env_entries())
    }
}

impl Visitor<SwitchBoardEnvironment, ResourceRef> for EnvironmentVisitor {
    fn declarations<'e>(&self, environment: &'e SwitchBoardEnvironment) -> Option<&'e [ResourceRef]> {
        non_empty(environment.resource_refs())
    }
}

impl Visitor<SwitchBoardEnvironment, ComponentRef> for EnvironmentVisitor {
    fn declarations<'e>(&self, environment: &'e SwitchBoardEnvironment) -> Option<&'e [ComponentRef]> {
        non_empty(environment.component_refs())
    }
}

impl Visitor<SwitchBoardEnvironment, PersistenceUnitRef> for EnvironmentVisitor {
    fn declarations<'e>(&self, environment: &'e SwitchBoardEnvironment) -> Option<&'e [PersistenceUnitRef]> {
        non_empty(environment.persistence_unit_refs())
    }
}
