// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use switchboard_inject::ConstantType;
use switchboard_resolve::{Declaration, InjectionTarget, Kind};

/// A declaration that resolves to a link to another namespace entry.
pub trait LinkedDeclaration: Declaration {
    /// The name the reference links to, if known.
    fn link_target(&self) -> Option<&str>;
}

/// A typed constant bound into the component namespace.
///
/// An entry without a value is optional: it is skipped instead of being bound.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvEntry {
    name: String,
    constant_type: ConstantType,
    value: Option<String>,
    injection_targets: Vec<InjectionTarget>,
}

impl EnvEntry {
    /// The kind of environment entries.
    pub const KIND: Kind = Kind::new("env-entry");

    /// Creates an entry named `name` of type `constant_type`, without a value.
    pub fn new(name: impl Into<String>, constant_type: ConstantType) -> Self {
        Self {
            name: name.into(),
            constant_type,
            value: None,
            injection_targets: Vec::new(),
        }
    }

    /// Sets the literal value of the entry.
    #[must_use]
    pub fn with_value(mut self, literal: impl Into<String>) -> Self {
        self.value = Some(literal.into());
        self
    }

    /// Adds a member receiving the entry.
    #[must_use]
    pub fn with_injection_target(mut self, target: InjectionTarget) -> Self {
        self.injection_targets.push(target);
        self
    }

    /// The declared constant type.
    #[must_use]
    pub fn constant_type(&self) -> ConstantType {
        self.constant_type
    }

    /// The literal value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Declaration for EnvEntry {
    const KIND: Kind = Self::KIND;

    fn ref_name(&self) -> &str {
        &self.name
    }

    fn injection_targets(&self) -> &[InjectionTarget] {
        &self.injection_targets
    }

    fn is_optional(&self) -> bool {
        self.value.is_none()
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self.constant_type == other.constant_type && self.value == other.value
    }
}

/// A reference to an externally managed resource, such as a connection pool or a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    name: String,
    resource_type: Option<String>,
    lookup: Option<String>,
    description: Option<String>,
    optional: bool,
    injection_targets: Vec<InjectionTarget>,
}

impl ResourceRef {
    /// The kind of resource references.
    pub const KIND: Kind = Kind::new("resource-ref");

    /// Creates a reference named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: None,
            lookup: None,
            description: None,
            optional: false,
            injection_targets: Vec::new(),
        }
    }

    /// Sets the name under which the resource is bound globally.
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl Into<String>) -> Self {
        self.lookup = Some(lookup.into());
        self
    }

    /// Sets the type of the resource.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Sets a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets whether the reference may remain unresolved.
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Adds a member receiving the resource.
    #[must_use]
    pub fn with_injection_target(mut self, target: InjectionTarget) -> Self {
        self.injection_targets.push(target);
        self
    }

    /// The type of the resource, if declared.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    /// The global name of the resource, if declared.
    #[must_use]
    pub fn lookup(&self) -> Option<&str> {
        self.lookup.as_deref()
    }

    /// The description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Declaration for ResourceRef {
    const KIND: Kind = Self::KIND;

    fn ref_name(&self) -> &str {
        &self.name
    }

    fn injection_targets(&self) -> &[InjectionTarget] {
        &self.injection_targets
    }

    fn is_optional(&self) -> bool {
        self.optional
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self.lookup == other.lookup && self.resource_type == other.resource_type
    }
}

impl LinkedDeclaration for ResourceRef {
    fn link_target(&self) -> Option<&str> {
        self.lookup()
    }
}

/// A reference to a peer component of the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    name: String,
    link: Option<String>,
    interface: Option<String>,
    injection_targets: Vec<InjectionTarget>,
}

impl ComponentRef {
    /// The kind of component references.
    pub const KIND: Kind = Kind::new("component-ref");

    /// Creates a reference named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: None,
            interface: None,
            injection_targets: Vec::new(),
        }
    }

    /// Sets the global name of the referenced component.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Sets the interface through which the component is used.
    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Adds a member receiving the component.
    #[must_use]
    pub fn with_injection_target(mut self, target: InjectionTarget) -> Self {
        self.injection_targets.push(target);
        self
    }

    /// The global name of the referenced component, if declared.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// The interface, if declared.
    #[must_use]
    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }
}

impl Declaration for ComponentRef {
    const KIND: Kind = Self::KIND;

    fn ref_name(&self) -> &str {
        &self.name
    }

    fn injection_targets(&self) -> &[InjectionTarget] {
        &self.injection_targets
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self.link == other.link && self.interface == other.interface
    }
}

impl LinkedDeclaration for ComponentRef {
    fn link_target(&self) -> Option<&str> {
        self.link()
    }
}

/// A reference to a persistence unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceUnitRef {
    name: String,
    unit_name: Option<String>,
    injection_targets: Vec<InjectionTarget>,
}

impl PersistenceUnitRef {
    /// The kind of persistence unit references.
    pub const KIND: Kind = Kind::new("persistence-unit-ref");

    /// Creates a reference named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_name: None,
            injection_targets: Vec::new(),
        }
    }

    /// Sets the global name of the persistence unit.
    #[must_use]
    pub fn with_unit_name(mut self, unit_name: impl Into<String>) -> Self {
        self.unit_name = Some(unit_name.into());
        self
    }

    /// Adds a member receiving the persistence unit.
    #[must_use]
    pub fn with_injection_target(mut self, target: InjectionTarget) -> Self {
        self.injection_targets.push(target);
        self
    }

    /// The global name of the persistence unit, if declared.
    #[must_use]
    pub fn unit_name(&self) -> Option<&str> {
        self.unit_name.as_deref()
    }
}

impl Declaration for PersistenceUnitRef {
    const KIND: Kind = Self::KIND;

    fn ref_name(&self) -> &str {
        &self.name
    }

    fn injection_targets(&self) -> &[InjectionTarget] {
        &self.injection_targets
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self.unit_name == other.unit_name
    }
}

impl LinkedDeclaration for PersistenceUnitRef {
    fn link_target(&self) -> Option<&str> {
        self.unit_name()
    }
}
