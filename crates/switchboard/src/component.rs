// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use switchboard_inject::{
    Error as InjectError, FieldInjectionPoint, InjectionPoint, Injector, LookupRetriever, MethodInjectionPoint, Namespace,
    OptionalInjectionPoint, OptionalLookupRetriever, Value, naming,
};
use switchboard_resolve::Declaration;

use crate::Result;
use crate::metadata::SwitchBoardEnvironment;

type ErasedPoint<T> = Arc<dyn InjectionPoint<T, Value>>;

/// The injectable members of a component type.
///
/// Members are registered by name, fields with an accessor and setters with a function. When a
/// declaration targets a property, a setter for that property is preferred over a field of the
/// same name.
///
/// # Examples
///
/// ```
/// use switchboard::TargetDescriptor;
///
/// #[derive(Default)]
/// struct Frontend {
///     pool: String,
///     retries: u32,
/// }
///
/// impl Frontend {
///     fn set_retries(&mut self, retries: u32) {
///         self.retries = retries;
///     }
/// }
///
/// let descriptor = TargetDescriptor::new("app::Frontend")
///     .field("pool", |frontend: &mut Frontend| &mut frontend.pool)
///     .setter("set_retries", Frontend::set_retries)?;
///
/// assert!(descriptor.point("retries").is_some());
/// assert!(descriptor.point("timeout").is_none());
/// # Ok::<(), switchboard::Error>(())
/// ```
pub struct TargetDescriptor<T> {
    owner: Cow<'static, str>,
    fields: Vec<(String, ErasedPoint<T>)>,
    setters: Vec<(String, ErasedPoint<T>)>,
}

impl<T: 'static> TargetDescriptor<T> {
    /// Creates a descriptor for the type known as `owner` in injection targets.
    pub fn new(owner: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: owner.into(),
            fields: Vec::new(),
            setters: Vec::new(),
        }
    }

    /// Registers the field `name`, reached through `accessor`.
    #[must_use]
    pub fn field<F>(mut self, name: &'static str, accessor: fn(&mut T) -> &mut F) -> Self
    where
        F: Any + Clone,
    {
        let point: ErasedPoint<T> = Arc::new(FieldInjectionPoint::new(name, accessor).erased());
        self.fields.push((name.to_owned(), point));
        self
    }

    /// Registers the setter `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a mutator-style name.
    pub fn setter<A>(mut self, name: &'static str, setter: fn(&mut T, A)) -> Result<Self>
    where
        A: Any + Clone,
    {
        let point: ErasedPoint<T> = Arc::new(MethodInjectionPoint::new(name, setter)?.erased());
        self.setters.push((name.to_owned(), point));
        Ok(self)
    }

    /// The name of the described type.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The injection point for `member`.
    ///
    /// `member` is either a property or field name (`pool`) or a setter name (`set_pool`).
    #[must_use]
    pub fn point(&self, member: &str) -> Option<&ErasedPoint<T>> {
        let property = naming::setter_property(member);
        let property = property.as_deref().unwrap_or(member);

        self.setters
            .iter()
            .find(|(name, _)| name == member || naming::setter_property(name).as_deref() == Some(property))
            .or_else(|| self.fields.iter().find(|(name, _)| name == property))
            .map(|(_, point)| point)
    }
}

impl<T> fmt::Debug for TargetDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("owner", &self.owner)
            .field("fields", &self.fields.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .field("setters", &self.setters.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}

/// Builds injectors assigning references from a component namespace into component instances.
///
/// Every injector looks its reference up in the namespace given to the processor each time it is
/// applied.
#[derive(Debug, Clone)]
pub struct InjectionProcessor<N> {
    namespace: N,
}

impl<N> InjectionProcessor<N>
where
    N: Namespace + Clone + 'static,
{
    /// Creates a processor reading from `namespace`.
    pub fn new(namespace: N) -> Self {
        Self { namespace }
    }

    /// Builds the injector for `member` of the described type.
    ///
    /// The member receives the entry named `env/<name>` if `name` is given, or the default name
    /// derived from the type and member otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor has no such member.
    pub fn member_injector<T: 'static>(&self, descriptor: &TargetDescriptor<T>, member: &str, name: Option<&str>) -> Result<Injector<T>> {
        let (point, name) = Self::target(descriptor, member, name)?;
        Ok(Injector::new(point, LookupRetriever::new(self.namespace.clone(), name)))
    }

    /// Builds the injector for `member` of the described type, leaving the member untouched while
    /// the entry is not bound.
    ///
    /// Used for optional declarations, which are skipped when they resolve to nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor has no such member.
    pub fn optional_member_injector<T: 'static>(
        &self,
        descriptor: &TargetDescriptor<T>,
        member: &str,
        name: Option<&str>,
    ) -> Result<Injector<T>> {
        let (point, name) = Self::target(descriptor, member, name)?;
        Ok(Injector::new(
            OptionalInjectionPoint::new(point),
            OptionalLookupRetriever::new(self.namespace.clone(), name),
        ))
    }

    fn target<T: 'static>(descriptor: &TargetDescriptor<T>, member: &str, name: Option<&str>) -> Result<(ErasedPoint<T>, String)> {
        let point = descriptor.point(member).ok_or_else(|| {
            InjectError::InvalidInjectionTarget {
                target: format!("{}::{member}", descriptor.owner()),
                reason: Cow::Borrowed("no field or setter with this name"),
            }
        })?;

        let name = name.map_or_else(|| naming::member_name(descriptor.owner(), member), naming::explicit_name);
        Ok((Arc::clone(point), name))
    }

    /// Builds the injectors for every injection target of `declarations` on the described type.
    ///
    /// Targets on other types are ignored. Members targeted by
    /// [optional][Declaration::is_optional] declarations are left untouched while their entry is
    /// not bound.
    ///
    /// # Errors
    ///
    /// Returns an error if a target names a member the descriptor does not have.
    pub fn process<T: 'static, D: Declaration>(&self, descriptor: &TargetDescriptor<T>, declarations: &[D]) -> Result<Vec<Injector<T>>> {
        declarations
            .iter()
            .flat_map(|declaration| {
                declaration
                    .injection_targets()
                    .iter()
                    .filter(|target| target.owner() == descriptor.owner())
                    .map(move |target| (declaration, target.member()))
            })
            .map(|(declaration, member)| {
                if declaration.is_optional() {
                    self.optional_member_injector(descriptor, member, Some(declaration.ref_name()))
                } else {
                    self.member_injector(descriptor, member, Some(declaration.ref_name()))
                }
            })
            .collect()
    }

    /// Builds the injectors for every declaration of every standard kind in `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error if a target names a member the descriptor does not have.
    pub fn process_environment<T: 'static>(
        &self,
        descriptor: &TargetDescriptor<T>,
        environment: &SwitchBoardEnvironment,
    ) -> Result<Vec<Injector<T>>> {
        let mut injectors = self.process(descriptor, environment.env_entries())?;
        injectors.extend(self.process(descriptor, environment.resource_refs())?);
        injectors.extend(self.process(descriptor, environment.component_refs())?);
        injectors.extend(self.process(descriptor, environment.persistence_unit_refs())?);
        Ok(injectors)
    }
}
