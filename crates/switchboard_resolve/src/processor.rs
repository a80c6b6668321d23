// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::fmt;
use std::marker::PhantomData;

use tracing::Level;

use crate::declaration::AnyDeclaration;
use crate::{
    ConflictReason, Declaration, DuplicateReferenceValidator, Error, Kind, ReferencePair, Resolver, ResolverResult,
    Result, Visitor,
};

/// Resolves the declarations of one or more environments into an ordered list of results.
///
/// The processor owns three registries keyed by [`Kind`]: visitors extracting declarations from
/// an environment, resolvers turning a declaration into a [`ResolverResult`], and optional
/// duplicate validators arbitrating collisions. Registering again for a kind replaces the previous
/// registration; a replaced visitor keeps its position in the processing order.
///
/// Registration takes `&mut self` and processing takes `&self`, so a configured processor can be
/// shared and used by any number of concurrent passes.
///
/// # Ordering
///
/// Results are produced by environment in call order, then by kind in visitor registration order,
/// then by declaration in the order the visitor yields them. When several declarations resolve to
/// the same reference name, the first one wins and the others are either tolerated or rejected:
///
/// - declarations of different kinds always conflict;
/// - with a [`DuplicateReferenceValidator`] registered for the kind, the validator decides;
/// - otherwise the results must be equal and the declarations
///   [compatible][Declaration::compatible_with].
///
/// # Examples
///
/// ```
/// use switchboard_resolve::{BoxError, Declaration, EnvironmentProcessor, Kind, ResolverResult, Visitor};
///
/// #[derive(Debug, PartialEq)]
/// struct BeanRef {
///     name: String,
///     bean: String,
/// }
///
/// impl Declaration for BeanRef {
///     const KIND: Kind = Kind::new("bean-ref");
///
///     fn ref_name(&self) -> &str {
///         &self.name
///     }
///
///     fn compatible_with(&self, other: &Self) -> bool {
///         self == other
///     }
/// }
///
/// struct Beans;
///
/// impl Visitor<Vec<BeanRef>, BeanRef> for Beans {
///     fn declarations<'e>(&self, environment: &'e Vec<BeanRef>) -> Option<&'e [BeanRef]> {
///         Some(environment)
///     }
/// }
///
/// let mut processor = EnvironmentProcessor::<(), Vec<BeanRef>>::new();
/// processor.add_visitor(Beans);
/// processor.add_resolver(|_: &(), bean: &BeanRef| -> Result<Option<ResolverResult>, BoxError> {
///     Ok(Some(ResolverResult::link(format!("env/{}", bean.name), format!("global:{}", bean.bean))))
/// });
///
/// let environment = vec![BeanRef { name: "test".into(), bean: "testBean".into() }];
/// let results = processor.process(&(), [&environment])?;
///
/// assert_eq!(results, [ResolverResult::link("env/test", "global:testBean")]);
/// # Ok::<(), switchboard_resolve::Error>(())
/// ```
pub struct EnvironmentProcessor<C, E: ?Sized> {
    visitors: Vec<(Kind, Box<dyn KindVisitor<C, E>>)>,
    resolvers: HashMap<Kind, Box<dyn Any + Send + Sync>>,
    validators: HashMap<Kind, Box<dyn Any + Send + Sync>>,
    declaration_types: HashMap<Kind, (TypeId, &'static str)>,
    allow_missing_resolver: bool,
}

impl<C: 'static, E: ?Sized + 'static> EnvironmentProcessor<C, E> {
    /// Creates a processor with empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
            resolvers: HashMap::new(),
            validators: HashMap::new(),
            declaration_types: HashMap::new(),
            allow_missing_resolver: false,
        }
    }

    /// Sets whether declarations without a registered resolver are skipped instead of failing.
    ///
    /// Skipped declarations are logged at `WARN` level. Defaults to `false`.
    #[must_use]
    pub fn allow_missing_resolver(mut self, allow: bool) -> Self {
        self.allow_missing_resolver = allow;
        self
    }

    /// Registers the visitor extracting declarations of kind `D`.
    ///
    /// Every kind belongs to a single declaration type. Registering a second type under a kind
    /// that is already in use panics in debug builds.
    pub fn add_visitor<D, V>(&mut self, visitor: V) -> &mut Self
    where
        D: Declaration,
        V: Visitor<E, D> + 'static,
    {
        self.claim_kind::<D>();
        let visitor: Box<dyn KindVisitor<C, E>> = Box::new(TypedVisitor {
            visitor,
            _kind: PhantomData::<fn() -> D>,
        });

        match self.visitors.iter_mut().find(|(kind, _)| *kind == D::KIND) {
            Some((_, existing)) => *existing = visitor,
            None => self.visitors.push((D::KIND, visitor)),
        }
        self
    }

    /// Registers the resolver for declarations of kind `D`.
    pub fn add_resolver<D, R>(&mut self, resolver: R) -> &mut Self
    where
        D: Declaration,
        R: Resolver<C, D> + 'static,
    {
        self.claim_kind::<D>();
        let resolver: Box<dyn Resolver<C, D>> = Box::new(resolver);
        self.resolvers.insert(D::KIND, Box::new(resolver));
        self
    }

    /// Registers the duplicate validator for declarations of kind `D`.
    pub fn add_duplicate_validator<D, V>(&mut self, validator: V) -> &mut Self
    where
        D: Declaration,
        V: DuplicateReferenceValidator<D> + 'static,
    {
        self.claim_kind::<D>();
        let validator: Box<dyn DuplicateReferenceValidator<D>> = Box::new(validator);
        self.validators.insert(D::KIND, Box::new(validator));
        self
    }

    /// The registered kinds in processing order.
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.visitors.iter().map(|(kind, _)| *kind)
    }

    /// Resolves every declaration of every registered kind in `environments`.
    ///
    /// Results are produced fresh on every call; nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoResolverFound`] if a declaration's kind has no resolver and missing
    /// resolvers are not allowed, [`Error::ResolutionFailed`] if a resolver fails or yields nothing
    /// for a mandatory declaration, and [`Error::ConflictingReferences`] if two declarations
    /// resolving to the same name cannot coexist. Processing stops at the first error.
    pub fn process<'e, I>(&self, context: &C, environments: I) -> Result<Vec<ResolverResult>>
    where
        I: IntoIterator<Item = &'e E>,
    {
        let mut mapped = MappedResults::default();
        for environment in environments {
            for (_, visitor) in &self.visitors {
                visitor.process(self, context, environment, &mut mapped)?;
            }
        }
        Ok(mapped.into_results())
    }

    fn claim_kind<D: Declaration>(&mut self) {
        let (registered_id, registered_name) = *self
            .declaration_types
            .entry(D::KIND)
            .or_insert((TypeId::of::<D>(), type_name::<D>()));

        debug_assert!(
            registered_id == TypeId::of::<D>(),
            "kind `{}` is already used by `{registered_name}`, cannot register `{}`",
            D::KIND,
            type_name::<D>(),
        );
    }

    fn resolver<D: Declaration>(&self) -> Option<&dyn Resolver<C, D>> {
        self.resolvers
            .get(&D::KIND)?
            .downcast_ref::<Box<dyn Resolver<C, D>>>()
            .map(AsRef::as_ref)
    }

    fn validator<D: Declaration>(&self) -> Option<&dyn DuplicateReferenceValidator<D>> {
        self.validators
            .get(&D::KIND)?
            .downcast_ref::<Box<dyn DuplicateReferenceValidator<D>>>()
            .map(AsRef::as_ref)
    }

    fn resolve<D: Declaration>(&self, context: &C, declaration: &D) -> Result<Option<ResolverResult>> {
        let Some(resolver) = self.resolver::<D>() else {
            if self.allow_missing_resolver {
                tracing::event!(
                    name: "switchboard.resolve.missing_resolver",
                    Level::WARN,
                    declaration.kind = %D::KIND,
                    declaration.ref_name = declaration.ref_name(),
                    "skipping declaration without a registered resolver",
                );
                return Ok(None);
            }

            return Err(Error::NoResolverFound {
                kind: D::KIND,
                declaration: format!("{declaration:?}"),
            });
        };

        match resolver.resolve(context, declaration) {
            Ok(Some(result)) => Ok(Some(result)),
            Ok(None) if declaration.is_optional() => {
                tracing::event!(
                    name: "switchboard.resolve.optional_skipped",
                    Level::DEBUG,
                    declaration.kind = %D::KIND,
                    declaration.ref_name = declaration.ref_name(),
                );
                Ok(None)
            }
            Ok(None) => Err(Error::ResolutionFailed {
                kind: D::KIND,
                declaration: format!("{declaration:?}"),
                source: None,
            }),
            Err(source) => Err(Error::ResolutionFailed {
                kind: D::KIND,
                declaration: format!("{declaration:?}"),
                source: Some(source),
            }),
        }
    }
}

impl<C: 'static, E: ?Sized + 'static> Default for EnvironmentProcessor<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E: ?Sized> fmt::Debug for EnvironmentProcessor<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut resolvers: Vec<_> = self.resolvers.keys().collect();
        resolvers.sort_unstable();
        let mut validators: Vec<_> = self.validators.keys().collect();
        validators.sort_unstable();

        f.debug_struct("EnvironmentProcessor")
            .field("kinds", &self.visitors.iter().map(|(kind, _)| kind).collect::<Vec<_>>())
            .field("resolvers", &resolvers)
            .field("validators", &validators)
            .field("allow_missing_resolver", &self.allow_missing_resolver)
            .finish()
    }
}

/// Processes the declarations of one kind, with the kind erased.
trait KindVisitor<C, E: ?Sized>: Send + Sync {
    fn process<'e>(
        &self,
        processor: &EnvironmentProcessor<C, E>,
        context: &C,
        environment: &'e E,
        mapped: &mut MappedResults<'e>,
    ) -> Result<()>;
}

struct TypedVisitor<V, D> {
    visitor: V,
    _kind: PhantomData<fn() -> D>,
}

impl<C, E, V, D> KindVisitor<C, E> for TypedVisitor<V, D>
where
    C: 'static,
    E: ?Sized + 'static,
    V: Visitor<E, D>,
    D: Declaration,
{
    fn process<'e>(
        &self,
        processor: &EnvironmentProcessor<C, E>,
        context: &C,
        environment: &'e E,
        mapped: &mut MappedResults<'e>,
    ) -> Result<()> {
        let Some(declarations) = self.visitor.declarations(environment) else {
            return Ok(());
        };

        for declaration in declarations {
            if let Some(result) = processor.resolve(context, declaration)? {
                mapped.insert(declaration, result, processor.validator::<D>())?;
            }
        }
        Ok(())
    }
}

/// Results of one processing pass, keyed by reference name.
#[derive(Default)]
struct MappedResults<'e> {
    by_name: HashMap<String, Mapped<'e>>,
    results: Vec<ResolverResult>,
}

struct Mapped<'e> {
    declaration: &'e dyn AnyDeclaration,
    index: usize,
}

impl<'e> MappedResults<'e> {
    fn insert<D: Declaration>(
        &mut self,
        declaration: &'e D,
        result: ResolverResult,
        validator: Option<&dyn DuplicateReferenceValidator<D>>,
    ) -> Result<()> {
        let previous = match self.by_name.entry(result.ref_name().to_owned()) {
            MapEntry::Vacant(vacant) => {
                vacant.insert(Mapped {
                    declaration,
                    index: self.results.len(),
                });
                self.results.push(result);
                return Ok(());
            }
            MapEntry::Occupied(occupied) => occupied.into_mut(),
        };

        let conflict = |reason| Error::ConflictingReferences {
            ref_name: result.ref_name().to_owned(),
            previous: format!("{:?}", previous.declaration),
            new: format!("{declaration:?}"),
            reason,
        };

        let Some(previous_declaration) = previous.declaration.as_any().downcast_ref::<D>() else {
            return Err(conflict(ConflictReason::KindMismatch {
                previous: previous.declaration.kind(),
                new: D::KIND,
            }));
        };
        let previous_result = &self.results[previous.index];

        let tolerated = match validator {
            Some(validator) => validator.is_valid(
                ReferencePair {
                    declaration: previous_declaration,
                    result: previous_result,
                },
                ReferencePair {
                    declaration,
                    result: &result,
                },
            ),
            None => *previous_result == result && previous_declaration.compatible_with(declaration),
        };

        if !tolerated {
            return Err(conflict(ConflictReason::NotEquivalent));
        }

        tracing::event!(
            name: "switchboard.resolve.duplicate_tolerated",
            Level::DEBUG,
            declaration.kind = %D::KIND,
            declaration.ref_name = result.ref_name(),
        );
        Ok(())
    }

    fn into_results(self) -> Vec<ResolverResult> {
        self.results
    }
}
