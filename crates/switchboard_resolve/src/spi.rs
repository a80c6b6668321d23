// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Declaration, ResolverResult};

/// A boxed error returned by resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Maps a declaration of kind `D` to a [`ResolverResult`].
///
/// Resolvers are pure with respect to the processor: they receive the shared resolution context
/// by reference and must not rely on being called in any particular order.
///
/// Returning `Ok(None)` signals that the declaration cannot be resolved. This is tolerated for
/// [optional][Declaration::is_optional] declarations only.
///
/// Any `Fn(&C, &D) -> Result<Option<ResolverResult>, BoxError>` closure is a resolver.
pub trait Resolver<C, D>: Send + Sync {
    /// Resolves `declaration` within `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails.
    fn resolve(&self, context: &C, declaration: &D) -> Result<Option<ResolverResult>, BoxError>;
}

impl<C, D, F> Resolver<C, D> for F
where
    F: Fn(&C, &D) -> Result<Option<ResolverResult>, BoxError> + Send + Sync,
{
    fn resolve(&self, context: &C, declaration: &D) -> Result<Option<ResolverResult>, BoxError> {
        self(context, declaration)
    }
}

/// Extracts the declarations of kind `D` from an environment of type `E`.
pub trait Visitor<E: ?Sized, D>: Send + Sync {
    /// The declarations of kind `D`, or `None` when the environment does not carry the kind.
    fn declarations<'e>(&self, environment: &'e E) -> Option<&'e [D]>;
}

/// One side of a reference collision: the declaration and what it resolved to.
#[derive(Debug)]
pub struct ReferencePair<'a, D> {
    /// The declaration.
    pub declaration: &'a D,
    /// The result it resolved to.
    pub result: &'a ResolverResult,
}

impl<D> Clone for ReferencePair<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for ReferencePair<'_, D> {}

/// Decides whether two declarations of the same kind resolving to the same name can coexist.
///
/// When no validator is registered for a kind, the results must be equal and the declarations
/// [compatible][Declaration::compatible_with].
pub trait DuplicateReferenceValidator<D>: Send + Sync {
    /// Returns `true` if `new` is a benign duplicate of `previous`.
    fn is_valid(&self, previous: ReferencePair<'_, D>, new: ReferencePair<'_, D>) -> bool;
}

/// Accepts duplicates whose results are equal, ignoring every other declaration attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultOnlyValidator;

impl<D: Declaration> DuplicateReferenceValidator<D> for ResultOnlyValidator {
    fn is_valid(&self, previous: ReferencePair<'_, D>, new: ReferencePair<'_, D>) -> bool {
        previous.result == new.result
    }
}
