// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Resolvers for the standard declaration kinds.

use switchboard_inject::naming;
use switchboard_resolve::{BoxError, Declaration, Resolver, ResolverResult};

use crate::metadata::{EnvEntry, LinkedDeclaration};

/// Resolves [`EnvEntry`] declarations to constants.
///
/// The reference is bound under `env/<name>`. Entries without a value resolve to nothing, and
/// literals that do not parse as the declared type fail the resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvEntryResolver;

impl<C> Resolver<C, EnvEntry> for EnvEntryResolver {
    fn resolve(&self, _context: &C, entry: &EnvEntry) -> Result<Option<ResolverResult>, BoxError> {
        let Some(literal) = entry.value() else {
            return Ok(None);
        };

        let constant = entry.constant_type().parse_literal(literal)?;
        Ok(Some(ResolverResult::constant(naming::explicit_name(entry.ref_name()), constant)))
    }
}

/// Resolves link-bearing declarations to a link to their target.
///
/// The reference is bound under `env/<name>` and the link target is reported as the prerequisite
/// dependency. Declarations without a target resolve to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkResolver;

impl<C, D: LinkedDeclaration> Resolver<C, D> for LinkResolver {
    fn resolve(&self, _context: &C, declaration: &D) -> Result<Option<ResolverResult>, BoxError> {
        Ok(declaration.link_target().map(|target| {
            ResolverResult::link(naming::explicit_name(declaration.ref_name()), target).with_dependency(target)
        }))
    }
}
