// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::fmt;

/// Identifies a kind of declaration.
///
/// Kinds key the resolver, visitor and validator registries of the
/// [`EnvironmentProcessor`][crate::EnvironmentProcessor]. Two declarations of different kinds are
/// never interchangeable, even when they resolve to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(&'static str);

impl Kind {
    /// Creates a kind with the given name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A member of a component type that receives a resolved reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InjectionTarget {
    owner: String,
    member: String,
}

impl InjectionTarget {
    /// Creates a target naming `member` of the type `owner`.
    ///
    /// A member named like a mutator (`set_pool`, `setPool`) designates a setter, any other name
    /// designates a field.
    pub fn new(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
        }
    }

    /// The name of the type owning the member.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The name of the member.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }
}

impl fmt::Display for InjectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.member)
    }
}

/// One typed request for a dependency.
///
/// A declaration is immutable once produced. Its reference name is unique within its environment
/// for its kind, and is the key under which collisions across environments are detected.
///
/// # Examples
///
/// ```
/// use switchboard_resolve::{Declaration, Kind};
///
/// #[derive(Debug, PartialEq)]
/// struct QueueRef {
///     name: String,
///     queue: String,
/// }
///
/// impl Declaration for QueueRef {
///     const KIND: Kind = Kind::new("queue-ref");
///
///     fn ref_name(&self) -> &str {
///         &self.name
///     }
///
///     fn compatible_with(&self, other: &Self) -> bool {
///         self == other
///     }
/// }
/// ```
pub trait Declaration: fmt::Debug + Send + Sync + 'static {
    /// The kind shared by every declaration of this type.
    const KIND: Kind;

    /// The local reference name.
    fn ref_name(&self) -> &str;

    /// The members receiving the resolved reference.
    fn injection_targets(&self) -> &[InjectionTarget] {
        &[]
    }

    /// Whether the declaration may remain unresolved.
    fn is_optional(&self) -> bool {
        false
    }

    /// Whether `other` declares the same dependency, given that both resolved to equal results.
    ///
    /// Used to arbitrate collisions when no duplicate validator is registered for the kind.
    fn compatible_with(&self, other: &Self) -> bool;
}

/// A kind-erased view of a declaration, kept while a processing pass is running.
pub(crate) trait AnyDeclaration: fmt::Debug + Send + Sync {
    fn kind(&self) -> Kind;

    fn as_any(&self) -> &dyn Any;
}

impl<D: Declaration> AnyDeclaration for D {
    fn kind(&self) -> Kind {
        D::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe(&'static str);

    impl Declaration for Probe {
        const KIND: Kind = Kind::new("probe");

        fn ref_name(&self) -> &str {
            self.0
        }

        fn compatible_with(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    #[test]
    fn defaults() {
        let probe = Probe("a");
        assert!(probe.injection_targets().is_empty());
        assert!(!probe.is_optional());
        assert_eq!(Probe::KIND.name(), "probe");
        assert_eq!(Probe::KIND.to_string(), "probe");
    }

    #[test]
    fn erased_view_keeps_identity() {
        let probe = Probe("a");
        let erased: &dyn AnyDeclaration = &probe;

        assert_eq!(erased.kind(), Kind::new("probe"));
        assert!(erased.as_any().downcast_ref::<Probe>().is_some());
    }

    #[test]
    fn injection_target_display() {
        let target = InjectionTarget::new("app::Frontend", "set_pool");
        assert_eq!(target.owner(), "app::Frontend");
        assert_eq!(target.member(), "set_pool");
        assert_eq!(target.to_string(), "app::Frontend::set_pool");
    }
}
