// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Entry, Value};

/// Maximum number of links followed by a single lookup in [`InMemoryNamespace`].
pub const MAX_LINK_HOPS: usize = 32;

const SEPARATOR: char = '/';

/// A hierarchical bind/lookup-by-name store.
///
/// Names are `/`-separated paths. Implementations resolve [`Link`][crate::Link] entries
/// themselves, so a lookup never returns a link.
///
/// Methods take `&self`: a namespace is a shared directory and implementations provide their own
/// interior synchronization.
pub trait Namespace: Send + Sync {
    /// Binds `entry` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already occupied.
    fn bind(&self, name: &str, entry: Entry) -> Result<(), NamingError>;

    /// Looks `name` up, following links.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is bound under `name` or a link cannot be followed.
    fn lookup(&self, name: &str) -> Result<Value, NamingError>;

    /// Removes the entry bound under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is bound under `name`.
    fn unbind(&self, name: &str) -> Result<(), NamingError>;
}

impl<N: Namespace + ?Sized> Namespace for &N {
    fn bind(&self, name: &str, entry: Entry) -> Result<(), NamingError> {
        (**self).bind(name, entry)
    }

    fn lookup(&self, name: &str) -> Result<Value, NamingError> {
        (**self).lookup(name)
    }

    fn unbind(&self, name: &str) -> Result<(), NamingError> {
        (**self).unbind(name)
    }
}

impl<N: Namespace + ?Sized> Namespace for Box<N> {
    fn bind(&self, name: &str, entry: Entry) -> Result<(), NamingError> {
        (**self).bind(name, entry)
    }

    fn lookup(&self, name: &str) -> Result<Value, NamingError> {
        (**self).lookup(name)
    }

    fn unbind(&self, name: &str) -> Result<(), NamingError> {
        (**self).unbind(name)
    }
}

impl<N: Namespace + ?Sized> Namespace for Arc<N> {
    fn bind(&self, name: &str, entry: Entry) -> Result<(), NamingError> {
        (**self).bind(name, entry)
    }

    fn lookup(&self, name: &str) -> Result<Value, NamingError> {
        (**self).lookup(name)
    }

    fn unbind(&self, name: &str) -> Result<(), NamingError> {
        (**self).unbind(name)
    }
}

/// An error reported by a [`Namespace`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NamingError {
    /// Nothing is bound under the name.
    #[error("name `{0}` is not bound")]
    NotFound(String),

    /// The name is already occupied.
    #[error("name `{0}` is already bound")]
    AlreadyBound(String),

    /// A parent of the name is bound to a leaf entry, so it cannot hold children.
    #[error("cannot use `{name}`: `{parent}` is not a context")]
    NotAContext {
        /// The requested name.
        name: String,
        /// The parent bound to a leaf.
        parent: String,
    },

    /// The name is empty or contains empty segments.
    #[error("`{0}` is not a valid name")]
    InvalidName(String),

    /// Following links from the name did not terminate.
    #[error("too many links followed while resolving `{name}`")]
    LinkLoop {
        /// The name that was looked up.
        name: String,
    },

    /// A link points at a name that is not bound.
    #[error("link `{name}` points at `{target}`, which cannot be resolved")]
    BrokenLink {
        /// The name holding the link.
        name: String,
        /// The link target.
        target: String,
        /// The error met while resolving the target.
        #[source]
        source: Box<Self>,
    },

    /// A failure of the underlying naming implementation.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl NamingError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound(name.to_owned())
    }
}

/// A thread-safe, in-process [`Namespace`].
///
/// Parent contexts are implicit: binding `app:comp/env/test` makes `app:comp` and
/// `app:comp/env` contexts. A name bound to an entry cannot become a context afterwards and
/// vice versa.
///
/// # Examples
///
/// ```
/// use switchboard_inject::{Entry, InMemoryNamespace, Link, Namespace, Value};
///
/// let namespace = InMemoryNamespace::new();
/// namespace.bind("global/testBean", Entry::Value(Value::new("Test Value")))?;
/// namespace.bind("env/test", Entry::Link(Link::new("global/testBean")))?;
///
/// let value = namespace.lookup("env/test")?;
/// assert_eq!(value.downcast_ref::<&str>(), Some(&"Test Value"));
/// # Ok::<(), switchboard_inject::NamingError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryNamespace {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl InMemoryNamespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if an entry is bound under exactly `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// The number of bound entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The bound names, in lexicographic order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn resolve(entries: &BTreeMap<String, Entry>, name: &str, hops: usize) -> Result<Value, NamingError> {
        match entries.get(name) {
            None => Err(NamingError::not_found(name)),
            Some(Entry::Value(value)) => Ok(value.clone()),
            Some(Entry::Link(_)) if hops >= MAX_LINK_HOPS => Err(NamingError::LinkLoop { name: name.to_owned() }),
            Some(Entry::Link(link)) => Self::resolve(entries, link.target(), hops + 1).map_err(|error| match error {
                NamingError::LinkLoop { .. } => NamingError::LinkLoop { name: name.to_owned() },
                other => NamingError::BrokenLink {
                    name: name.to_owned(),
                    target: link.target().to_owned(),
                    source: Box::new(other),
                },
            }),
        }
    }
}

impl Namespace for InMemoryNamespace {
    fn bind(&self, name: &str, entry: Entry) -> Result<(), NamingError> {
        validate(name)?;

        let mut entries = self.entries.write();

        for parent in parents(name) {
            if entries.contains_key(parent) {
                return Err(NamingError::NotAContext {
                    name: name.to_owned(),
                    parent: parent.to_owned(),
                });
            }
        }

        if entries.contains_key(name) || is_context(&entries, name) {
            return Err(NamingError::AlreadyBound(name.to_owned()));
        }

        entries.insert(name.to_owned(), entry);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<Value, NamingError> {
        let entries = self.entries.read();
        Self::resolve(&entries, name, 0)
    }

    fn unbind(&self, name: &str) -> Result<(), NamingError> {
        self.entries
            .write()
            .remove(name)
            .map(drop)
            .ok_or_else(|| NamingError::not_found(name))
    }
}

fn validate(name: &str) -> Result<(), NamingError> {
    if name.is_empty() || name.split(SEPARATOR).any(str::is_empty) {
        return Err(NamingError::InvalidName(name.to_owned()));
    }

    Ok(())
}

/// Proper prefixes of `name` that end at a separator, shortest first.
fn parents(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices(SEPARATOR).map(|(index, _)| &name[..index])
}

fn is_context(entries: &BTreeMap<String, Entry>, name: &str) -> bool {
    let prefix = format!("{name}{SEPARATOR}");
    entries
        .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
        .next()
        .is_some_and(|(key, _)| key.starts_with(&prefix))
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::Link;

    assert_impl_all!(InMemoryNamespace: Send, Sync, Namespace);
    assert_impl_all!(NamingError: Send, Sync);

    fn value(text: &'static str) -> Entry {
        Entry::Value(Value::new(text))
    }

    #[test]
    fn bind_and_lookup() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("app:comp/env/test", value("a")).unwrap();

        let found = namespace.lookup("app:comp/env/test").unwrap();
        assert_eq!(found.downcast_ref::<&str>(), Some(&"a"));
        assert!(namespace.contains("app:comp/env/test"));
        assert_eq!(namespace.len(), 1);
    }

    #[test]
    fn lookup_missing_name() {
        let namespace = InMemoryNamespace::new();
        let error = namespace.lookup("env/missing").unwrap_err();
        assert!(matches!(error, NamingError::NotFound(name) if name == "env/missing"));
    }

    #[test]
    fn rebinding_is_rejected() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("env/a", value("first")).unwrap();

        let error = namespace.bind("env/a", value("second")).unwrap_err();
        assert!(matches!(error, NamingError::AlreadyBound(_)));
        assert_eq!(namespace.lookup("env/a").unwrap().downcast_ref::<&str>(), Some(&"first"));
    }

    #[test]
    fn leaf_cannot_become_context() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("env/a", value("leaf")).unwrap();

        let error = namespace.bind("env/a/b", value("child")).unwrap_err();
        assert!(matches!(error, NamingError::NotAContext { ref parent, .. } if parent == "env/a"));
    }

    #[test]
    fn context_cannot_become_leaf() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("env/a/b", value("child")).unwrap();

        let error = namespace.bind("env/a", value("leaf")).unwrap_err();
        assert!(matches!(error, NamingError::AlreadyBound(_)));

        // A sibling sharing a textual prefix is not a child.
        namespace.bind("env/ab", value("sibling")).unwrap();
    }

    #[test]
    fn invalid_names() {
        let namespace = InMemoryNamespace::new();
        for name in ["", "/env", "env/", "env//a"] {
            assert!(
                matches!(namespace.bind(name, value("x")), Err(NamingError::InvalidName(_))),
                "{name:?} must be rejected"
            );
        }
    }

    #[test]
    fn links_are_followed_lazily() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("env/test", Entry::Link(Link::new("global/bean"))).unwrap();

        let error = namespace.lookup("env/test").unwrap_err();
        assert!(matches!(error, NamingError::BrokenLink { ref target, .. } if target == "global/bean"));

        namespace.bind("global/bean", value("late")).unwrap();
        assert_eq!(namespace.lookup("env/test").unwrap().downcast_ref::<&str>(), Some(&"late"));
    }

    #[test]
    fn chained_links() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("a", Entry::Link(Link::new("b"))).unwrap();
        namespace.bind("b", Entry::Link(Link::new("c"))).unwrap();
        namespace.bind("c", value("end")).unwrap();

        assert_eq!(namespace.lookup("a").unwrap().downcast_ref::<&str>(), Some(&"end"));
    }

    #[test]
    fn link_loops_terminate() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("a", Entry::Link(Link::new("b"))).unwrap();
        namespace.bind("b", Entry::Link(Link::new("a"))).unwrap();

        let error = namespace.lookup("a").unwrap_err();
        assert!(matches!(error, NamingError::LinkLoop { ref name } if name == "a"));
    }

    #[test]
    fn unbind() {
        let namespace = InMemoryNamespace::new();
        namespace.bind("env/a", value("x")).unwrap();
        namespace.unbind("env/a").unwrap();

        assert!(namespace.is_empty());
        assert!(matches!(namespace.unbind("env/a"), Err(NamingError::NotFound(_))));
    }

    #[test]
    fn shared_handles_delegate() {
        let namespace = Arc::new(InMemoryNamespace::new());
        let handle: Arc<dyn Namespace> = Arc::clone(&namespace) as Arc<dyn Namespace>;
        handle.bind("env/a", value("x")).unwrap();

        assert_eq!(namespace.names(), vec!["env/a".to_owned()]);
        assert!((&*namespace).lookup("env/a").is_ok());
    }
}
