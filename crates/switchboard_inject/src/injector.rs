// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::marker::PhantomData;

use crate::{Error, InjectionCause, InjectionPoint, Result, ValueRetriever};

/// Pairs one [`InjectionPoint`] with one [`ValueRetriever`].
///
/// The value type shared by the point and the retriever is checked when the injector is created
/// and erased afterwards, so injectors for different value types can live in one collection.
///
/// An injector holds no state of its own. Every [`apply`][Self::apply] retrieves a fresh value and
/// assigns it; nothing is cached and nothing is retried.
///
/// # Examples
///
/// ```
/// use switchboard_inject::{ConstantRetriever, FieldInjectionPoint, Injector};
///
/// #[derive(Default)]
/// struct Bean {
///     name: String,
///     port: u16,
/// }
///
/// let injectors: Vec<Injector<Bean>> = vec![
///     Injector::new(
///         FieldInjectionPoint::new("name", |bean: &mut Bean| &mut bean.name),
///         ConstantRetriever::new(String::from("frontend")),
///     ),
///     Injector::new(
///         FieldInjectionPoint::new("port", |bean: &mut Bean| &mut bean.port),
///         ConstantRetriever::new(8080_u16),
///     ),
/// ];
///
/// let mut bean = Bean::default();
/// for injector in &injectors {
///     injector.apply(&mut bean)?;
/// }
/// assert_eq!(bean.name, "frontend");
/// assert_eq!(bean.port, 8080);
/// # Ok::<(), switchboard_inject::Error>(())
/// ```
///
/// ## Mismatched Value Types
///
/// A point and a retriever that disagree on the value type cannot be paired. The code below does
/// not compile because the field holds a `String` while the retriever yields a `u32`.
///
/// ```compile_fail
/// use switchboard_inject::{ConstantRetriever, FieldInjectionPoint, Injector};
///
/// struct Bean {
///     name: String,
/// }
///
/// let injector: Injector<Bean> = Injector::new(
///     FieldInjectionPoint::new("name", |bean: &mut Bean| &mut bean.name),
///     ConstantRetriever::new(8080_u32),
/// );
/// ```
pub struct Injector<T: ?Sized> {
    delegate: Box<dyn Inject<T>>,
}

impl<T: ?Sized> Injector<T> {
    /// Creates an injector assigning values produced by `retriever` through `point`.
    pub fn new<V, P, R>(point: P, retriever: R) -> Self
    where
        V: 'static,
        P: InjectionPoint<T, V> + 'static,
        R: ValueRetriever<V> + 'static,
    {
        Self {
            delegate: Box::new(TypedDelegate {
                point,
                retriever,
                _value: PhantomData,
            }),
        }
    }

    /// Retrieves a value and assigns it into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InjectionFailed`] naming the injection point if either the retrieval or
    /// the assignment fails.
    pub fn apply(&self, target: &mut T) -> Result<()> {
        self.delegate.inject(target).map_err(|cause| Error::InjectionFailed {
            point: self.delegate.point().to_string(),
            cause,
        })
    }
}

impl<T: ?Sized> fmt::Display for Injector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.delegate.point().fmt(f)
    }
}

impl<T: ?Sized> fmt::Debug for Injector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("point", &format_args!("{}", self.delegate.point()))
            .field("retriever", self.delegate.retriever())
            .finish()
    }
}

trait Inject<T: ?Sized>: Send + Sync {
    fn inject(&self, target: &mut T) -> std::result::Result<(), InjectionCause>;

    fn point(&self) -> &dyn fmt::Display;

    fn retriever(&self) -> &dyn fmt::Debug;
}

struct TypedDelegate<P, R, V> {
    point: P,
    retriever: R,
    _value: PhantomData<fn() -> V>,
}

impl<T, V, P, R> Inject<T> for TypedDelegate<P, R, V>
where
    T: ?Sized,
    P: InjectionPoint<T, V>,
    R: ValueRetriever<V>,
{
    fn inject(&self, target: &mut T) -> std::result::Result<(), InjectionCause> {
        let value = self.retriever.retrieve()?;
        self.point.set(target, value)
    }

    fn point(&self) -> &dyn fmt::Display {
        &self.point
    }

    fn retriever(&self) -> &dyn fmt::Debug {
        &self.retriever
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::{ConstantRetriever, FieldInjectionPoint, InMemoryNamespace, LookupRetriever, Value};

    assert_impl_all!(Injector<InMemoryNamespace>: Send, Sync);
    assert_impl_all!(Injector<dyn crate::Namespace>: Send, Sync);

    #[derive(Debug, Default)]
    struct Bean {
        hits: usize,
    }

    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl ValueRetriever<usize> for Arc<Counting> {
        fn retrieve(&self) -> std::result::Result<usize, InjectionCause> {
            Ok(self.calls.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[test]
    fn every_apply_retrieves_again() {
        let counting = Arc::new(Counting::default());
        let injector = Injector::new(
            FieldInjectionPoint::new("hits", |bean: &mut Bean| &mut bean.hits),
            Arc::clone(&counting),
        );

        let mut bean = Bean::default();
        injector.apply(&mut bean).unwrap();
        injector.apply(&mut bean).unwrap();

        assert_eq!(bean.hits, 2);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retrieval_failure_names_the_point() {
        let namespace = Arc::new(InMemoryNamespace::new());
        let injector = Injector::new(
            FieldInjectionPoint::new("hits", |bean: &mut Bean| &mut bean.hits).erased(),
            LookupRetriever::new(namespace, "env/hits"),
        );

        let error = injector.apply(&mut Bean::default()).unwrap_err();
        assert_eq!(error.to_string(), "injection into field `Bean::hits` failed");
        assert!(matches!(error.cause(), Some(InjectionCause::LookupFailed { .. })));
    }

    #[test]
    fn display_and_debug() {
        let injector = Injector::new(
            FieldInjectionPoint::new("hits", |bean: &mut Bean| &mut bean.hits).erased(),
            ConstantRetriever::new(Value::new(1_usize)),
        );

        assert_eq!(injector.to_string(), "field `Bean::hits`");
        let debug = format!("{injector:?}");
        assert!(debug.contains("field `Bean::hits`"), "{debug}");
        assert!(debug.contains("ConstantRetriever"), "{debug}");
    }
}
