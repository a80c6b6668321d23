// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use tracing::Level;

use crate::{Error, Injector, NamingError, Result};

/// Applies a list of injectors against one namespace.
///
/// The operator is built once per deployment and triggered once with [`apply`][Self::apply].
/// It performs no synchronization of its own and does not guard against being applied twice; a
/// second application typically fails because the names are already bound.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use switchboard_inject::{
///     BindingInjectionPoint, ConstantRetriever, InMemoryNamespace, Injector, LinkRetriever, Namespace,
///     SwitchBoardOperator, Value,
/// };
///
/// let namespace = Arc::new(InMemoryNamespace::new());
/// let injectors = vec![
///     Injector::new(BindingInjectionPoint::new("env/test")?, LinkRetriever::new("global:testBean")),
///     Injector::new(BindingInjectionPoint::new("global:testBean")?, ConstantRetriever::new(Value::new("Test Value"))),
/// ];
///
/// let mut operator = SwitchBoardOperator::new(Arc::clone(&namespace), injectors);
/// operator.apply()?;
///
/// assert_eq!(namespace.lookup("env/test")?.downcast_ref::<&str>(), Some(&"Test Value"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SwitchBoardOperator<N> {
    namespace: N,
    injectors: Vec<Injector<N>>,
}

impl<N> SwitchBoardOperator<N> {
    /// Creates an operator applying `injectors` in order against `namespace`.
    pub fn new(namespace: N, injectors: impl IntoIterator<Item = Injector<N>>) -> Self {
        Self {
            namespace,
            injectors: injectors.into_iter().collect(),
        }
    }

    /// Applies every injector in order.
    ///
    /// # Errors
    ///
    /// Returns the first injection failure. Injectors applied before the failure are not rolled
    /// back and the remaining ones are not applied.
    pub fn apply(&mut self) -> Result<()> {
        apply_all(&self.injectors, &mut self.namespace)
    }

    /// The namespace the operator populates.
    #[must_use]
    pub fn namespace(&self) -> &N {
        &self.namespace
    }

    /// The injectors in application order.
    #[must_use]
    pub fn injectors(&self) -> &[Injector<N>] {
        &self.injectors
    }
}

impl<N> fmt::Debug for SwitchBoardOperator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchBoardOperator")
            .field("injectors", &self.injectors)
            .finish_non_exhaustive()
    }
}

type Supplier<N> = Box<dyn Fn() -> std::result::Result<N, NamingError> + Send + Sync>;

/// Populates a component namespace that is obtained only when the populator is applied.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use switchboard_inject::{BindingInjectionPoint, ConstantRetriever, EncPopulator, InMemoryNamespace, Injector, Namespace, Value};
///
/// let namespace = Arc::new(InMemoryNamespace::new());
/// let supplied = Arc::clone(&namespace);
/// let populator = EncPopulator::new(
///     move || Ok(Arc::clone(&supplied)),
///     vec![Injector::new(BindingInjectionPoint::new("env/retries")?, ConstantRetriever::new(Value::new(3_u32)))],
/// );
///
/// populator.apply()?;
/// assert_eq!(namespace.lookup("env/retries")?.downcast_ref::<u32>(), Some(&3));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EncPopulator<N> {
    supplier: Supplier<N>,
    injectors: Vec<Injector<N>>,
}

impl<N> EncPopulator<N> {
    /// Creates a populator obtaining its namespace from `supplier`.
    pub fn new<F>(supplier: F, injectors: impl IntoIterator<Item = Injector<N>>) -> Self
    where
        F: Fn() -> std::result::Result<N, NamingError> + Send + Sync + 'static,
    {
        Self {
            supplier: Box::new(supplier),
            injectors: injectors.into_iter().collect(),
        }
    }

    /// Obtains the namespace and applies every injector in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceUnavailable`] if the namespace cannot be obtained, or the first
    /// injection failure.
    pub fn apply(&self) -> Result<()> {
        let mut namespace = (self.supplier)().map_err(Error::NamespaceUnavailable)?;
        apply_all(&self.injectors, &mut namespace)
    }

    /// The injectors in application order.
    #[must_use]
    pub fn injectors(&self) -> &[Injector<N>] {
        &self.injectors
    }
}

impl<N> fmt::Debug for EncPopulator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncPopulator")
            .field("injectors", &self.injectors)
            .finish_non_exhaustive()
    }
}

fn apply_all<N>(injectors: &[Injector<N>], namespace: &mut N) -> Result<()> {
    for injector in injectors {
        if let Err(error) = injector.apply(namespace) {
            tracing::event!(
                name: "switchboard.inject.failed",
                Level::DEBUG,
                injection.point = %injector,
                error = %error,
            );
            return Err(error);
        }
    }

    tracing::event!(
        name: "switchboard.inject.applied",
        Level::DEBUG,
        injection.count = injectors.len(),
    );
    Ok(())
}
