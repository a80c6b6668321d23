// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]

//! Tests deploying environments and injecting the bound references into components.

use std::sync::Arc;

use switchboard::inject::{BindingInjectionPoint, ConstantRetriever, InjectionCause, NamingError};
use switchboard::resolve::{ConflictReason, Error as ResolveError};
use switchboard::{
    ComponentRef, ConstantType, EncPopulator, EnvEntry, Error, InMemoryNamespace, InjectionProcessor, InjectionTarget, Injector,
    Namespace, PersistenceUnitRef, ResourceRef, SwitchBoardDeployer, SwitchBoardEnvironment, SwitchBoardMetadata,
    TargetDescriptor, Value,
};

#[test]
fn link_is_resolved_through_the_namespace_after_apply() {
    let namespace = Arc::new(InMemoryNamespace::new());
    namespace.bind("global:testBean", Value::new(String::from("Test Value")).into()).unwrap();

    let environment = SwitchBoardEnvironment::new().with_component_ref(ComponentRef::new("test").with_link("global:testBean"));
    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    let deployment = deployer.deploy(&(), Arc::clone(&namespace), [&environment]).unwrap().unwrap();
    let (mut operator, dependencies) = deployment.into_parts();

    let before = namespace.lookup("env/test").unwrap_err();
    assert!(matches!(before, NamingError::NotFound(ref name) if name == "env/test"));

    operator.apply().unwrap();

    let value = namespace.lookup("env/test").unwrap();
    assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("Test Value"));
    assert_eq!(dependencies, ["global:testBean"]);
}

#[test]
fn nothing_to_deploy_without_resolved_references() {
    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    let metadata = SwitchBoardMetadata::new(SwitchBoardEnvironment::new())
        .with_component("web", SwitchBoardEnvironment::new().with_env_entry(EnvEntry::new("unset", ConstantType::I32)));

    let deployment = deployer
        .deploy_metadata(&(), Arc::new(InMemoryNamespace::new()), &metadata)
        .unwrap();
    assert!(deployment.is_none());
}

#[test]
fn module_and_component_references_share_one_operator() {
    let module = SwitchBoardEnvironment::new()
        .with_env_entry(EnvEntry::new("retries", ConstantType::I32).with_value("3"))
        .with_resource_ref(ResourceRef::new("jdbc/Orders").with_lookup("global:jdbc/Orders"));
    let web = SwitchBoardEnvironment::new()
        .with_resource_ref(
            ResourceRef::new("jdbc/Orders")
                .with_lookup("global:jdbc/Orders")
                .with_description("orders database, as seen by the web tier"),
        )
        .with_persistence_unit_ref(PersistenceUnitRef::new("persistence/Orders").with_unit_name("global:pu/Orders"));
    let metadata = SwitchBoardMetadata::new(module).with_component("web", web);

    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    let deployment = deployer
        .deploy_metadata(&(), Arc::new(InMemoryNamespace::new()), &metadata)
        .unwrap()
        .unwrap();

    let points: Vec<String> = deployment.operator().injectors().iter().map(ToString::to_string).collect();
    assert_eq!(
        points,
        [
            "binding `env/retries`",
            "binding `env/jdbc/Orders`",
            "binding `env/persistence/Orders`",
        ]
    );
    assert_eq!(deployment.dependencies(), ["global:jdbc/Orders", "global:pu/Orders"]);
}

#[test]
fn conflicting_component_references_fail_the_deployment() {
    let metadata = SwitchBoardMetadata::new(SwitchBoardEnvironment::new().with_component_ref(ComponentRef::new("dao").with_link("global:a")))
        .with_component(
            "web",
            SwitchBoardEnvironment::new().with_component_ref(ComponentRef::new("dao").with_link("global:b")),
        );

    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    let error = deployer
        .deploy_metadata(&(), Arc::new(InMemoryNamespace::new()), &metadata)
        .unwrap_err();

    assert!(matches!(
        error,
        Error::Resolve(ResolveError::ConflictingReferences {
            reason: ConflictReason::NotEquivalent,
            ..
        })
    ));
}

#[test]
fn invalid_constant_literal_fails_the_deployment() {
    let environment = SwitchBoardEnvironment::new().with_env_entry(EnvEntry::new("enabled", ConstantType::Bool).with_value("maybe"));
    let deployer = SwitchBoardDeployer::<()>::with_defaults();

    let error = deployer
        .deploy(&(), Arc::new(InMemoryNamespace::new()), [&environment])
        .unwrap_err();
    assert!(matches!(error, Error::Resolve(ResolveError::ResolutionFailed { source: Some(_), .. })));
}

#[derive(Debug, Default)]
struct Frontend {
    retries: i32,
    orders: String,
}

impl Frontend {
    fn set_retries(&mut self, retries: i32) {
        self.retries = retries;
    }
}

#[test]
fn resolved_references_are_injected_into_components() {
    let environment = SwitchBoardEnvironment::new()
        .with_env_entry(
            EnvEntry::new("retries", ConstantType::I32)
                .with_value("7")
                .with_injection_target(InjectionTarget::new("Frontend", "retries")),
        )
        .with_resource_ref(
            ResourceRef::new("jdbc/Orders")
                .with_lookup("global:jdbc/Orders")
                .with_injection_target(InjectionTarget::new("Frontend", "orders"))
                .with_injection_target(InjectionTarget::new("Backend", "orders")),
        );

    let namespace = Arc::new(InMemoryNamespace::new());
    namespace
        .bind("global:jdbc/Orders", Value::new(String::from("orders-pool")).into())
        .unwrap();

    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    let (mut operator, _) = deployer
        .deploy(&(), Arc::clone(&namespace), [&environment])
        .unwrap()
        .unwrap()
        .into_parts();
    operator.apply().unwrap();

    let descriptor = TargetDescriptor::new("Frontend")
        .field("orders", |frontend: &mut Frontend| &mut frontend.orders)
        .setter("set_retries", Frontend::set_retries)
        .unwrap();
    let injectors = InjectionProcessor::new(Arc::clone(&namespace))
        .process_environment(&descriptor, &environment)
        .unwrap();
    assert_eq!(injectors.len(), 2);

    let mut frontend = Frontend::default();
    for injector in &injectors {
        injector.apply(&mut frontend).unwrap();
    }
    assert_eq!(frontend.retries, 7);
    assert_eq!(frontend.orders, "orders-pool");
}

#[test]
fn unknown_injection_target_member_is_rejected() {
    let environment = SwitchBoardEnvironment::new().with_component_ref(
        ComponentRef::new("cache")
            .with_link("global:cache")
            .with_injection_target(InjectionTarget::new("Frontend", "cache")),
    );
    let descriptor = TargetDescriptor::new("Frontend").field("orders", |frontend: &mut Frontend| &mut frontend.orders);

    let error = InjectionProcessor::new(Arc::new(InMemoryNamespace::new()))
        .process_environment(&descriptor, &environment)
        .unwrap_err();
    assert!(matches!(
        error,
        Error::Inject(switchboard::inject::Error::InvalidInjectionTarget { .. })
    ));
}

#[test]
fn injecting_before_the_namespace_is_populated_fails() {
    let environment = SwitchBoardEnvironment::new().with_env_entry(
        EnvEntry::new("retries", ConstantType::I32)
            .with_value("7")
            .with_injection_target(InjectionTarget::new("Frontend", "set_retries")),
    );
    let descriptor = TargetDescriptor::new("Frontend")
        .setter("set_retries", Frontend::set_retries)
        .unwrap();

    let injectors = InjectionProcessor::new(Arc::new(InMemoryNamespace::new()))
        .process_environment(&descriptor, &environment)
        .unwrap();

    let error = injectors[0].apply(&mut Frontend::default()).unwrap_err();
    assert!(matches!(error.cause(), Some(InjectionCause::LookupFailed { name, .. }) if name == "env/retries"));
}

#[test]
fn populator_binds_into_a_namespace_obtained_at_apply_time() {
    let namespace = Arc::new(InMemoryNamespace::new());
    let supplied = Arc::clone(&namespace);
    let populator = EncPopulator::new(
        move || Ok(Arc::clone(&supplied)),
        [Injector::new(
            BindingInjectionPoint::new("env/greeting").unwrap(),
            ConstantRetriever::new(Value::new("hello")),
        )],
    );

    populator.apply().unwrap();
    assert_eq!(namespace.lookup("env/greeting").unwrap().downcast_ref::<&str>(), Some(&"hello"));

    let error = populator.apply().unwrap_err();
    assert!(matches!(error.cause(), Some(InjectionCause::BindingFailed { .. })));
}

#[test]
fn identical_nan_constants_are_tolerated_duplicates() {
    let ratio = || EnvEntry::new("ratio", ConstantType::F64).with_value("NaN");
    let metadata = SwitchBoardMetadata::new(SwitchBoardEnvironment::new().with_env_entry(ratio()))
        .with_component("web", SwitchBoardEnvironment::new().with_env_entry(ratio()));

    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    let namespace = Arc::new(InMemoryNamespace::new());
    let (mut operator, _) = deployer
        .deploy_metadata(&(), Arc::clone(&namespace), &metadata)
        .unwrap()
        .unwrap()
        .into_parts();
    assert_eq!(operator.injectors().len(), 1);

    let first = deployer.processor().process(&(), metadata.environments()).unwrap();
    let second = deployer.processor().process(&(), metadata.environments()).unwrap();
    assert_eq!(first, second);

    operator.apply().unwrap();
    let value = namespace.lookup("env/ratio").unwrap();
    assert!(value.downcast_ref::<f64>().is_some_and(|ratio| ratio.is_nan()));
}

#[test]
fn members_of_unset_optional_entries_are_left_untouched() {
    let environment = SwitchBoardEnvironment::new().with_env_entry(
        EnvEntry::new("retries", ConstantType::I32).with_injection_target(InjectionTarget::new("Frontend", "retries")),
    );

    let namespace = Arc::new(InMemoryNamespace::new());
    let deployer = SwitchBoardDeployer::<()>::with_defaults();
    assert!(deployer.deploy(&(), Arc::clone(&namespace), [&environment]).unwrap().is_none());

    let descriptor = TargetDescriptor::new("Frontend").setter("set_retries", Frontend::set_retries).unwrap();
    let injectors = InjectionProcessor::new(Arc::clone(&namespace))
        .process_environment(&descriptor, &environment)
        .unwrap();
    assert_eq!(injectors.len(), 1);

    let mut frontend = Frontend {
        retries: 2,
        ..Frontend::default()
    };
    injectors[0].apply(&mut frontend).unwrap();
    assert_eq!(frontend.retries, 2);
}
