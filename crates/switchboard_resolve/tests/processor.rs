// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]

//! Tests for `EnvironmentProcessor`.

use std::io::Write;
use std::sync::{Arc, Mutex};

use switchboard_inject::Constant;
use switchboard_resolve::{
    BoxError, ConflictReason, Declaration, DuplicateReferenceValidator, EnvironmentProcessor, Error, Kind, ReferencePair,
    ResolverResult, ResultOnlyValidator, Visitor,
};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug)]
struct Context {
    global_prefix: &'static str,
}

const CONTEXT: Context = Context { global_prefix: "global:" };

#[derive(Debug, Clone, PartialEq)]
struct BeanRef {
    name: &'static str,
    bean: &'static str,
    description: &'static str,
    optional: bool,
}

impl BeanRef {
    fn new(name: &'static str, bean: &'static str) -> Self {
        Self {
            name,
            bean,
            description: "",
            optional: false,
        }
    }
}

impl Declaration for BeanRef {
    const KIND: Kind = Kind::new("bean-ref");

    fn ref_name(&self) -> &str {
        self.name
    }

    fn is_optional(&self) -> bool {
        self.optional
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self.bean == other.bean && self.description == other.description
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ValueEntry {
    name: &'static str,
    value: i32,
}

impl Declaration for ValueEntry {
    const KIND: Kind = Kind::new("value-entry");

    fn ref_name(&self) -> &str {
        self.name
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self == other
    }
}

#[derive(Debug, Default)]
struct Env {
    beans: Vec<BeanRef>,
    values: Vec<ValueEntry>,
}

struct Beans;

impl Visitor<Env, BeanRef> for Beans {
    fn declarations<'e>(&self, environment: &'e Env) -> Option<&'e [BeanRef]> {
        Some(&environment.beans)
    }
}

struct Values;

impl Visitor<Env, ValueEntry> for Values {
    fn declarations<'e>(&self, environment: &'e Env) -> Option<&'e [ValueEntry]> {
        (!environment.values.is_empty()).then_some(environment.values.as_slice())
    }
}

fn resolve_bean(context: &Context, bean: &BeanRef) -> Result<Option<ResolverResult>, BoxError> {
    match bean.bean {
        "" => Ok(None),
        "broken" => Err("bean `broken` cannot be located".into()),
        target => Ok(Some(
            ResolverResult::link(format!("env/{}", bean.name), format!("{}{target}", context.global_prefix)).with_dependency(target),
        )),
    }
}

fn resolve_value(_: &Context, entry: &ValueEntry) -> Result<Option<ResolverResult>, BoxError> {
    Ok(Some(ResolverResult::constant(format!("env/{}", entry.name), Constant::I32(entry.value))))
}

fn processor() -> EnvironmentProcessor<Context, Env> {
    let mut processor = EnvironmentProcessor::new();
    processor
        .add_visitor(Beans)
        .add_visitor(Values)
        .add_resolver(resolve_bean)
        .add_resolver(resolve_value);
    processor
}

fn names(results: &[ResolverResult]) -> Vec<&str> {
    results.iter().map(ResolverResult::ref_name).collect()
}

#[test]
fn resolution_is_idempotent() {
    let processor = processor();
    let env = Env {
        beans: vec![BeanRef::new("a", "beanA")],
        values: vec![ValueEntry { name: "n", value: 1 }],
    };

    let first = processor.process(&CONTEXT, [&env]).unwrap();
    let second = processor.process(&CONTEXT, [&env]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0], ResolverResult::link("env/a", "global:beanA").with_dependency("beanA"));
}

#[test]
fn order_follows_environments_then_kinds_then_declarations() {
    let processor = processor();
    let module = Env {
        beans: vec![BeanRef::new("b2", "x"), BeanRef::new("b1", "y")],
        values: vec![ValueEntry { name: "v1", value: 1 }],
    };
    let component = Env {
        beans: vec![BeanRef::new("b3", "z")],
        values: vec![ValueEntry { name: "v2", value: 2 }],
    };

    let results = processor.process(&CONTEXT, [&module, &component]).unwrap();
    assert_eq!(names(&results), ["env/b2", "env/b1", "env/v1", "env/b3", "env/v2"]);
}

#[test]
fn equivalent_duplicates_are_kept_once() {
    let processor = processor();
    let module = Env {
        beans: vec![BeanRef::new("shared", "bean")],
        ..Env::default()
    };
    let component = Env {
        beans: vec![BeanRef::new("other", "bean2"), BeanRef::new("shared", "bean")],
        ..Env::default()
    };

    let results = processor.process(&CONTEXT, [&module, &component]).unwrap();
    assert_eq!(names(&results), ["env/shared", "env/other"]);
}

#[test]
fn differing_results_conflict() {
    let processor = processor();
    let module = Env {
        beans: vec![BeanRef::new("shared", "first")],
        ..Env::default()
    };
    let component = Env {
        beans: vec![BeanRef::new("shared", "second")],
        ..Env::default()
    };

    let error = processor.process(&CONTEXT, [&module, &component]).unwrap_err();
    let Error::ConflictingReferences {
        ref_name,
        previous,
        new,
        reason,
    } = error
    else {
        panic!("expected a conflict");
    };
    assert_eq!(ref_name, "env/shared");
    assert!(previous.contains("first"), "{previous}");
    assert!(new.contains("second"), "{new}");
    assert_eq!(reason, ConflictReason::NotEquivalent);
}

#[test]
fn incompatible_declarations_with_equal_results_conflict() {
    let processor = processor();
    let mut described = BeanRef::new("shared", "bean");
    described.description = "the primary bean";
    let env = Env {
        beans: vec![BeanRef::new("shared", "bean"), described],
        ..Env::default()
    };

    let error = processor.process(&CONTEXT, [&env]).unwrap_err();
    assert!(matches!(
        error,
        Error::ConflictingReferences {
            reason: ConflictReason::NotEquivalent,
            ..
        }
    ));
}

#[test]
fn registered_validator_arbitrates() {
    let mut processor = processor();
    processor.add_duplicate_validator::<BeanRef, _>(ResultOnlyValidator);

    let mut described = BeanRef::new("shared", "bean");
    described.description = "the primary bean";
    let env = Env {
        beans: vec![BeanRef::new("shared", "bean"), described],
        ..Env::default()
    };

    let results = processor.process(&CONTEXT, [&env]).unwrap();
    assert_eq!(names(&results), ["env/shared"]);
}

struct RejectAll;

impl DuplicateReferenceValidator<BeanRef> for RejectAll {
    fn is_valid(&self, _: ReferencePair<'_, BeanRef>, _: ReferencePair<'_, BeanRef>) -> bool {
        false
    }
}

#[test]
fn validator_can_reject_identical_declarations() {
    let mut processor = processor();
    processor.add_duplicate_validator(RejectAll);

    let env = Env {
        beans: vec![BeanRef::new("shared", "bean"), BeanRef::new("shared", "bean")],
        ..Env::default()
    };

    assert!(matches!(
        processor.process(&CONTEXT, [&env]),
        Err(Error::ConflictingReferences { .. })
    ));
}

#[test]
fn different_kinds_on_one_name_conflict() {
    let processor = processor();
    let env = Env {
        beans: vec![BeanRef::new("x", "bean")],
        values: vec![ValueEntry { name: "x", value: 3 }],
    };

    let error = processor.process(&CONTEXT, [&env]).unwrap_err();
    let Error::ConflictingReferences { ref_name, reason, .. } = error else {
        panic!("expected a conflict");
    };
    assert_eq!(ref_name, "env/x");
    assert_eq!(
        reason,
        ConflictReason::KindMismatch {
            previous: BeanRef::KIND,
            new: ValueEntry::KIND,
        }
    );
}

#[test]
fn missing_resolver_fails_by_default() {
    let mut processor = EnvironmentProcessor::<Context, Env>::new();
    processor.add_visitor(Beans).add_visitor(Values).add_resolver(resolve_bean);

    let env = Env {
        beans: vec![BeanRef::new("a", "beanA")],
        values: vec![ValueEntry { name: "n", value: 1 }],
    };

    let error = processor.process(&CONTEXT, [&env]).unwrap_err();
    let Error::NoResolverFound { kind, declaration } = error else {
        panic!("expected a missing resolver");
    };
    assert_eq!(kind, ValueEntry::KIND);
    assert!(declaration.contains("ValueEntry"), "{declaration}");
}

#[test]
fn missing_resolver_is_skipped_and_logged_when_allowed() {
    let mut processor = EnvironmentProcessor::<Context, Env>::new().allow_missing_resolver(true);
    processor.add_visitor(Beans).add_visitor(Values).add_resolver(resolve_bean);

    let env = Env {
        beans: vec![BeanRef::new("a", "beanA")],
        values: vec![ValueEntry { name: "n", value: 1 }],
    };

    let capture = LogCapture::new();
    let results = tracing::subscriber::with_default(capture.subscriber(), || processor.process(&CONTEXT, [&env])).unwrap();

    assert_eq!(names(&results), ["env/a"]);
    capture.assert_contains("WARN");
    capture.assert_contains("skipping declaration without a registered resolver");
    capture.assert_contains("declaration.kind=value-entry");
    capture.assert_contains("declaration.ref_name=\"n\"");
}

#[test]
fn failing_resolver_is_reported_with_its_cause() {
    let processor = processor();
    let env = Env {
        beans: vec![BeanRef::new("a", "broken")],
        ..Env::default()
    };

    let error = processor.process(&CONTEXT, [&env]).unwrap_err();
    let Error::ResolutionFailed { kind, source, .. } = error else {
        panic!("expected a resolution failure");
    };
    assert_eq!(kind, BeanRef::KIND);
    assert_eq!(source.map(|s| s.to_string()).as_deref(), Some("bean `broken` cannot be located"));
}

#[test]
fn unresolved_mandatory_declaration_fails() {
    let processor = processor();
    let env = Env {
        beans: vec![BeanRef::new("a", "")],
        ..Env::default()
    };

    assert!(matches!(
        processor.process(&CONTEXT, [&env]),
        Err(Error::ResolutionFailed { source: None, .. })
    ));
}

#[test]
fn unresolved_optional_declaration_is_skipped() {
    let processor = processor();
    let mut optional = BeanRef::new("a", "");
    optional.optional = true;
    let env = Env {
        beans: vec![optional, BeanRef::new("b", "beanB")],
        ..Env::default()
    };

    let results = processor.process(&CONTEXT, [&env]).unwrap();
    assert_eq!(names(&results), ["env/b"]);
}

/// Captures formatted log output in memory.
#[derive(Debug, Clone, Default)]
struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    fn new() -> Self {
        Self::default()
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).to_string()
    }

    fn assert_contains(&self, expected: &str) {
        let output = self.output();
        assert!(
            output.contains(expected),
            "log output does not contain '{expected}', got:\n{output}"
        );
    }

    fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        use tracing_subscriber::layer::SubscriberExt;
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_writer(self.clone()).with_ansi(false))
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
