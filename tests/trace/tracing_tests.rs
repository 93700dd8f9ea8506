//! Trace Line Tests
//!
//! End-to-end checks on the lines the tracer emits through the sink
//! manager: pairing, indentation, failure handling, per-thread files.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use chat_bot::shared::error::AppError;
use chat_bot::trace::{CallArgs, CallTarget, Value};

use crate::common::{indent_of, TraceHarness};

/// The documented example: greet("Sal") leaves two lines at equal depth and
/// the return value untouched.
#[test]
fn test_greet_emits_paired_step_lines() {
    let harness = TraceHarness::new();
    let greet = harness.tracer.wrap(
        CallTarget::function("greet", |args| {
            let name = args.str_at(0).unwrap_or("");
            Ok(Value::Str(format!("hi {}", name)))
        })
        .with_doc("Greet a user by name."),
    );

    let ret = greet.invoke(&CallArgs::new().arg("Sal")).unwrap();
    assert_eq!(ret, Value::Str("hi Sal".into()));

    let messages = harness.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].trim_start(), "-> greet(args=('Sal',))");
    assert_eq!(messages[1].trim_start(), "<- greet() ==> hi Sal");
    assert_eq!(indent_of(&messages[0]), indent_of(&messages[1]));
}

/// Nested traced calls: four lines, the inner pair exactly one indent level
/// deeper than the outer pair.
#[test]
fn test_nested_call_indents_one_level_deeper() {
    let harness = TraceHarness::new();
    let inner = harness
        .tracer
        .wrap(CallTarget::function("inner", |_| Ok(Value::Int(7))));
    let inner_proxy = Arc::clone(&inner);
    let outer = harness.tracer.wrap(CallTarget::function("outer", move |_| {
        inner_proxy.invoke(&CallArgs::new())
    }));

    outer.invoke(&CallArgs::new()).unwrap();

    let messages = harness.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].trim_start(), "-> outer()");
    assert_eq!(messages[1].trim_start(), "-> inner()");
    assert_eq!(messages[2].trim_start(), "<- inner() ==> 7");
    assert_eq!(messages[3].trim_start(), "<- outer() ==> 7");

    let outer_indent = indent_of(&messages[0]);
    let inner_indent = indent_of(&messages[1]);
    assert_eq!(inner_indent, outer_indent + 3);
    assert_eq!(indent_of(&messages[2]), inner_indent);
    assert_eq!(indent_of(&messages[3]), outer_indent);
}

/// A failing wrapped call restores the depth counter, writes no step-out
/// line, and propagates the failure unchanged.
#[test]
fn test_failure_restores_depth_and_skips_step_out() {
    let harness = TraceHarness::new();
    let boom = harness.tracer.wrap(CallTarget::function("boom", |_| {
        Err(AppError::WrappedCall("boom".into()))
    }));

    let before = harness.sinks.current_depth();
    let err = boom.invoke(&CallArgs::new()).unwrap_err();
    assert!(matches!(err, AppError::WrappedCall(_)));
    assert_eq!(harness.sinks.current_depth(), before);

    let messages = harness.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].trim_start(), "-> boom()");
}

/// A failing inner call keeps the outer pair balanced.
#[test]
fn test_outer_call_survives_inner_failure() {
    let harness = TraceHarness::new();
    let inner = harness.tracer.wrap(CallTarget::function("fragile", |_| {
        Err(AppError::WrappedCall("fragile".into()))
    }));
    let inner_proxy = Arc::clone(&inner);
    let outer = harness.tracer.wrap(CallTarget::function("sturdy", move |_| {
        // Swallow the inner failure and report a fallback.
        match inner_proxy.invoke(&CallArgs::new()) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::Str("fallback".into())),
        }
    }));

    let ret = outer.invoke(&CallArgs::new()).unwrap();
    assert_eq!(ret, Value::Str("fallback".into()));
    assert_eq!(harness.sinks.current_depth(), 0);

    let messages = harness.messages();
    // sturdy in, fragile in (no out), sturdy out.
    assert_eq!(messages.len(), 3);
    assert_eq!(indent_of(&messages[0]), indent_of(&messages[2]));
}

/// Each thread gets its own log file holding only its own lines; the shared
/// file sees everything.
#[test]
fn test_per_thread_sink_receives_only_its_thread() {
    let harness = Arc::new(TraceHarness::new());

    let main_ping = harness
        .tracer
        .wrap(CallTarget::function("main_ping", |_| Ok(Value::None)));
    main_ping.invoke(&CallArgs::new()).unwrap();

    let worker_harness = Arc::clone(&harness);
    std::thread::Builder::new()
        .name("worker-1".into())
        .spawn(move || {
            let worker_ping = worker_harness
                .tracer
                .wrap(CallTarget::function("worker_ping", |_| Ok(Value::None)));
            worker_ping.invoke(&CallArgs::new()).unwrap();
        })
        .unwrap()
        .join()
        .unwrap();

    let shared = harness.all_log_lines().join("\n");
    assert!(shared.contains("main_ping"));
    assert!(shared.contains("worker_ping"));

    let worker_lines = harness.thread_log_lines("worker-1").join("\n");
    assert!(worker_lines.contains("worker_ping"));
    assert!(!worker_lines.contains("main_ping"));
}

/// Return values longer than the file cap are truncated at write time only;
/// the caller still receives the full value.
#[test]
fn test_long_return_value_truncated_in_sink_not_in_result() {
    let harness = TraceHarness::new();
    let long = "x".repeat(2000);
    let expected = long.clone();
    let wide = harness.tracer.wrap(CallTarget::function("wide", move |_| {
        Ok(Value::Str(long.clone()))
    }));

    let ret = wide.invoke(&CallArgs::new()).unwrap();
    assert_eq!(ret, Value::Str(expected));

    let messages = harness.messages();
    let step_out = messages.last().unwrap().trim_start();
    assert!(step_out.len() <= 1024);
    assert!(step_out.starts_with("<- wide() ==> xxx"));
}
