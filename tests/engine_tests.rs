//! Engine behaviour as seen by the driver: lookup, classification, invocation, faults and
//! instance lifetime.

mod common;

use altwalker_executor::error::{ErrorKind, HandlerDefect};
use altwalker_executor::types::ContextMap;
use altwalker_executor::ExecutorError;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::models::{Account, FORBIDDEN_CALLS, INITIAL_BALANCE};

fn context(value: serde_json::Value) -> ContextMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

// =============================================================================
// hasModel / hasStep
// =============================================================================

#[test]
fn test_has_model_matches_registered_names() {
    let engine = common::engine();
    assert!(engine.has_model(Some("Account")));
    assert!(engine.has_model(Some("Diagnostics")));
    assert!(!engine.has_model(Some("account")));
    assert!(!engine.has_model(Some("Missing")));
}

#[test]
fn test_has_model_for_setup_depends_on_registration() {
    let with_setup = common::engine();
    assert!(with_setup.has_model(None));
    assert!(with_setup.has_model(Some("")));
    assert!(with_setup.has_model(Some("Setup")));

    let without_setup = common::engine_without_setup();
    assert!(!without_setup.has_model(None));
    assert!(!without_setup.has_model(Some("")));
}

#[test]
fn test_has_step_requires_single_supported_handler() {
    let engine = common::engine();
    assert!(engine.has_step(Some("Diagnostics"), "quiet"));
    assert!(engine.has_step(Some("Account"), "spend"));
    assert!(engine.has_step(None, "setUpRun"));

    assert!(!engine.has_step(Some("Diagnostics"), "missing"));
    assert!(!engine.has_step(Some("Missing"), "quiet"));
    assert!(!engine.has_step(Some("Overloads"), "go"));
    assert!(!engine.has_step(Some("Incompatible"), "takes_name"));
    assert!(!engine.has_step(Some("Incompatible"), "takes_two"));
    assert!(engine.has_step(Some("Incompatible"), "fine"));
}

#[test]
fn test_has_step_on_setup_without_setup_registered() {
    let engine = common::engine_without_setup();
    assert!(!engine.has_step(None, "setUpRun"));
}

// =============================================================================
// executeStep: results and output
// =============================================================================

#[test]
fn test_no_output_when_nothing_logged() {
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "quiet", None)
        .unwrap();
    assert_eq!(result.output, "");
    assert!(result.data.is_none());
    assert!(result.result.is_none());
    assert!(result.error.is_none());
}

#[test]
fn test_logged_output_is_returned() {
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "chatty", None)
        .unwrap();
    assert_eq!(result.output, "Output\n");
}

#[test]
fn test_return_values_are_reported() {
    let engine = common::engine();

    let result = engine.execute_step(Some("Diagnostics"), "answer", None).unwrap();
    assert_eq!(result.result, Some(json!({"answer": 42})));

    let result = engine.execute_step(Some("Diagnostics"), "nothing", None).unwrap();
    assert!(result.result.is_none());

    let result = engine.execute_step(Some("Account"), "balance", None).unwrap();
    assert_eq!(result.result, Some(json!(INITIAL_BALANCE)));
}

#[test]
fn test_zero_parameter_handler_never_returns_data() {
    let data = context(json!({"kept": "aside"}));
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "quiet", Some(data))
        .unwrap();
    assert!(result.data.is_none());
}

#[test]
fn test_context_handler_returns_input_map() {
    let data = context(json!({"name": "walker", "nested": {"list": [1, 2, 3]}, "flag": null}));
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "echo", Some(data.clone()))
        .unwrap();
    assert_eq!(result.data, Some(data));
}

#[test]
fn test_context_handler_without_data_gets_empty_map() {
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "echo", None)
        .unwrap();
    assert_eq!(result.data, Some(ContextMap::new()));
}

#[test]
fn test_setup_steps_resolve_through_null_and_empty_names() {
    let engine = common::engine();
    let first = engine.execute_step(None, "setUpRun", None).unwrap();
    let second = engine.execute_step(Some(""), "setUpRun", None).unwrap();
    let third = engine.execute_step(Some("Setup"), "setUpRun", None).unwrap();

    assert_eq!(first.result, Some(json!(1)));
    assert_eq!(second.result, Some(json!(2)));
    assert_eq!(third.result, Some(json!(3)));
}

// =============================================================================
// executeStep: handler faults
// =============================================================================

#[test]
fn test_handler_error_is_folded_into_result() {
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "fail", None)
        .unwrap();

    let error = result.error.expect("fault is reported");
    assert_eq!(error.message, "Exception message");
    assert!(error.trace.contains("Exception message"));
    assert!(result.result.is_none());
    assert_eq!(result.output, "Fail\n");
}

#[test]
fn test_handler_panic_is_folded_into_result() {
    let engine = common::engine();
    let result = engine
        .execute_step(Some("Diagnostics"), "explode", None)
        .unwrap();

    let error = result.error.expect("panic is reported");
    assert_eq!(error.message, "handler exploded");
    assert!(error.trace.contains("Diagnostics.explode"));
    assert!(result.result.is_none());
    assert_eq!(result.output, "about to explode\n");

    // The engine keeps serving after a panic
    let result = engine.execute_step(Some("Diagnostics"), "chatty", None).unwrap();
    assert_eq!(result.output, "Output\n");
}

#[test]
fn test_faulting_context_handler_still_returns_data() {
    let result = common::engine()
        .execute_step(Some("Diagnostics"), "mark_then_fail", Some(ContextMap::new()))
        .unwrap();

    assert_eq!(result.error.unwrap().message, "failed after marking");
    assert_eq!(result.data, Some(context(json!({"marked": true}))));
}

// =============================================================================
// executeStep: resolution failures
// =============================================================================

#[test]
fn test_missing_step_names_step_and_model() {
    let engine = common::engine();
    assert!(!engine.has_step(Some("Account"), "withdraw_all"));

    let err = engine
        .execute_step(Some("Account"), "withdraw_all", None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StepNotFound);
    let message = err.to_string();
    assert!(message.contains("withdraw_all"));
    assert!(message.contains("Account"));
}

#[test]
fn test_missing_model() {
    let err = common::engine()
        .execute_step(Some("Ghost"), "boo", None)
        .unwrap_err();
    assert_eq!(err, ExecutorError::model_not_found("Ghost"));
}

#[test]
fn test_null_model_without_setup_references_setup() {
    let engine = common::engine_without_setup();
    for name in [None, Some("")] {
        let err = engine.execute_step(name, "setUpRun", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelNotFound);
        assert!(err.to_string().contains("Setup"));
    }
}

#[test]
fn test_overloads_are_invalid_and_never_invoked() {
    let engine = common::engine();
    let before = FORBIDDEN_CALLS.load(Ordering::SeqCst);

    for step in ["go", "mixed"] {
        let err = engine
            .execute_step(Some("Overloads"), step, Some(ContextMap::new()))
            .unwrap_err();
        assert_eq!(
            err,
            ExecutorError::invalid_handler("Overloads", step, HandlerDefect::MultipleHandlers)
        );
    }

    assert_eq!(FORBIDDEN_CALLS.load(Ordering::SeqCst), before);
    assert!(engine.execute_step(Some("Overloads"), "single", None).is_ok());
}

#[test]
fn test_unsupported_parameters_are_invalid_handlers() {
    let engine = common::engine();
    for step in ["takes_name", "takes_two"] {
        let err = engine
            .execute_step(Some("Incompatible"), step, None)
            .unwrap_err();
        assert_eq!(
            err,
            ExecutorError::invalid_handler("Incompatible", step, HandlerDefect::InvalidHandler)
        );
        assert!(err.to_string().starts_with("InvalidHandler for"));
    }
}

#[test]
fn test_missing_constructor_is_a_construction_fault() {
    let engine = common::engine();
    let before = FORBIDDEN_CALLS.load(Ordering::SeqCst);

    let err = engine
        .execute_step(Some("Unconstructible"), "anything", None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstructionFault);
    assert!(err.to_string().contains("Unconstructible"));
    assert_eq!(FORBIDDEN_CALLS.load(Ordering::SeqCst), before);

    // Still a known, well-formed step
    assert!(engine.has_step(Some("Unconstructible"), "anything"));
}

// =============================================================================
// Instance lifetime
// =============================================================================

#[test]
fn test_wallet_scenario_resets_to_initial_balance() {
    let engine = common::engine();

    let spent = engine
        .execute_step(Some("Account"), "spend", Some(context(json!({"cost": 250}))))
        .unwrap();
    let amount = spent.data.unwrap()["amount"].as_i64().unwrap();
    assert!(amount < INITIAL_BALANCE);
    assert_eq!(spent.output, "spent cost=250\n");

    let reported = engine
        .execute_step(Some("Account"), "report", None)
        .unwrap();
    assert_eq!(reported.data.unwrap()["amount"], json!(amount));

    engine.reset();
    assert!(!engine.instances().contains::<Account>());

    let reported = engine
        .execute_step(Some("Account"), "report", None)
        .unwrap();
    assert_eq!(reported.data.unwrap()["amount"], json!(INITIAL_BALANCE));
}

#[test]
fn test_reset_keeps_registrations() {
    let engine = common::engine();
    engine.execute_step(Some("Account"), "balance", None).unwrap();
    engine.reset();

    assert!(engine.instances().is_empty());
    assert!(engine.has_model(Some("Account")));
    assert!(engine.has_step(Some("Account"), "balance"));
}

#[test]
fn test_concurrent_executions_are_serialized() {
    let engine = Arc::new(common::engine());

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    let result = engine
                        .execute_step(Some("Account"), "spend", Some(context(json!({"cost": 1}))))
                        .unwrap();
                    assert_eq!(result.output, "spent cost=1\n");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let result = engine.execute_step(Some("Account"), "balance", None).unwrap();
    assert_eq!(result.result, Some(json!(INITIAL_BALANCE - 200)));
}
