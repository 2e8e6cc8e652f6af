//! Fixture models covering every resolution and fault path.

use altwalker_executor::registry::{MethodTable, Model};
use altwalker_executor::types::ContextMap;
use anyhow::{anyhow, bail};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const INITIAL_BALANCE: i64 = 1000;

/// Counts invocations of handlers that must never run
pub static FORBIDDEN_CALLS: AtomicUsize = AtomicUsize::new(0);

fn forbidden() {
    FORBIDDEN_CALLS.fetch_add(1, Ordering::SeqCst);
}

/// Balance-carrying model
#[derive(Debug)]
pub struct Account {
    balance: i64,
}

impl Model for Account {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self {
            balance: INITIAL_BALANCE,
        })
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .step_with_context("spend", |account: &mut Account, data: &mut ContextMap| {
                let cost = data.get("cost").and_then(Value::as_i64).unwrap_or(1);
                account.balance -= cost;
                data.insert("amount".to_string(), json!(account.balance));
                tracing::info!(cost, "spent");
            })
            .step_with_context("report", |account: &mut Account, data: &mut ContextMap| {
                data.insert("amount".to_string(), json!(account.balance));
            })
            .step("balance", |account: &mut Account| {
                Ok::<_, anyhow::Error>(account.balance)
            });
    }
}

/// Output and fault behaviours
pub struct Diagnostics;

impl Model for Diagnostics {
    fn construct() -> anyhow::Result<Self> {
        Ok(Diagnostics)
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .step("quiet", |_: &mut Diagnostics| ())
            .step("chatty", |_: &mut Diagnostics| tracing::info!("Output"))
            .step("fail", |_: &mut Diagnostics| -> anyhow::Result<()> {
                tracing::info!("Fail");
                Err(anyhow!("Exception message"))
            })
            .step("explode", |_: &mut Diagnostics| -> anyhow::Result<()> {
                tracing::warn!("about to explode");
                panic!("handler exploded")
            })
            .step("answer", |_: &mut Diagnostics| json!({"answer": 42}))
            .step("nothing", |_: &mut Diagnostics| Value::Null)
            .step_with_context("echo", |_: &mut Diagnostics, _: &mut ContextMap| ())
            .step_with_context(
                "mark_then_fail",
                |_: &mut Diagnostics, data: &mut ContextMap| -> anyhow::Result<()> {
                    data.insert("marked".to_string(), json!(true));
                    bail!("failed after marking")
                },
            );
    }
}

/// Overloaded step names
pub struct Overloads;

impl Model for Overloads {
    fn construct() -> anyhow::Result<Self> {
        Ok(Overloads)
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .step("go", |_: &mut Overloads| forbidden())
            .step_with_context("go", |_: &mut Overloads, _: &mut ContextMap| forbidden())
            .method::<(String,)>("mixed")
            .step("mixed", |_: &mut Overloads| forbidden())
            .step("single", |_: &mut Overloads| ());
    }
}

/// Members whose parameters the engine cannot supply
pub struct Incompatible;

impl Model for Incompatible {
    fn construct() -> anyhow::Result<Self> {
        Ok(Incompatible)
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .method::<(String,)>("takes_name")
            .method::<(ContextMap, i32)>("takes_two")
            .step("fine", |_: &mut Incompatible| ());
    }
}

/// Declares steps but no constructor
pub struct Unconstructible;

impl Model for Unconstructible {
    fn methods(table: &mut MethodTable<Self>) {
        table.step("anything", |_: &mut Unconstructible| forbidden());
    }
}

/// Run-level hooks
#[derive(Default)]
pub struct RunSetup {
    runs: u32,
}

impl Model for RunSetup {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self::default())
    }

    fn methods(table: &mut MethodTable<Self>) {
        table.step("setUpRun", |setup: &mut RunSetup| {
            setup.runs += 1;
            Ok::<_, anyhow::Error>(setup.runs)
        });
    }
}
