//! Proptest strategies for context maps and names.

use altwalker_executor::types::ContextMap;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Any JSON value without floats, nested up to three levels
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

pub fn context_map_strategy() -> impl Strategy<Value = ContextMap> {
    prop::collection::vec(("[a-z_]{1,8}", json_value_strategy()), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Identifier-like names, as the driver derives them from graph vertices and edges
pub fn step_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,24}"
}
