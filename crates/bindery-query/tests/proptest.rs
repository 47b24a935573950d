//! Property-based tests for query evaluation.

use bindery_query::{search, Query};
use proptest::prelude::*;
use serde_json::{json, Value};

fn items(names: &[String]) -> Value {
    Value::Array(names.iter().map(|n| json!({ "name": n })).collect())
}

proptest! {
    #[test]
    fn identity_returns_input(values in prop::collection::vec(any::<i64>(), 0..20)) {
        let data = json!(values);
        prop_assert_eq!(search("@", &data).unwrap(), data);
    }

    #[test]
    fn index_matches_vec_index(names in prop::collection::vec("[a-z]{1,8}", 1..10), idx in 0usize..10) {
        let data = items(&names);
        let expected = names.get(idx).map(|n| json!({ "name": n })).unwrap_or(Value::Null);
        prop_assert_eq!(search(&format!("[{}]", idx), &data).unwrap(), expected);
    }

    #[test]
    fn projection_preserves_order(names in prop::collection::vec("[a-z]{1,8}", 0..10)) {
        let data = items(&names);
        prop_assert_eq!(search("[*].name", &data).unwrap(), json!(names));
    }

    #[test]
    fn filter_never_grows(values in prop::collection::vec(-100i64..100, 0..30), limit in -100i64..100) {
        let data = Value::Array(values.iter().map(|v| json!({ "v": v })).collect());
        let query = Query::compile(&format!("[?v > `{}`]", limit)).unwrap();
        let kept = query.search(&data).unwrap();
        let expected = values.iter().filter(|v| **v > limit).count();
        prop_assert_eq!(kept.as_array().map(Vec::len), Some(expected));
    }

    #[test]
    fn length_matches_len(values in prop::collection::vec(any::<bool>(), 0..20)) {
        prop_assert_eq!(search("length(@)", &json!(values)).unwrap(), json!(values.len()));
    }

    #[test]
    fn compile_never_panics(expr in "[a-z\\[\\]\\.\\*\\?@|&!=<>0-9 '`]{0,16}") {
        let _ = Query::compile(&expr);
    }
}
