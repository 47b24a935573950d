//! End-to-end expression tests against realistic command output.

use bindery_query::{search, Query, QueryError};
use serde_json::{json, Value};

fn repos() -> Value {
    json!([
        {"name": "bindery", "stars": 120, "topics": ["cli", "rust"], "archived": false,
         "owner": {"login": "ada"}},
        {"name": "legacy", "stars": 4, "topics": [], "archived": true,
         "owner": {"login": "bob"}},
        {"name": "query", "stars": 37, "topics": ["json"], "archived": false,
         "owner": {"login": "ada"}}
    ])
}

#[test]
fn index_selects_first_element() {
    let data = json!([{"name": "a"}, {"name": "b"}]);
    assert_eq!(search("[0]", &data).unwrap(), json!({"name": "a"}));
    assert_eq!(search("[-1].name", &data).unwrap(), json!("b"));
    assert_eq!(search("[5]", &data).unwrap(), Value::Null);
}

#[test]
fn projection_over_nested_fields() {
    assert_eq!(
        search("[*].owner.login", &repos()).unwrap(),
        json!(["ada", "bob", "ada"])
    );
}

#[test]
fn filter_with_comparison_and_boolean() {
    assert_eq!(
        search("[?stars > `10` && !archived].name", &repos()).unwrap(),
        json!(["bindery", "query"])
    );
    assert_eq!(
        search("[?owner.login == 'bob'].name | [0]", &repos()).unwrap(),
        json!("legacy")
    );
}

#[test]
fn flatten_collects_nested_lists() {
    assert_eq!(
        search("[*].topics[]", &repos()).unwrap(),
        json!(["cli", "rust", "json"])
    );
}

#[test]
fn multi_select_reshapes_rows() {
    assert_eq!(
        search("[?archived].{repo: name, by: owner.login}", &repos()).unwrap(),
        json!([{"repo": "legacy", "by": "bob"}])
    );
    assert_eq!(
        search("[0].[name, stars]", &repos()).unwrap(),
        json!(["bindery", 120])
    );
}

#[test]
fn functions_compose_with_pipes() {
    assert_eq!(search("length(@)", &repos()).unwrap(), json!(3));
    assert_eq!(search("sum([*].stars)", &repos()).unwrap(), json!(161));
    assert_eq!(
        search("sort([*].name) | join(', ', @)", &repos()).unwrap(),
        json!("bindery, legacy, query")
    );
    assert_eq!(
        search("[?contains(topics, 'rust')].name", &repos()).unwrap(),
        json!(["bindery"])
    );
}

#[test]
fn object_projection_over_values() {
    let data = json!({"a": {"n": 1}, "b": {"n": 2}});
    assert_eq!(search("*.n", &data).unwrap(), json!([1, 2]));
    assert_eq!(search("keys(@)", &data).unwrap(), json!(["a", "b"]));
}

#[test]
fn slices_project() {
    assert_eq!(
        search("[1:].name", &repos()).unwrap(),
        json!(["legacy", "query"])
    );
    assert_eq!(
        search("[::-1].name", &repos()).unwrap(),
        json!(["query", "legacy", "bindery"])
    );
}

#[test]
fn runtime_type_errors_surface() {
    let err = search("length(stars)", &json!({"stars": 3})).unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidType {
            name: "length".into(),
            expected: "string, array or object",
            actual: "number",
        }
    );
}

#[test]
fn compile_errors_carry_position() {
    match Query::compile("name ==") {
        Err(QueryError::Syntax { position, .. }) => assert_eq!(position, 7),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn deeply_nested_expressions_are_rejected() {
    let nested = |depth: usize| format!("{}@{}", "(".repeat(depth), ")".repeat(depth));

    assert_eq!(search(&nested(100), &json!(1)).unwrap(), json!(1));

    let err = search(&nested(5000), &json!(1)).unwrap_err();
    assert!(matches!(err, QueryError::Syntax { .. }));
    assert!(err.to_string().contains("nested too deeply"));
}
