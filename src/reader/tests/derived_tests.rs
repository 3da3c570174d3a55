//! Derived-array and derived-object literal tests.

use anyhow::{Result, ensure};
use rstest::rstest;
use serde_json::json;

use super::{read_literal, read_literal_err};
use crate::node::NodeKind;

#[test]
fn derived_array_reads_decorated_elements() -> Result<()> {
    let (tree, root) = read_literal(json!({
        "&list": [
            {"element": 1},
            {"&element": "/target"},
            {"#element": {"raw": true}}
        ]
    }))?;
    let list = tree.member(root, "list").expect("list");
    ensure!(
        matches!(tree.kind(list), NodeKind::DerivedArray(_)),
        "& over an array reads as a derived array"
    );
    let elements = tree.elements(list).expect("elements").to_vec();
    ensure!(elements.len() == 3, "all elements read");
    ensure!(
        matches!(tree.kind(elements[0]), NodeKind::Value(_)),
        "plain element"
    );
    ensure!(
        matches!(tree.kind(elements[1]), NodeKind::Reference(_)),
        "&element reads a reference"
    );
    ensure!(
        tree.value(elements[2]) == Some(&json!({"raw": true})),
        "#element stores the raw value"
    );
    Ok(())
}

#[rstest]
#[case(json!({"&list": [42]}), "must be a JSON object")]
#[case(json!({"&list": [{"element": 1, "extra": 2}]}), "exactly one 'element' member")]
#[case(json!({"&list": [{"item": 1}]}), "unexpected derived array item member")]
fn malformed_derived_arrays_are_rejected(
    #[case] literal: serde_json::Value,
    #[case] fragment: &str,
) -> Result<()> {
    let message = read_literal_err(literal)?;
    ensure!(
        message.contains(fragment),
        "error '{message}' should mention '{fragment}'"
    );
    Ok(())
}

#[test]
fn derived_object_reads_bases_and_override() -> Result<()> {
    let (tree, root) = read_literal(json!({
        "&child": {"base": ["/a", "/b"], "config": {"extra": 1}}
    }))?;
    let child = tree.member(root, "child").expect("child");
    let NodeKind::DerivedObject { bases, overrides } = tree.kind(child) else {
        anyhow::bail!("& over an object reads as a derived object");
    };
    ensure!(
        bases == &["/a".to_owned(), "/b".to_owned()],
        "bases keep their order"
    );
    ensure!(
        tree.kind(*overrides).is_object(),
        "the config member reads as the override object"
    );
    Ok(())
}

#[rstest]
#[case(json!({"&child": {"base": "/a"}}))]
#[case(json!({"&child": {"base": "/a", "config": null}}))]
fn missing_or_null_config_reads_as_a_null_override(
    #[case] literal: serde_json::Value,
) -> Result<()> {
    let (tree, root) = read_literal(literal)?;
    let child = tree.member(root, "child").expect("child");
    let NodeKind::DerivedObject { overrides, .. } = tree.kind(child) else {
        anyhow::bail!("expected a derived object");
    };
    ensure!(
        tree.kind(*overrides).is_null(),
        "absent or null config is the Null override"
    );
    Ok(())
}

#[rstest]
#[case(json!({"&child": {"config": {}}}), "requires a 'base' member")]
#[case(json!({"&child": {"base": []}}), "must not be empty")]
#[case(json!({"&child": {"base": [1]}}), "must be a string")]
#[case(json!({"&child": {"base": 7}}), "must be a string or an array of strings")]
#[case(json!({"&child": {"base": "/a", "config": [1]}}), "must be an object or null")]
fn malformed_derived_objects_are_rejected(
    #[case] literal: serde_json::Value,
    #[case] fragment: &str,
) -> Result<()> {
    let message = read_literal_err(literal)?;
    ensure!(
        message.contains(fragment),
        "error '{message}' should mention '{fragment}'"
    );
    Ok(())
}
