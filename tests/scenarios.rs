//! End-to-end scenarios driving the public API against real files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use serde_json::{Value, json};
use tempfile::TempDir;

use conforge::{ConfigError, ConfigReader, ConfigTree};

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<()> {
    fs::write(dir.join(name), contents).with_context(|| format!("write fixture {name}"))
}

fn read(dir: &Path, name: &str, source: &str, destination: &str) -> Result<ConfigTree> {
    ConfigReader::new()
        .read(Path::new(name), dir, source, destination)
        .map_err(|err| anyhow!(err.to_string()))
}

fn read_to_json(dir: &Path, name: &str) -> Result<Value> {
    let tree = read(dir, name, "/", "/")?;
    tree.to_json(tree.root())
        .ok_or_else(|| anyhow!("resolved tree must project to JSON"))
}

#[test]
fn plain_read_materializes_the_config_member() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "app.json", r#"{"config": {"a": 1, "b": {"c": "x"}}}"#)?;
    let resolved = read_to_json(dir.path(), "app.json")?;
    ensure!(
        resolved == json!({"a": 1, "b": {"c": "x"}}),
        "unexpected result {resolved}"
    );
    Ok(())
}

#[test]
fn undecorated_documents_round_trip_verbatim() -> Result<()> {
    let dir = TempDir::new()?;
    let config = json!({
        "z": null,
        "a": [1, 2.5, "three", false],
        "m": {"nested": {"deep": []}},
        "b": "last"
    });
    write_file(
        dir.path(),
        "app.json",
        &serde_json::to_string(&json!({"config": config}))?,
    )?;
    let resolved = read_to_json(dir.path(), "app.json")?;
    ensure!(
        resolved == config,
        "round trip must preserve values and member order: {resolved}"
    );
    Ok(())
}

#[test]
fn forward_references_resolve() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "app.json", r#"{"config": {"&a": "/b", "b": 7}}"#)?;
    let resolved = read_to_json(dir.path(), "app.json")?;
    ensure!(resolved == json!({"a": 7, "b": 7}), "unexpected result {resolved}");
    Ok(())
}

#[test]
fn includes_compose_and_the_outer_config_wins() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "base.json", r#"{"config": {"x": 1, "y": 2}}"#)?;
    write_file(
        dir.path(),
        "top.json",
        r#"{"includes": [{"file_path": "base.json"}], "config": {"y": 9, "z": 3}}"#,
    )?;
    let resolved = read_to_json(dir.path(), "top.json")?;
    ensure!(
        resolved == json!({"x": 1, "y": 9, "z": 3}),
        "unexpected result {resolved}"
    );
    Ok(())
}

#[test]
fn derived_objects_inherit_and_override() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(
        dir.path(),
        "app.json",
        r#"{"config": {
            "base": {"p": 1, "q": 2},
            "&child": {"base": "/base", "config": {"q": 9, "r": 3}}
        }}"#,
    )?;
    let resolved = read_to_json(dir.path(), "app.json")?;
    ensure!(
        resolved == json!({"base": {"p": 1, "q": 2}, "child": {"p": 1, "q": 9, "r": 3}}),
        "unexpected result {resolved}"
    );
    Ok(())
}

#[test]
fn multiple_bases_merge_left_to_right() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(
        dir.path(),
        "app.json",
        r#"{"config": {
            "a": {"m": 1},
            "b": {"m": 2, "n": 3},
            "&child": {"base": ["/a", "/b"], "config": {"n": 7}}
        }}"#,
    )?;
    let resolved = read_to_json(dir.path(), "app.json")?;
    ensure!(
        resolved == json!({"a": {"m": 1}, "b": {"m": 2, "n": 3}, "child": {"m": 2, "n": 7}}),
        "unexpected result {resolved}"
    );
    Ok(())
}

#[test]
fn mutually_referential_documents_fail_as_unresolved() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "app.json", r#"{"config": {"&x": "/y", "&y": "/x"}}"#)?;
    match ConfigReader::new().read(Path::new("app.json"), dir.path(), "/", "/") {
        Err(ConfigError::Unresolved { cycles: 100 }) => Ok(()),
        other => Err(anyhow!("expected Unresolved after 100 cycles, got {other:?}")),
    }
}

#[test]
fn source_and_destination_relocate_the_result() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(
        dir.path(),
        "app.json",
        r#"{"config": {"wanted": {"x": 1}, "other": 2}}"#,
    )?;
    let tree = read(dir.path(), "app.json", "/wanted", "/moved/here")?;
    let resolved = tree
        .to_json(tree.root())
        .ok_or_else(|| anyhow!("resolved tree must project"))?;
    ensure!(
        resolved == json!({"moved": {"here": {"x": 1}}}),
        "unexpected result {resolved}"
    );
    Ok(())
}

#[test]
fn traversal_api_walks_the_resolved_tree() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(
        dir.path(),
        "app.json",
        r#"{"config": {"server": {"port": 8080, "hosts": ["a", "b"]}}}"#,
    )?;
    let tree = read(dir.path(), "app.json", "/", "/")?;
    let root = tree.root();

    let port = tree
        .node_at_path(root, "/server/port")
        .ok_or_else(|| anyhow!("port must be addressable"))?;
    ensure!(tree.value(port) == Some(&json!(8080)), "port value");
    ensure!(
        tree.absolute_node_path(port) == "/server/port",
        "absolute path round trips"
    );

    let server = tree
        .node_at_path(root, "/server")
        .ok_or_else(|| anyhow!("server must be addressable"))?;
    let names: Vec<&str> = tree.member_names(server).collect();
    ensure!(names == ["port", "hosts"], "member order: {names:?}");

    let hosts = tree
        .node_at_path(root, "/server/hosts")
        .ok_or_else(|| anyhow!("hosts must be addressable"))?;
    ensure!(
        tree.elements(hosts).map(<[_]>::len) == Some(2),
        "hosts has two elements"
    );

    // Parent links are consistent after resolution.
    ensure!(tree.parent(port) == Some(server), "port hangs off server");
    ensure!(tree.parent(server) == Some(root), "server hangs off the root");
    ensure!(tree.is_root(root), "the root has no parent");
    Ok(())
}

#[test]
fn decorated_members_survive_composition_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(
        dir.path(),
        "catalog.json",
        r#"{"config": {
            "templates": {
                "small": {"cpu": 1, "memory": "1G"},
                "large": {"cpu": 8, "memory": "32G"}
            }
        }}"#,
    )?;
    write_file(
        dir.path(),
        "app.json",
        r##"{"includes": [{"file_path": "catalog.json"}],
            "config": {
                "&worker": {"base": "/templates/small", "config": {"memory": "2G"}},
                "&batch": {"base": ["/templates/small", "/templates/large"]},
                "&pool": [
                    {"&element": "/worker"},
                    {"#element": {"raw": true}}
                ],
                "#schema": {"not": ["interpreted", 1]}
            }}"##,
    )?;
    let resolved = read_to_json(dir.path(), "app.json")?;
    ensure!(
        resolved
            == json!({
                "templates": {
                    "small": {"cpu": 1, "memory": "1G"},
                    "large": {"cpu": 8, "memory": "32G"}
                },
                "worker": {"cpu": 1, "memory": "2G"},
                "batch": {"cpu": 8, "memory": "32G"},
                "pool": [{"cpu": 1, "memory": "2G"}, {"raw": true}],
                "schema": {"not": ["interpreted", 1]}
            }),
        "unexpected result {resolved}"
    );
    Ok(())
}
