use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DIAMOND: &str = "tests/fixtures/diamond.json";
const WEIGHTLESS: &str = "tests/fixtures/weightless.yaml";

fn graphplane() -> Command {
    Command::cargo_bin("graphplane").expect("binary should be built")
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("Failed to execute graphplane");
    assert!(
        output.status.success(),
        "graphplane failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn positions(path: &Path) -> Vec<(f64, f64)> {
    let snapshot: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    snapshot["vertices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| {
            (
                v["position"]["x"].as_f64().unwrap(),
                v["position"]["y"].as_f64().unwrap(),
            )
        })
        .collect()
}

#[test]
fn path_takes_the_shorter_route() {
    let report = stdout_json(graphplane().args(["path", "--graph", DIAMOND, "--from", "0", "--to", "2"]));

    assert_eq!(
        report,
        json!({
            "found": true,
            "length": 2.0,
            "edges": [{ "a": 0, "b": 1 }, { "a": 1, "b": 2 }]
        })
    );
}

#[test]
fn path_to_isolated_vertex_is_not_found() {
    let report = stdout_json(graphplane().args(["path", "-g", DIAMOND, "--from", "0", "--to", "4"]));

    assert_eq!(report["found"], json!(false));
    assert_eq!(report["edges"], json!([]));
}

#[test]
fn layout_without_gravity_keeps_equilibrium() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("relaxed.json");

    graphplane()
        .args(["--config", WEIGHTLESS, "layout", "-g", DIAMOND, "--ticks", "10", "-o"])
        .arg(&out)
        .assert()
        .success();

    // rest lengths are captured from the starting layout, so nothing moves
    assert_eq!(positions(&out), positions(Path::new(DIAMOND)));
    let saved: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved["name"], json!("diamond"));
    assert_eq!(saved["id"], json!(7));
    assert_eq!(saved["edges"].as_array().map(Vec::len), Some(4));
}

#[test]
fn layout_with_gravity_moves_vertices_down_in_place() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("graph.json");
    fs::copy(DIAMOND, &graph).unwrap();

    graphplane()
        .args(["layout", "--ticks", "5", "--graph"])
        .arg(&graph)
        .assert()
        .success();

    let before = positions(Path::new(DIAMOND));
    let after = positions(&graph);
    assert_eq!(before.len(), after.len());
    for ((_, y0), (_, y1)) in before.iter().zip(&after) {
        assert!(y1 > y0, "expected vertex to fall: {y0} -> {y1}");
    }
}

#[test]
fn visible_lists_vertices_in_view() {
    let report = stdout_json(graphplane().args([
        "--config", WEIGHTLESS, "visible", "-g", DIAMOND, "-x", "-1", "-y", "-1",
    ]));

    assert_eq!(report["vertices"], json!([0, 1, 2, 3]));
    assert_eq!(report["edges"].as_array().map(Vec::len), Some(4));
    assert_eq!(report["region"]["origin"], json!({ "x": -1.0, "y": -1.0 }));
}

#[test]
fn visible_after_panning_away_is_empty() {
    let report = stdout_json(graphplane().args([
        "--config", WEIGHTLESS, "visible", "-g", DIAMOND, "-x", "-12",
    ]));

    assert_eq!(report["vertices"], json!([]));
    assert_eq!(report["edges"], json!([]));
}

#[test]
fn snapshot_store_add_list_remove() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");

    for name in ["first", "second"] {
        graphplane()
            .arg("snapshots")
            .arg("--store")
            .arg(&store)
            .args(["add", "--graph", DIAMOND, "--name", name])
            .assert()
            .success();
    }

    let listed = graphplane()
        .arg("snapshots")
        .arg("-s")
        .arg(&store)
        .arg("list")
        .output()
        .unwrap();
    let listing = String::from_utf8(listed.stdout).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(
        lines,
        vec![
            "0\t0\tfirst\t5 vertices\t4 edges",
            "1\t1\tsecond\t5 vertices\t4 edges"
        ]
    );

    graphplane()
        .arg("snapshots")
        .arg("-s")
        .arg(&store)
        .args(["remove", "0"])
        .assert()
        .success();

    let stored: Value = serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
    assert_eq!(stored.as_array().map(Vec::len), Some(1));
    assert_eq!(stored[0]["name"], json!("second"));

    graphplane()
        .arg("snapshots")
        .arg("-s")
        .arg(&store)
        .args(["remove", "3"])
        .assert()
        .failure();
}

#[test]
fn missing_graph_file_fails_cleanly() {
    let output = graphplane()
        .args(["path", "-g", "tests/fixtures/nope.json", "--from", "0", "--to", "1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read graph"), "{stderr}");
}
