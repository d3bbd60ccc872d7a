//! Integration tests for the CLI subcommands.
//!
//! All tests point `--data-dir` at the checked-in fixtures; none of them
//! touch the network.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("hazardmap-cli").expect("binary exists");
    cmd.env_remove("RUST_LOG")
        .env_remove("LOG_FORMAT")
        .arg("--data-dir")
        .arg(fixtures_dir());
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("command runs");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn search_prints_ranked_labels() {
    cli()
        .args(["search", "麹町小学校"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("  1. 千代田区立麹町小学校,東京都千代田区麹町2-8"));
}

#[test]
fn search_json_is_a_feature_collection() {
    let value = stdout_json(cli().args(["--format", "json", "search", "青山小学校"]));
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(
        value["features"][0]["place_name"],
        "港区立青山小学校,東京都港区南青山2-25-3"
    );
}

#[test]
fn search_without_match_says_so() {
    cli()
        .args(["search", "札幌市中央区北一条"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No shelters matched"));
}

#[test]
fn reverse_orders_longitude_first() {
    cli()
        .args(["reverse", "35.6812", "139.7671"])
        .assert()
        .success()
        .stdout(predicate::str::contains("緯度: 35.6812 経度: 139.7671"));
}

#[test]
fn reverse_ambiguous_pair_returns_both() {
    let value = stdout_json(cli().args(["--format", "json", "reverse", "10", "-20"]));
    assert_eq!(value.as_array().expect("array").len(), 2);
}

#[test]
fn shelter_shows_accessibility() {
    cli()
        .args(["shelter", "桜丘小学校"])
        .assert()
        .success()
        .stdout(predicate::str::contains("世田谷区立桜丘小学校"))
        .stdout(predicate::str::contains("バリアフリー: なし"));
}

#[test]
fn shelter_without_match_fails() {
    cli()
        .args(["shelter", "札幌市中央区北一条"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no shelter matched"));
}

#[test]
fn legend_lists_entries() {
    cli()
        .args(["legend", "flood_layer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("洪水浸水想定区域 (flood_layer)"))
        .stdout(predicate::str::contains("#f7f5a9  0.5m未満"));
}

#[test]
fn unknown_legend_suggests_layer() {
    cli()
        .args(["legend", "flod_layer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'flood_layer'?"));
}

#[test]
fn unknown_classify_layer_fails_before_fetching() {
    cli()
        .args([
            "classify", "--layer", "lava_layer", "--lon", "139.75", "--lat", "35.68",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown hazard layer: lava_layer"));
}

#[test]
fn measure_prints_cumulative_labels() {
    cli()
        .args(["measure", "139.7402,35.6843", "139.7325,35.6877"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.79km"))
        .stdout(predicate::str::contains("Total: 0.79km"));
}

#[test]
fn measure_json_has_points_and_line() {
    let value = stdout_json(cli().args([
        "--format",
        "json",
        "measure",
        "0,0",
        "0,1",
        "0,2",
    ]));
    let features = value["features"].as_array().expect("features");
    assert_eq!(features.len(), 4);
    assert_eq!(features[3]["geometry"]["type"], "LineString");
    assert_eq!(features[2]["properties"]["distance"], "222.39km");
}

#[test]
fn measure_rejects_bad_position() {
    cli()
        .args(["measure", "139.7402"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid coordinate"));
}

#[test]
fn reach_in_bbox_merges_central_shelters() {
    let value = stdout_json(cli().args([
        "--format",
        "json",
        "reach",
        "--radius",
        "1500",
        "--bbox",
        "139.7,35.6,139.75,35.7",
    ]));
    let features = value["features"].as_array().expect("features");
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
    assert_eq!(
        features[0]["geometry"]["coordinates"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn reach_zero_radius_is_empty() {
    let value = stdout_json(cli().args(["--format", "json", "reach", "--radius", "0"]));
    assert_eq!(value["features"].as_array().unwrap().len(), 0);
}

#[test]
fn reach_hidden_when_zoomed_out() {
    cli()
        .args(["reach", "--radius", "500", "--zoom", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden below zoom 13"));
}

#[test]
fn missing_dataset_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("hazard_legend.json"), "[]").expect("write legend");
    Command::cargo_bin("hazardmap-cli")
        .expect("binary exists")
        .arg("--data-dir")
        .arg(dir.path())
        .args(["search", "麹町"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataset not found"))
        .stderr(predicate::str::contains("shelter_point.json"));
}
