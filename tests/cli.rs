use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

const SMALL_CSV: &str = "species,petal_length_cm,sepal_length_cm\nA,1,2\nA,2,4\nB,3,1\nB,4,3\n";

fn cmd_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("species-regress").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn with_input(name: &str, contents: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(name), contents).unwrap();
    dir
}

fn png_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

#[test]
fn no_arguments_is_a_usage_error() {
    let dir = tempdir().unwrap();
    cmd_in(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    assert!(png_files(dir.path()).is_empty());
}

#[test]
fn two_positional_arguments_is_a_usage_error() {
    let dir = with_input("a.csv", SMALL_CSV);
    cmd_in(dir.path())
        .args(["a.csv", "b.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    assert!(png_files(dir.path()).is_empty());
}

#[test]
fn writes_one_png_per_species_into_working_directory() {
    let dir = with_input("iris.csv", SMALL_CSV);
    cmd_in(dir.path())
        .args(["iris.csv", "--no-text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plot successful").count(2));

    assert_eq!(png_files(dir.path()), vec!["A.png", "B.png"]);
}

#[test]
fn output_dir_option_is_created() {
    let dir = with_input("iris.csv", SMALL_CSV);
    cmd_in(dir.path())
        .args(["iris.csv", "--no-text", "-o", "plots/run1"])
        .assert()
        .success();

    assert_eq!(
        png_files(&dir.path().join("plots/run1")),
        vec!["A.png", "B.png"]
    );
}

#[test]
fn json_input_is_accepted() {
    let dir = with_input(
        "iris.json",
        r#"[{"species": "A", "petal_length_cm": 1, "sepal_length_cm": 2},
            {"species": "A", "petal_length_cm": 2, "sepal_length_cm": 4}]"#,
    );
    cmd_in(dir.path())
        .args(["iris.json", "--no-text"])
        .assert()
        .success();

    assert_eq!(png_files(dir.path()), vec!["A.png"]);
}

#[test]
fn missing_input_file_fails() {
    let dir = tempdir().unwrap();
    cmd_in(dir.path())
        .args(["absent.csv", "--no-text"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.csv"));
}

#[test]
fn missing_column_fails() {
    let dir = with_input("bad.csv", "species,petal_length_cm\nA,1\n");
    cmd_in(dir.path())
        .args(["bad.csv", "--no-text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sepal_length_cm"));
}

#[test]
fn single_row_species_fails_with_a_clear_error() {
    let dir = with_input("iris.csv", "species,petal_length_cm,sepal_length_cm\nA,1,2\n");
    cmd_in(dir.path())
        .args(["iris.csv", "--no-text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 points"));

    assert!(png_files(dir.path()).is_empty());
}

#[test]
fn missing_font_file_fails() {
    let dir = with_input("iris.csv", SMALL_CSV);
    cmd_in(dir.path())
        .args(["iris.csv", "--font", "nope.ttf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.ttf"));
}

#[test]
fn second_run_reproduces_identical_images() {
    let dir = with_input("iris.csv", SMALL_CSV);
    cmd_in(dir.path()).args(["iris.csv", "--no-text"]).assert().success();
    let first = fs::read(dir.path().join("B.png")).unwrap();
    cmd_in(dir.path()).args(["iris.csv", "--no-text"]).assert().success();
    let second = fs::read(dir.path().join("B.png")).unwrap();

    assert_eq!(first, second);
}
