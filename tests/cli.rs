use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A command isolated from the user's own dictionary and local config
fn britfix(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("britfix").unwrap();
    cmd.current_dir(dir.path())
        .env("BRITFIX_USER_DICT", dir.path().join("dictionary.json"))
        .env_remove("BRITFIX_UNIT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_stdin_to_stdout() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .write_stdin("The color is gray.\n")
        .assert()
        .success()
        .stdout("The colour is grey.\n");
}

#[test]
fn test_units_flag() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .arg("--units")
        .write_stdin("The room is 12 feet wide")
        .assert()
        .success()
        .stdout(predicate::str::contains("3.7 metres"));

    britfix(&dir)
        .write_stdin("The room is 12 feet wide")
        .assert()
        .success()
        .stdout(predicate::str::contains("12 feet"));
}

#[test]
fn test_no_quotes_flag() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .arg("--no-quotes")
        .write_stdin("\u{201C}color\u{201D}")
        .assert()
        .success()
        .stdout("\u{201C}colour\u{201D}");
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .args(["-o", "json"])
        .write_stdin("color")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"spelling_changes\": 1"))
        .stdout(predicate::str::contains("\"text\": \"colour\""));
}

#[test]
fn test_write_markdown_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.md");
    fs::write(&path, "The color.\n\n```\ncolor = 1\n```\n").unwrap();

    britfix(&dir)
        .args(["--write", "--no-color", "notes.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("color → colour"));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "The colour.\n\n```\ncolor = 1\n```\n"
    );
}

#[test]
fn test_code_files_keep_code() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("lib.rs"), "// the color\nlet color = \"color\";\n").unwrap();

    britfix(&dir).args(["-w", "src"]).assert().success();

    assert_eq!(
        fs::read_to_string(src.join("lib.rs")).unwrap(),
        "// the colour\nlet color = \"color\";\n"
    );
}

#[test]
fn test_plain_converts_everything() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .args(["--plain", "--lang", "rs"])
        .write_stdin("let color = 1; // color")
        .assert()
        .success()
        .stdout("let colour = 1; // colour");
}

#[test]
fn test_check_fails_when_changes_needed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "color").unwrap();
    fs::write(dir.path().join("b.txt"), "colour").unwrap();

    britfix(&dir).args(["--check", "a.txt"]).assert().failure();
    britfix(&dir).args(["--check", "b.txt"]).assert().success();
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "color");
}

#[test]
fn test_dict_add_and_words() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .args(["dict", "add", "gotten", "got"])
        .assert()
        .success();

    britfix(&dir)
        .args(["dict", "words"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gotten\tgot"))
        .stdout(predicate::str::contains("color\tcolour"));

    britfix(&dir)
        .write_stdin("I have gotten it")
        .assert()
        .success()
        .stdout("I have got it");
}

#[test]
fn test_dict_path() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .args(["dict", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dictionary.json"));
}

#[test]
fn test_contextual_listing() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .arg("contextual")
        .assert()
        .success()
        .stdout(predicate::str::contains("program"))
        .stdout(predicate::str::contains("license"));
}

#[test]
fn test_completion() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("britfix"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    britfix(&dir)
        .arg("nope.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
