//! CLI integration tests for mysql-sqlite-convert.
//!
//! These tests verify command-line argument parsing, end-to-end translation
//! and loading, and exit codes for the error taxonomy.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

/// Get a command for the mysql-sqlite-convert binary.
fn cmd() -> Command {
    Command::cargo_bin("mysql-sqlite-convert").unwrap()
}

fn write_dump(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const SAMPLE_DUMP: &str = "\
-- MySQL dump 10.13  Distrib 8.0.32\n\
/*!40101 SET @saved_cs_client = @@character_set_client */;\n\
SET NAMES utf8mb4;\n\
DROP TABLE IF EXISTS `users`;\n\
CREATE TABLE `users` (`id` INT AUTO_INCREMENT PRIMARY KEY, `name` VARCHAR(50)) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;\n\
LOCK TABLES `users` WRITE;\n\
INSERT INTO `users` VALUES (1,'ann'),(2,'bo;b');\n\
UNLOCK TABLES;\n";

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("load"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_translate_subcommand_help() {
    cmd()
        .args(["translate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INPUT"))
        .stdout(predicate::str::contains("OUTPUT"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mysql-sqlite-convert"));
}

#[test]
fn test_global_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--on-unsupported"))
        .stdout(predicate::str::contains("--verbosity"));
}

// =============================================================================
// Translate Tests
// =============================================================================

#[test]
fn test_translate_produces_sqlite_script() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", SAMPLE_DUMP);
    let out = dir.path().join("out.sql");

    cmd()
        .args(["translate"])
        .arg(&dump)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Translation completed!"));

    let script = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        script,
        "DROP TABLE IF EXISTS \"users\";\n\
         CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \"name\" VARCHAR(50));\n\
         INSERT INTO \"users\" VALUES (1,'ann'),(2,'bo;b');\n"
    );
}

#[test]
fn test_translate_strips_set_names() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", "SET NAMES utf8mb4;\n");
    let out = dir.path().join("out.sql");

    cmd().args(["translate"]).arg(&dump).arg(&out).assert().success();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_translate_empty_input_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "empty.sql", "");
    let out = dir.path().join("out.sql");

    cmd().args(["translate"]).arg(&dump).arg(&out).assert().success();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_translate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", SAMPLE_DUMP);
    let first = dir.path().join("first.sql");
    let second = dir.path().join("second.sql");

    cmd().args(["translate"]).arg(&dump).arg(&first).assert().success();
    cmd().args(["translate"]).arg(&first).arg(&second).assert().success();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_output_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", SAMPLE_DUMP);
    let out = dir.path().join("out.sql");

    let assert = cmd()
        .args(["--output-json", "translate"])
        .arg(&dump)
        .arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["statements_emitted"], 3);
    assert_eq!(report["statements_stripped"], 4);
    assert_eq!(report["rows_inserted"], 2);
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_creates_database_with_rows() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", SAMPLE_DUMP);
    let db = dir.path().join("out.db");

    cmd()
        .args(["load"])
        .arg(&dump)
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Load completed!"));

    let conn = rusqlite::Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_load_failure_reports_statement() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(
        dir.path(),
        "dump.sql",
        "INSERT INTO `ghost` VALUES (1);\n",
    );
    let db = dir.path().join("out.db");

    cmd()
        .args(["load"])
        .arg(&dump)
        .arg(&db)
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("ghost"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", SAMPLE_DUMP);

    cmd()
        .args(["check"])
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("Check completed!"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_input_exits_resource_code() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["translate"])
        .arg(dir.path().join("missing.sql"))
        .arg(dir.path().join("out.sql"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Resource unavailable"));
}

#[test]
fn test_malformed_dump_exits_malformed_code() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "bad.sql", "INSERT INTO t VALUES ('unterminated;\n");

    cmd()
        .args(["translate"])
        .arg(&dump)
        .arg(dir.path().join("out.sql"))
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Malformed dump"));
}

#[test]
fn test_fail_policy_exits_unsupported_code() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", "SET NAMES utf8mb4;\n");

    cmd()
        .args(["--on-unsupported", "fail", "translate"])
        .arg(&dump)
        .arg(dir.path().join("out.sql"))
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("SET NAMES utf8mb4"));
}

#[test]
fn test_invalid_policy_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", "");

    cmd()
        .args(["--on-unsupported", "maybe", "translate"])
        .arg(&dump)
        .arg(dir.path().join("out.sql"))
        .assert()
        .failure()
        .code(2);
}

// =============================================================================
// Config File Tests
// =============================================================================

#[test]
fn test_config_file_policy_applies() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", "LOCK TABLES `t` WRITE;\n");
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "translate:\n  on_unsupported: fail\n").unwrap();

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["translate"])
        .arg(&dump)
        .arg(dir.path().join("out.sql"))
        .assert()
        .failure()
        .code(5);
}

#[test]
fn test_invalid_config_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "dump.sql", "");
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "translate: [not, a, map]\n").unwrap();

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["translate"])
        .arg(&dump)
        .arg(dir.path().join("out.sql"))
        .assert()
        .failure();
}
