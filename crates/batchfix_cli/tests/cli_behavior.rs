//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool,
//! following behavior-driven testing principles.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a command for the batchfix CLI
fn batchfix_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_batchfix"))
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        batchfix_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        batchfix_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn requires_files_for_fix() {
        batchfix_cmd().arg("fix").assert().failure();
    }
}

mod missing_linter {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn lint_fails_without_linter_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.styl").write_str("color red\n").unwrap();

        batchfix_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.styl"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("No linter configured"));
    }

    #[test]
    fn fix_fails_with_invalid_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".batchfixrc").write_str("{ \"enable\": 1 }").unwrap();
        temp.child("a.styl").write_str("color red\n").unwrap();

        batchfix_cmd()
            .current_dir(temp.path())
            .args(["fix", "a.styl"])
            .assert()
            .code(2);
    }
}

/// Uses a shell script as the external linter. It reports `red` on line 1
/// with the fix `#f00` until the file no longer contains it.
#[cfg(unix)]
mod with_script_linter {
    use super::*;
    use assert_fs::prelude::*;
    use std::os::unix::fs::PermissionsExt;

    const LINTER: &str = r##"#!/bin/sh
if grep -q red; then
  echo '{"passed":false,"errors":[{"message":[{"line":1,"start":7,"endline":1,"end":9,"descr":"Use hex color","rule":"hex","fix":{"replace":"#f00"}}]}]}'
else
  echo '{"passed":true,"errors":[]}'
fi
"##;

    fn workspace() -> assert_fs::TempDir {
        let temp = assert_fs::TempDir::new().unwrap();
        let script = temp.child("lint.sh");
        script.write_str(LINTER).unwrap();
        std::fs::set_permissions(script.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = serde_json::json!({
            "linter": { "command": script.path().display().to_string() }
        });
        temp.child(".batchfixrc")
            .write_str(&config.to_string())
            .unwrap();
        temp.child("a.styl").write_str("color red\n").unwrap();
        temp
    }

    #[test]
    fn lint_reports_diagnostics() {
        let temp = workspace();

        batchfix_cmd()
            .current_dir(temp.path())
            .args(["lint", "a.styl"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("1:7 [hex]: Use hex color"))
            .stdout(predicate::str::contains("found 1 issues (1 fixable)"));
    }

    #[test]
    fn lint_json_output() {
        let temp = workspace();

        let output = batchfix_cmd()
            .current_dir(temp.path())
            .args(["lint", "--format", "json", "a.styl"])
            .output()
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json[0]["fixable"], 1);
        assert_eq!(json[0]["diagnostics"][0]["ruleCode"], "hex");
    }

    #[test]
    fn fix_rewrites_file() {
        let temp = workspace();

        batchfix_cmd()
            .current_dir(temp.path())
            .args(["fix", "a.styl"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Fixed 1 issues in 1 files"));

        temp.child("a.styl").assert("color #f00\n");
    }

    #[test]
    fn fix_dry_run_leaves_file() {
        let temp = workspace();

        batchfix_cmd()
            .current_dir(temp.path())
            .args(["fix", "--dry-run", "a.styl"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Would fix 1 issues"));

        temp.child("a.styl").assert("color red\n");
    }
}
