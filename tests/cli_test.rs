//! Integration tests for the alilint binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CLEAN: &str = "\
package: zlib
version: v1.3
tag: v1.3
requires:
  - a
build_requires:
  - b
source: https://github.com/madler/zlib
---
#!/bin/bash -e
make
x=1
alibuild-generate-module > \"$MODULEFILE\"
";

fn write_recipe(temp: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

/// alilint with every checker enabled and no tool overrides from the environment.
fn bare() -> Command {
    let mut cmd = Command::new(cargo_bin("alilint"));
    cmd.arg("--no-color");
    cmd.env_remove("ALILINT_SHELLCHECK");
    cmd.env_remove("ALILINT_YAMLLINT");
    cmd
}

/// alilint with only the internal checkers.
fn alilint() -> Command {
    let mut cmd = bare();
    cmd.args(["-S", "-Y"]);
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("alilint"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--no-shellcheck"))
        .stdout(predicate::str::contains("--format"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("alilint"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_a_recipe() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("alilint"));
    cmd.assert().failure();
    Ok(())
}

#[test]
fn clean_recipe_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
    alilint()
        .args(["-f", "gcc"])
        .arg(&recipe)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn missing_separator_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let recipe = write_recipe(&temp, "zlib.sh", "package: zlib\nversion: v1\n");
    alilint()
        .args(["-f", "gcc"])
        .arg(&recipe)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("zlib.sh:1: error: metadata not found or empty"))
        .stdout(predicate::str::contains("[ali:empty]"));
    Ok(())
}

#[test]
fn every_checker_off_still_splits() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["-H", "-L", "-f", "gcc", "-"])
        .write_stdin("no header here\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[ali:empty]"));
    Ok(())
}

#[test]
fn unparseable_header_fails() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["-f", "gcc", "-"])
        .write_stdin("package: [zlib\n---\n#!/bin/bash -e\n#%Module1.0\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error: YAML parse error"))
        .stdout(predicate::str::contains("[ali:parse]"));
    Ok(())
}

#[test]
fn sequence_header_is_not_a_mapping() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["-f", "gcc", "-"])
        .write_stdin("- a\n---\n#!/bin/bash -e\n#%Module1.0\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[ali:toplevel-nondict]"))
        .stdout(predicate::str::contains("ali:schema").not());
    Ok(())
}

#[test]
fn missing_tag_is_reported_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["-f", "gcc", "-"])
        .write_stdin("package: X\nversion: 1\n---\n#!/bin/bash -e\n#%Module1.0\n")
        .assert()
        .code(1)
        .stdout("-:1: error: tag: required key not found [ali:schema]\n");
    Ok(())
}

#[test]
fn key_order_warning_does_not_fail() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["-f", "gcc", "-"])
        .write_stdin("tag: v1\npackage: X\nversion: v1\n---\n#!/bin/bash -e\n#%Module1.0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "-:2:1: warning: package must be declared before tag",
        ));
    Ok(())
}

#[test]
fn github_format() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["-f", "github", "-"])
        .write_stdin("package: X\n")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("::error file=-,line=1::"));
    Ok(())
}

#[test]
fn json_format() -> Result<(), Box<dyn std::error::Error>> {
    let output = alilint()
        .args(["-f", "json", "-"])
        .write_stdin("package: X\nversion: v1\ntag: v1\nbuild_requires: [b]\nrequires: [a]\n---\n")
        .output()?;

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let diagnostics = parsed["diagnostics"].as_array().unwrap();
    assert!(diagnostics
        .iter()
        .any(|d| d["code"] == "ali:key-order" && d["line"] == 5));
    assert_eq!(parsed["summary"]["errors"], 0);
    assert_eq!(output.status.code(), Some(0));
    Ok(())
}

#[test]
fn sarif_format() -> Result<(), Box<dyn std::error::Error>> {
    let output = alilint()
        .args(["-f", "sarif", "-"])
        .write_stdin("package: X\n")
        .output()?;

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["version"], "2.1.0");
    assert_eq!(parsed["runs"][0]["results"][0]["ruleId"], "ali:empty");
    Ok(())
}

#[test]
fn human_format_has_summary() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .arg("-")
        .write_stdin("package: X\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[ali:empty]"))
        .stdout(predicate::str::contains("--> -:1"))
        .stdout(predicate::str::contains("Found 1 error(s) and 0 warning(s)"));
    Ok(())
}

#[test]
fn unreadable_file_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let clean = write_recipe(&temp, "zlib.sh", CLEAN);
    alilint()
        .arg(temp.path().join("absent.sh"))
        .arg(&clean)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("absent.sh"));
    Ok(())
}

#[test]
fn invalid_utf8_on_stdin_does_not_stop_other_files() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let recipe = write_recipe(&temp, "zlib.sh", "package: zlib\n");
    let output = alilint()
        .args(["-f", "gcc"])
        .arg(&recipe)
        .arg("-")
        .write_stdin(b"a: \xff\n---\n".to_vec())
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.is_empty());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("zlib.sh:1: error: metadata not found or empty"));
    assert!(stdout.contains("a: unknown key [ali:schema]"));
    Ok(())
}

#[test]
fn missing_tool_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
    bare()
        .args(["-Y", "--shellcheck", "/nonexistent/alilint-shellcheck"])
        .arg(&recipe)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("shellcheck is not installed"));
    Ok(())
}

#[test]
fn lint_errors_win_over_missing_tools() -> Result<(), Box<dyn std::error::Error>> {
    bare()
        .args(["-Y", "--shellcheck", "/nonexistent/alilint-shellcheck", "-"])
        .write_stdin("package: X\nversion: 1\n---\n#!/bin/bash -e\n#%Module1.0\n")
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn zero_jobs_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    alilint()
        .args(["--jobs", "0", "-"])
        .write_stdin("package: X\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--jobs must be at least 1"));
    Ok(())
}

#[test]
fn files_are_reported_in_argument_order() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let b = write_recipe(&temp, "b.sh", "nothing\n");
    let a = write_recipe(&temp, "a.sh", "nothing\n");
    let output = alilint()
        .args(["-f", "gcc", "--jobs", "2"])
        .arg(&b)
        .arg(&a)
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("b.sh:1:"));
    assert!(lines[1].contains("a.sh:1:"));
    Ok(())
}

#[cfg(unix)]
mod fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_tool(temp: &TempDir, name: &str, script: &str) -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, format!("#!/bin/sh\ncat >/dev/null\n{}", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn shellcheck_findings_are_moved_below_the_header() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
        let shellcheck = fake_tool(
            &temp,
            "shellcheck",
            r#"echo '{"comments":[{"file":"-","line":3,"endLine":3,"column":1,"endColumn":2,"level":"warning","code":2034,"message":"x appears unused."}]}'
exit 1
"#,
        );

        bare()
            .args(["-f", "gcc", "-Y"])
            .arg("--shellcheck")
            .arg(&shellcheck)
            .arg(&recipe)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "zlib.sh:12:1: warning: x appears unused. [SC2034]",
            ));
        Ok(())
    }

    #[test]
    fn shellcheck_binary_from_environment() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
        let shellcheck = fake_tool(&temp, "shellcheck", "echo '{\"comments\":[]}'\n");

        bare()
            .env("ALILINT_SHELLCHECK", &shellcheck)
            .args(["-Y", "-f", "gcc"])
            .arg(&recipe)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
        Ok(())
    }

    #[test]
    fn crashed_checker_becomes_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
        let shellcheck = fake_tool(&temp, "shellcheck", "echo boom >&2\nexit 3\n");

        bare()
            .args(["-f", "gcc", "-Y"])
            .arg("--shellcheck")
            .arg(&shellcheck)
            .arg(&recipe)
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "zlib.sh:10: error: shellcheck exited unexpectedly with status 3: boom [ali:checker-failed]",
            ));
        Ok(())
    }

    #[test]
    fn yamllint_findings_stay_on_header_lines() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
        let yamllint = fake_tool(
            &temp,
            "yamllint",
            "echo 'stdin:2:10: [error] truthy value should be one of [false, true] (truthy)'\nexit 1\n",
        );

        bare()
            .args(["-f", "gcc", "-S"])
            .arg("--yamllint")
            .arg(&yamllint)
            .arg(&recipe)
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "zlib.sh:2:10: error: truthy value should be one of [false, true] [yl:truthy]",
            ));
        Ok(())
    }

    #[test]
    fn unreadable_tool_output_becomes_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let recipe = write_recipe(&temp, "zlib.sh", CLEAN);
        let yamllint = fake_tool(&temp, "yamllint", "echo 'Traceback (most recent call last):'\n");

        bare()
            .args(["-f", "gcc", "-S"])
            .arg("--yamllint")
            .arg(&yamllint)
            .arg(&recipe)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("yamllint produced unreadable output"))
            .stdout(predicate::str::contains("[ali:checker-failed]"));
        Ok(())
    }
}
