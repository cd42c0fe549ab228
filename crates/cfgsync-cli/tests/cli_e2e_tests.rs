//! CLI end-to-end tests that invoke the compiled `cfgsync` binary
//! against temporary projects.

use assert_cmd::Command;
use cfgsync_test_utils::fixtures;
use cfgsync_test_utils::project::TestProject;
use predicates::prelude::*;

/// `cfgsync` rooted at the project, without colors or log filters.
fn cfgsync(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("cfgsync").unwrap();
    cmd.current_dir(project.root())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CFGSYNC_ROOT");
    cmd
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("cfgsync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("cfgsync")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cfgsync"));
}

#[test]
fn test_missing_arguments_fail() {
    let project = TestProject::new();
    cfgsync(&project).arg("patch").assert().failure();
}

#[test]
fn test_unknown_operation_exits_one() {
    let project = TestProject::new().with_fixture_variant();
    cfgsync(&project)
        .args(["sync", ".config", fixtures::VARIANT])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: Unknown operation: sync"));
}

#[test]
fn test_missing_schema_exits_one() {
    let project = TestProject::new();
    cfgsync(&project)
        .args(["extract", ".config", "nosuch"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Schema not found"))
        .stderr(predicate::str::contains("Kconfig.system"));
}

#[test]
fn test_missing_artifact_exits_one() {
    let project = TestProject::new();
    project.write(&TestProject::schema_rel("nosuch"), fixtures::SCHEMA);
    cfgsync(&project)
        .args(["patch", ".config", "nosuch"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Artifact not found"));
}

#[test]
fn test_extract_writes_config() {
    let project = TestProject::new().with_fixture_variant();

    cfgsync(&project)
        .args(["extract", ".config", fixtures::VARIANT])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changed 12 configuration key(s)"));

    let config = project.read_config();
    assert!(config.contains("CONFIG_CPU_K2521=y\n"));
    assert!(config.contains("# CONFIG_FLOPPY_80 is not set\n"));
}

#[test]
fn test_patch_verbose_prints_line_changes() {
    let project = TestProject::new().with_fixture_variant();
    project.write_config("CONFIG_FLOPPY_80=y\n");

    cfgsync(&project)
        .args(["-v", "patch", ".config", fixtures::VARIANT])
        .assert()
        .success()
        .stdout(predicate::str::contains("   13: fd80\tequ\t0\t\t; 80 track drives"))
        .stdout(predicate::str::contains("   -> fd80\tequ\t1\t\t; 80 track drives"));

    assert!(project.read_artifact().contains("fd80\tequ\t1\t\t; 80 track drives\r\n"));
}

#[test]
fn test_patch_is_idempotent() {
    let project = TestProject::new().with_fixture_variant();
    project.write_config(fixtures::DOT_CONFIG);

    cfgsync(&project)
        .args(["patch", ".config", "auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(variant bc_a5120)"))
        .stdout(predicate::str::contains("variant auto").not())
        .stdout(predicate::str::contains("Already synchronized"));

    assert_eq!(project.read_artifact(), fixtures::BIOS_MAC);
}

#[test]
fn test_dry_run_prints_diff() {
    let project = TestProject::new().with_fixture_variant();
    project.write_config("CONFIG_NO_WAIT=y\n");

    cfgsync(&project)
        .args(["--dry-run", "patch", ".config", fixtures::VARIANT])
        .assert()
        .success()
        .stdout(predicate::str::contains("-wait\tequ\t1"))
        .stdout(predicate::str::contains("+wait\tequ\t0"))
        .stdout(predicate::str::contains("Would change 1 artifact line(s)"));

    assert_eq!(project.read_artifact(), fixtures::BIOS_MAC);
}

#[test]
fn test_json_report() {
    let project = TestProject::new().with_fixture_variant();
    project.write_config("CONFIG_CPU_C1715=y\n# CONFIG_CPU_K2521 is not set\n");

    let output = cfgsync(&project)
        .args(["--json", "patch", ".config", fixtures::VARIANT])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["operation"], "patch");
    assert_eq!(report["variant"], fixtures::VARIANT);
    assert_eq!(report["artifact_changes"][0]["line"], 4);
}

#[test]
fn test_verify_succeeds_on_fixture() {
    let project = TestProject::new().with_fixture_variant();

    cfgsync(&project)
        .args(["verify", ".config", fixtures::VARIANT])
        .assert()
        .success()
        .stdout(predicate::str::contains("15 passed, 0 failed, 0 skipped"));
}

#[test]
fn test_verify_reports_skipped_symbols() {
    let project = TestProject::new().with_variant(
        "small",
        fixtures::SCHEMA,
        "cpu equ k2521\r\nfd80 equ 0\r\n",
    );

    cfgsync(&project)
        .args(["verify", ".config", "small"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIP NO_WAIT"))
        .stdout(predicate::str::contains("0 failed"));
}

#[test]
fn test_root_flag() {
    let project = TestProject::new().with_fixture_variant();
    project.write_config("CONFIG_FLOPPY_80=y\n");
    let elsewhere = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("cfgsync")
        .unwrap()
        .current_dir(elsewhere.path())
        .env("NO_COLOR", "1")
        .arg("--root")
        .arg(project.root())
        .args(["patch", ".config", fixtures::VARIANT])
        .assert()
        .success();

    assert!(project.read_artifact().contains("fd80\tequ\t1"));
}

#[test]
fn test_auto_variant_without_selection_fails() {
    let project = TestProject::new().with_fixture_variant();
    project.write_config("CONFIG_FLOPPY_80=y\n");

    cfgsync(&project)
        .args(["patch", ".config"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot determine variant"));
}
