//! CLI surface tests against the built binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn ptree() -> Command {
    Command::cargo_bin("ptree").unwrap()
}

#[test]
fn test_version_flag() {
    ptree()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ptree"));
}

#[test]
fn test_help_lists_filters() {
    ptree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--contains"))
        .stdout(predicate::str::contains("--exclude-root"));
}

#[test]
fn test_default_run_renders_a_tree() {
    ptree().assert().success();
}

#[test]
fn test_transition_flags_are_exclusive() {
    ptree().args(["-I", "-U"]).assert().code(2);
}

#[test]
fn test_all_conflicts_with_user_transitions() {
    ptree().args(["-A", "-U"]).assert().code(2);
}

#[test]
fn test_user_conflicts_with_exclude_root() {
    ptree().args(["--user", "root", "-X"]).assert().code(2);
}

#[test]
fn test_glyph_flags_are_exclusive() {
    ptree().args(["-i", "-u"]).assert().code(2);
    ptree().args(["-u", "-v"]).assert().code(2);
}

#[test]
fn test_unknown_user_exits_one() {
    ptree()
        .args(["--user", "no-such-user-zz9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown user"));
}

#[test]
fn test_unknown_pid_exits_one() {
    ptree()
        .args(["--pid", "4294967294"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown pid"));
}

#[test]
fn test_bad_order_key_rejected() {
    ptree().args(["-o", "starsign"]).assert().code(2);
}

#[test]
fn test_level_limits_output_depth() {
    // Depth 1 keeps only roots and their direct children; with thread
    // lines hidden, every line is at most one gutter level deep.
    let out = ptree().args(["-l", "1", "-w", "-H"]).assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    for line in stdout.lines() {
        let gutter = line.chars().take_while(|c| *c == ' ' || *c == '|').count();
        assert!(gutter <= 2, "line deeper than level 1: {line:?}");
    }
}
