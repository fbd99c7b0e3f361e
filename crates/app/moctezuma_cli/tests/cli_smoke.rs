//! CLI smoke tests — no network, no session.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("moctezuma_cli")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("records")
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("cart-add")),
        );
}

#[test]
fn whoami_without_session_reports_anonymous() {
    let config_home = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("moctezuma_cli")
        .expect("binary")
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("MOCTEZUMA_API_URL")
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn cart_without_session_fails_with_guidance() {
    let config_home = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("moctezuma_cli")
        .expect("binary")
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("cart")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}
