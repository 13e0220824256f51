mod support;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

use support::TestBoard;

fn deck_cmd(board: &TestBoard) -> Command {
    let mut cmd = support::taskdeck_cmd();
    cmd.env("TASKDECK_BOARD", board.board_dir());
    cmd
}

#[test]
fn taskdeck_help_works() {
    Command::cargo_bin("taskdeck")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("local task board"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add",
        "list",
        "show",
        "edit",
        "done",
        "reopen",
        "delete",
        "move",
        "board",
        "category",
        "filter",
        "sort",
        "stats",
        "trend",
        "reminders",
    ];

    for cmd in subcommands {
        Command::cargo_bin("taskdeck")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn quiet_suppresses_human_output() {
    let board = TestBoard::new();

    let assert = deck_cmd(&board)
        .args(["add", "Silent", "-q"])
        .assert()
        .success();
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn json_wins_over_quiet() {
    let board = TestBoard::new();

    let output = deck_cmd(&board)
        .args(["add", "Loud", "-q", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("envelope json");
    assert_eq!(value["status"].as_str(), Some("success"));
    assert_eq!(value["schema_version"].as_str(), Some("taskdeck.v1"));
}
