mod support;

use std::fs;

use assert_cmd::Command;
use serde_json::Value;

use support::TestBoard;

fn deck_cmd(board: &TestBoard) -> Command {
    let mut cmd = support::taskdeck_cmd();
    cmd.env("TASKDECK_BOARD", board.board_dir());
    cmd
}

fn run_json(board: &TestBoard, args: &[&str]) -> Value {
    let mut full = args.to_vec();
    full.push("--json");
    let output = deck_cmd(board)
        .args(&full)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("command json")
}

#[test]
fn state_survives_separate_invocations() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new();

    run_json(&board, &["add", "Persist me"]);

    let value = run_json(&board, &["list", "--all"]);
    assert_eq!(value["data"]["total"].as_u64(), Some(1));
    assert_eq!(value["data"]["tasks"][0]["title"].as_str(), Some("Persist me"));

    Ok(())
}

#[test]
fn read_only_commands_do_not_seed_the_board_dir() {
    let board = TestBoard::new();

    deck_cmd(&board).args(["board"]).assert().success();
    deck_cmd(&board).args(["list"]).assert().success();
    assert!(!board.board_dir().exists());

    deck_cmd(&board).args(["add", "First"]).assert().success();
    for slot in [
        "tasks.json",
        "columns.json",
        "column_order.json",
        "categories.json",
        "filters.json",
        "sort_by.json",
    ] {
        assert!(board.slot_exists(slot), "missing {slot}");
    }
}

#[test]
fn corrupt_slot_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new();
    board.write_slot("tasks.json", "not json")?;

    let value = run_json(&board, &["list", "--all"]);
    assert_eq!(value["data"]["total"].as_u64(), Some(0));

    // The next save replaces the corrupt slot with valid state.
    deck_cmd(&board).args(["add", "Fresh start"]).assert().success();
    let tasks = board.read_slot("tasks.json");
    assert_eq!(tasks.as_array().expect("tasks array").len(), 1);
    assert_eq!(tasks[0]["title"].as_str(), Some("Fresh start"));

    Ok(())
}

#[test]
fn unwritable_board_dir_fails_with_exit_code_4() {
    let board = TestBoard::new();
    fs::write(board.board_dir(), "not a directory").expect("blocker file");

    let output = deck_cmd(&board)
        .args(["add", "Doomed", "--json"])
        .assert()
        .failure()
        .code(4)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("error json");

    assert_eq!(value["status"].as_str(), Some("error"));
    assert_eq!(value["error"]["kind"].as_str(), Some("operation_failed"));
    assert!(value["error"]["message"]
        .as_str()
        .expect("message")
        .contains("Persistence failed"));
    assert_eq!(
        value["next_steps"][0].as_str(),
        Some("check that the board directory is writable")
    );
}
