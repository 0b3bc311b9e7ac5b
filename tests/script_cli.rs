mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestEnv;

fn run_json(env: &TestEnv, script: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let output = env
        .cmd()
        .args(["run", "--json"])
        .write_stdin(script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    Ok(serde_json::from_slice(&output)?)
}

fn texts(payload: &Value) -> Vec<String> {
    payload["data"]["tasks"]
        .as_array()
        .map(|tasks| {
            tasks
                .iter()
                .filter_map(|task| task["text"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn add_rejects_empty_text_and_keeps_due_dates() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    let payload = run_json(
        &env,
        "add Buy milk\nadd | 2030-01-01\nadd Pay rent | 2025-05-01\n",
    )?;

    assert_eq!(payload["schema_version"], "tasklist.v1");
    assert_eq!(payload["command"], "run");
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["data"]["rejected"], 1);
    assert_eq!(texts(&payload), vec!["Buy milk", "Pay rent"]);

    let tasks = payload["data"]["tasks"].as_array().expect("tasks");
    assert!(tasks[0].get("due").is_none());
    assert_eq!(tasks[1]["due"], "2025-05-01");
    assert!(tasks.iter().all(|task| task["completed"] == false));
    Ok(())
}

#[test]
fn sections_and_search_filter_the_view() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    let base = "add Buy milk\nadd Pay rent\ntoggle 2\n";

    let payload = run_json(&env, &format!("{base}section completed\n"))?;
    assert_eq!(texts(&payload), vec!["Pay rent"]);
    assert_eq!(payload["data"]["section"], "completed");

    let payload = run_json(&env, &format!("{base}search BUY\n"))?;
    assert_eq!(texts(&payload), vec!["Buy milk"]);
    assert_eq!(payload["data"]["counts"]["all"], 2);
    assert_eq!(payload["data"]["counts"]["completed"], 1);
    assert_eq!(payload["data"]["counts"]["pending"], 1);
    Ok(())
}

#[test]
fn toggle_twice_restores_and_unknown_delete_is_noop() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    let payload = run_json(
        &env,
        "add Buy milk\nadd Pay rent\ntoggle 1\ntoggle 1\ndelete 99\n",
    )?;

    assert_eq!(texts(&payload), vec!["Buy milk", "Pay rent"]);
    assert_eq!(payload["data"]["tasks"][0]["completed"], false);
    Ok(())
}

#[test]
fn deleted_ids_are_not_reused() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    let payload = run_json(&env, "add One\ndelete 1\nadd Two\n")?;
    assert_eq!(payload["data"]["tasks"][0]["id"], 2);
    Ok(())
}

#[test]
fn human_output_lists_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    env.cmd()
        .arg("run")
        .write_stdin("add Pay rent | 2025-05-01\ntoggle 1\n")
        .assert()
        .success()
        .stdout(contains("tasklist run: 1 visible task"))
        .stdout(contains("- #1 [x] Pay rent (Due: May 1, 2025)"));
    Ok(())
}

#[test]
fn script_file_argument_is_read() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    let path = env.write_file("tasks.txt", "# weekly\nadd Water plants\n")?;
    env.cmd()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("#1 [ ] Water plants"));
    Ok(())
}

#[test]
fn missing_script_file_is_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    env.cmd()
        .args(["run", "nope.txt"])
        .assert()
        .code(2)
        .stderr(contains("script not found"));
    Ok(())
}

#[test]
fn script_errors_report_line_numbers() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    env.cmd()
        .arg("run")
        .write_stdin("add Buy milk\n\nfrobnicate\n")
        .assert()
        .code(2)
        .stderr(contains("line 3"))
        .stderr(contains("unknown command 'frobnicate'"));

    let output = env
        .cmd()
        .args(["--json", "run"])
        .write_stdin("toggle abc\n")
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let payload: Value = serde_json::from_slice(&output)?;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["command"], "run");
    assert_eq!(payload["error"]["kind"], "user_error");
    assert_eq!(payload["error"]["details"]["line"], 1);
    Ok(())
}

#[test]
fn default_section_comes_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let env = TestEnv::new()?;
    let config = env.write_file("custom.toml", "[ui]\ndefault_section = \"pending\"\n")?;
    let output = env
        .cmd()
        .arg("--config")
        .arg(&config)
        .args(["run", "--json"])
        .write_stdin("add Buy milk\nadd Pay rent\ntoggle 1\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let payload: Value = serde_json::from_slice(&output)?;
    assert_eq!(payload["data"]["section"], "pending");
    assert_eq!(texts(&payload), vec!["Pay rent"]);
    Ok(())
}
