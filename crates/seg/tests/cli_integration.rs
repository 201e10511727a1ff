//! CLI tests that drive the `seg` binary end to end.
//!
//! Each test runs against its own temporary config location so nothing
//! touches the user's real configuration.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};
use serial_test::serial;
use tempfile::TempDir;

fn seg_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_seg"))
}

struct CliContext {
    bin_path: PathBuf,
    sandbox: TempDir,
    config_path: PathBuf,
}

impl CliContext {
    fn new() -> Self {
        let sandbox = TempDir::new().expect("failed to create temporary sandbox");
        let config_path = sandbox.path().join("seg-config.toml");
        Self {
            bin_path: seg_binary_path(),
            sandbox,
            config_path,
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.args(args);
        cmd.env("SEG_CONFIG", &self.config_path);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("failed to run seg")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn seg");
        child
            .stdin
            .take()
            .expect("stdin should be piped")
            .write_all(input.as_bytes())
            .expect("failed to write stdin");
        child.wait_with_output().expect("failed to wait for seg")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "seg command failed\nargs: {:?}\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_ok(args);
        serde_json::from_str(&stdout).unwrap_or_else(|err| {
            panic!(
                "command did not emit valid JSON\nargs: {:?}\nerror: {}\nstdout:\n{}",
                args, err, stdout
            )
        })
    }
}

fn stderr_json(output: &Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    serde_json::from_str(&stderr)
        .unwrap_or_else(|err| panic!("stderr was not JSON: {err}\nstderr:\n{stderr}"))
}

#[test]
fn test_compile_arguments_to_json() {
    let ctx = CliContext::new();
    let result = ctx.run_json(&[
        "--json",
        "compile",
        "price >= 100",
        "price <= 500",
        "stock_status = instock",
        "on_sale = true",
    ]);

    assert_eq!(
        result["filterExpression"],
        json!({
            "$and": [
                { "price": { "$gte": "100" } },
                { "price": { "$lte": "500" } },
            ],
            "stock_status": "instock",
            "on_sale": true,
        })
    );
    assert_eq!(result["conditions"].as_array().map(Vec::len), Some(4));
    assert_eq!(result["pagination"], json!({ "page": 1, "limit": 50 }));
}

#[test]
fn test_compile_from_stdin() {
    let ctx = CliContext::new();
    let output = ctx.run_with_stdin(
        &["--json", "compile"],
        "# in stock only\n\nstock_status = instock\nstock_quantity > 5\n",
    );
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        result["filterExpression"],
        json!({ "stock_status": "instock", "stock_quantity": { "$gt": 5 } })
    );
}

#[test]
fn test_compile_from_file_with_pagination() {
    let ctx = CliContext::new();
    let rules = ctx.sandbox.path().join("premium.rules");
    fs::write(&rules, "price >= 500\ncategory = Electronics\n").unwrap();
    let rules = rules.to_string_lossy().into_owned();

    let result = ctx.run_json(&["--json", "compile", "-f", &rules, "--page", "3", "--limit", "20"]);
    assert_eq!(result["pagination"], json!({ "page": 3, "limit": 20 }));
    assert_eq!(result["filterExpression"]["category"], json!("Electronics"));
}

#[test]
fn test_compile_table_output() {
    let ctx = CliContext::new();
    let stdout = ctx.run_ok(&["compile", "price > 100"]);
    assert!(stdout.contains("Conditions"));
    assert!(stdout.contains("Filter expression"));
    assert!(stdout.contains(r#""$gt": "100""#));
    assert!(stdout.contains("Page 1, limit 50"));
}

#[test]
fn test_syntax_errors_report_every_line() {
    let ctx = CliContext::new();
    let output = ctx.run(&["--json", "compile", "price > 100", "badline", "stock_status ="]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let error = stderr_json(&output);
    assert_eq!(error["error"]["code"], json!("SYNTAX"));
    let lines: Vec<u64> = error["error"]["lines"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|line| line["line"].as_u64())
        .collect();
    assert_eq!(lines, vec![2, 3]);
}

#[test]
fn test_unknown_field_suggests_correction() {
    let ctx = CliContext::new();
    let output = ctx.run(&["compile", "stock_statu = instock"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: field \"stock_statu\" is not allowed"));
    assert!(stderr.contains("Did you mean 'stock_status'?"));
}

#[test]
fn test_type_mismatch_error_code() {
    let ctx = CliContext::new();
    let output = ctx.run(&["--json", "validate", "stock_quantity > lots"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("TYPE_MISMATCH"));
}

#[test]
fn test_empty_stdin_is_input_shape_error() {
    let ctx = CliContext::new();
    let output = ctx.run_with_stdin(&["--json", "compile"], "");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("INPUT_SHAPE"));
}

#[test]
fn test_validate_reports_valid() {
    let ctx = CliContext::new();
    let result = ctx.run_json(&["--json", "validate", "on_sale = TRUE"]);
    assert_eq!(result["valid"], json!(true));
    assert_eq!(result["filterExpression"], json!({ "on_sale": true }));

    let stdout = ctx.run_ok(&["validate", "on_sale = TRUE", "price < 10"]);
    assert!(stdout.contains("Rules are valid (2 conditions)"));
}

#[test]
fn test_request_body_from_file() {
    let ctx = CliContext::new();
    let body = ctx.sandbox.path().join("request.json");
    fs::write(
        &body,
        r#"{"rules": "price > 100\nstock_status = instock", "page": 2}"#,
    )
    .unwrap();
    let body = body.to_string_lossy().into_owned();

    let result = ctx.run_json(&["--json", "request", &body]);
    assert_eq!(
        result["filterExpression"],
        json!({ "price": { "$gt": "100" }, "stock_status": "instock" })
    );
    assert_eq!(result["pagination"], json!({ "page": 2, "limit": 50 }));
}

#[test]
fn test_request_with_non_string_rules() {
    let ctx = CliContext::new();
    let output = ctx.run_with_stdin(&["--json", "request"], r#"{"rules": 42}"#);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("INPUT_SHAPE"));
}

#[test]
fn test_request_with_malformed_json() {
    let ctx = CliContext::new();
    let output = ctx.run_with_stdin(&["--json", "request"], "{not json");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("JSON_ERROR"));
}

#[test]
fn test_missing_rules_file() {
    let ctx = CliContext::new();
    let missing = ctx.sandbox.path().join("missing.rules");
    let missing = missing.to_string_lossy().into_owned();
    let output = ctx.run(&["--json", "compile", "--file", &missing]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("INPUT_ERROR"));
}

#[test]
fn test_meta_lists_fields_and_examples() {
    let ctx = CliContext::new();
    let meta = ctx.run_json(&["--json", "meta"]);
    assert_eq!(
        meta["allowedFields"],
        json!(["title", "price", "stock_status", "stock_quantity", "category", "tags", "on_sale"])
    );
    assert_eq!(meta["allowedOperators"], json!(["=", ">", "<", ">=", "<=", "!="]));
    assert_eq!(meta["fieldTypes"]["on_sale"], json!("boolean"));

    let example = meta["examples"]["complex"].as_str().unwrap().to_string();
    let output = ctx.run_with_stdin(&["--json", "compile"], &example);
    assert!(output.status.success());
}

#[test]
#[serial]
fn test_config_set_then_compile_uses_defaults() {
    let ctx = CliContext::new();
    ctx.run_ok(&["config", "set", "pagination.limit", "10"]);
    ctx.run_ok(&["config", "set", "output.color", "false"]);

    let content = fs::read_to_string(&ctx.config_path).unwrap();
    assert!(content.contains("limit = 10"));
    assert!(content.contains("color = false"));

    let shown = ctx.run_json(&["--json", "config", "show"]);
    assert_eq!(shown["exists"], json!(true));
    assert_eq!(shown["config"]["pagination"]["limit"], json!(10));

    let result = ctx.run_json(&["--json", "compile", "price > 1"]);
    assert_eq!(result["pagination"], json!({ "page": 1, "limit": 10 }));

    let result = ctx.run_json(&["--json", "compile", "price > 1", "--limit", "99"]);
    assert_eq!(result["pagination"]["limit"], json!(99));
}

#[test]
#[serial]
fn test_config_path_and_invalid_key() {
    let ctx = CliContext::new();
    let stdout = ctx.run_ok(&["config", "path"]);
    assert_eq!(stdout.trim(), ctx.config_path.display().to_string());

    let output = ctx.run(&["--json", "config", "set", "pagination.size", "10"]);
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("CONFIG_ERROR"));
    assert!(!ctx.config_path.exists());
}

#[test]
fn test_broken_config_is_reported() {
    let ctx = CliContext::new();
    fs::write(&ctx.config_path, "[pagination\nlimit = ").unwrap();
    let output = ctx.run(&["--json", "compile", "price > 1"]);
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(stderr_json(&output)["error"]["code"], json!("CONFIG_ERROR"));
}

#[test]
fn test_completions_generate() {
    let ctx = CliContext::new();
    let stdout = ctx.run_ok(&["completions", "bash"]);
    assert!(stdout.contains("seg"));
    assert!(stdout.contains("compile"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let ctx = CliContext::new();
    let output = ctx.run(&["--verbose", "--json", "compile", "price > 1"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("compiling condition"));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["filterExpression"], json!({ "price": { "$gt": "1" } }));
}
