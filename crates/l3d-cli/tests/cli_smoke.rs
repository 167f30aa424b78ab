use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "l3d-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_json(&self, name: &str, value: &Value) -> String {
        let path = self.path.join(name);
        fs::write(&path, serde_json::to_vec_pretty(value).expect("json"))
            .expect("fixture should be written");
        path.display().to_string()
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_l3d<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_l3d");
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("l3d command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn plate_catalog(tmp: &TempDirGuard) -> String {
    tmp.write_json(
        "catalog.json",
        &json!({
            "plate": {"type": "box", "dimensions": [5, 5, 5]},
            "leg": {"type": "cylinder", "radii": [1, 1], "height": 40}
        }),
    )
}

#[test]
fn templates_lists_builtin_types() {
    let output = run_l3d(["templates", "--json"]);
    assert_success(&output);
    assert_eq!(
        parse_json_stdout(&output),
        json!({"templates": ["box", "composite", "cylinder", "extrude", "ref"]})
    );

    let text = run_l3d(["templates"]);
    assert_success(&text);
    assert!(String::from_utf8_lossy(&text.stdout).contains("extrude"));
}

#[test]
fn templates_prints_one_merged_template() {
    let output = run_l3d(["templates", "--type", "box", "--json"]);
    assert_success(&output);
    let template = parse_json_stdout(&output);
    assert_eq!(template["type"], json!("box"));
    assert_eq!(template["dimensions"], json!([10, 10, 10]));
    assert_eq!(template["repeat"]["times"], json!(1));

    let unknown = run_l3d(["templates", "--type", "sphere"]);
    assert_failure(&unknown);
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("no template with name"));
}

#[test]
fn catalog_and_resolve_read_the_catalog_file() {
    let tmp = TempDirGuard::new("catalog");
    let catalog = plate_catalog(&tmp);

    let listing = run_l3d(["catalog", "--catalog", catalog.as_str(), "--json"]);
    assert_success(&listing);
    assert_eq!(parse_json_stdout(&listing)["names"], json!(["leg", "plate"]));

    let plate = run_l3d(["resolve", "plate", "--catalog", catalog.as_str()]);
    assert_success(&plate);
    assert_eq!(
        parse_json_stdout(&plate),
        json!({"type": "box", "dimensions": [5, 5, 5]})
    );

    let missing = run_l3d(["resolve", "unknown", "--catalog", catalog.as_str()]);
    assert_failure(&missing);
    assert!(String::from_utf8_lossy(&missing.stderr).contains("no object found"));
}

#[test]
fn sanitize_moves_excess_fields_into_the_bag() {
    let tmp = TempDirGuard::new("sanitize");
    let document = tmp.write_json("box.json", &json!({"type": "box", "color": "red"}));

    let output = run_l3d(["sanitize", document.as_str()]);
    assert_success(&output);
    let sanitized = parse_json_stdout(&output);
    assert_eq!(sanitized["_dustbin"]["color"], json!("red"));
    assert_eq!(sanitized["dimensions"], json!([10, 10, 10]));
    assert!(sanitized.get("color").is_none());
}

#[test]
fn compile_resolves_references() {
    let tmp = TempDirGuard::new("compile");
    let catalog = plate_catalog(&tmp);
    let document = tmp.write_json(
        "table.json",
        &json!({"type": "composite", "parts": [
            {"type": "ref", "name": "plate", "position": [0, 40, 0]},
            {"type": "ref", "name": "leg", "repeat": {"times": 2, "position": [30, 0, 0]}}
        ]}),
    );

    let output = run_l3d(["compile", document.as_str(), "--catalog", catalog.as_str()]);
    assert_success(&output);
    let compiled = parse_json_stdout(&output);
    assert_eq!(
        compiled["parts"][0],
        json!({"type": "box", "dimensions": [5, 5, 5], "position": [0, 40, 0]})
    );
    assert_eq!(compiled["parts"][1]["type"], json!("composite"));
    assert_eq!(compiled["parts"][1]["parts"][1]["position"], json!([30, 0, 0]));
}

#[test]
fn compile_with_sanitize_wraps_default_repeats() {
    let tmp = TempDirGuard::new("prepare");
    let document = tmp.write_json("box.json", &json!({"type": "box"}));

    let output = run_l3d(["compile", document.as_str(), "--sanitize"]);
    assert_success(&output);
    let compiled = parse_json_stdout(&output);
    assert_eq!(compiled["type"], json!("composite"));
    assert_eq!(compiled["parts"][0]["dimensions"], json!([10, 10, 10]));
    assert!(compiled["parts"][0].get("repeat").is_none());
}

#[test]
fn compile_failures_exit_nonzero() {
    let tmp = TempDirGuard::new("failures");
    let dangling = tmp.write_json("dangling.json", &json!({"type": "ref", "name": "nothing"}));
    let output = run_l3d(["compile", dangling.as_str()]);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("no object found"));

    let not_json = tmp.path().join("broken.json");
    fs::write(&not_json, "{ not json").expect("fixture should be written");
    let output = run_l3d([OsStr::new("compile"), not_json.as_os_str()]);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse definition"));
}

#[test]
fn verbose_logs_demotions_to_stderr() {
    let tmp = TempDirGuard::new("verbose");
    let document = tmp.write_json("box.json", &json!({"type": "box", "color": "red"}));

    let output = run_l3d(["--verbose", "sanitize", document.as_str()]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("demoting color"));
    parse_json_stdout(&output);
}
