mod common;

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use common::TestRepo;
use tempfile::TempDir;

const FAILING_DIFF: &str = "diff --git a/proto/v1/test.proto b/proto/v1/test.proto
new file mode 100644
--- /dev/null
+++ b/proto/v1/test.proto
@@ -0,0 +1,6 @@
+syntax = \"proto3\";
+message Test {
+  string first = 1;
+  optional string fine = 2;
+  int32 second = 3;
+}
";

const PASSING_DIFF: &str = "+++ b/proto/v1/test.proto
@@ -0,0 +1,3 @@
+message Test {
+  optional string fine = 1;
+}
";

fn command(dir: &Path) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_proto-optional"));
  cmd
    .current_dir(dir)
    .env("NO_COLOR", "1")
    .env_remove("CLICOLOR_FORCE")
    .env_remove("RUST_LOG");
  cmd
}

fn run_with_diff_file(diff: &str) -> Output {
  let dir = TempDir::new().expect("Could not create temp dir");
  let path = dir.path().join("changes.diff");
  std::fs::write(&path, diff).expect("Could not write diff");

  command(dir.path())
    .arg("--diff-file")
    .arg(&path)
    .output()
    .expect("Could not run proto-optional")
}

fn stdout_lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect()
}

#[test]
fn passing_diff_prints_banner_and_exits_zero() {
  let output = run_with_diff_file(PASSING_DIFF);

  assert_eq!(output.status.code(), Some(0));
  let lines = stdout_lines(&output);
  assert_eq!(lines.len(), 1);
  assert!(lines[0].ends_with("All new proto fields are explicitly optional (or repeated/map/oneof)."));
  assert!(output.stderr.is_empty());
}

#[test]
fn failing_diff_prints_violations_in_order_and_exits_one() {
  let output = run_with_diff_file(FAILING_DIFF);

  assert_eq!(output.status.code(), Some(1));
  let lines = stdout_lines(&output);
  assert!(lines[0].ends_with("The following new proto fields are missing the `optional` keyword:"));
  assert_eq!(&lines[1..], &[
    "proto/v1/test.proto:3: field 'first' of type 'string' is missing 'optional' keyword",
    "proto/v1/test.proto:5: field 'second' of type 'int32' is missing 'optional' keyword"
  ]);
  assert!(output.stderr.is_empty());
}

#[test]
fn reads_diff_from_stdin() {
  let dir = TempDir::new().unwrap();
  let mut child = command(dir.path())
    .args(["--diff-file", "-"])
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .unwrap();

  child.stdin.take().unwrap().write_all(FAILING_DIFF.as_bytes()).unwrap();
  let output = child.wait_with_output().unwrap();

  assert_eq!(output.status.code(), Some(1));
  assert_eq!(stdout_lines(&output).len(), 3);
}

#[test]
fn enforce_flag_flags_message_fields() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("changes.diff");
  std::fs::write(&path, "+++ b/a.proto\n@@ -0,0 +1 @@\n+  Timestamp created_at = 1;\n").unwrap();

  let lenient = command(dir.path()).arg("--diff-file").arg(&path).output().unwrap();
  assert_eq!(lenient.status.code(), Some(0));

  let strict = command(dir.path())
    .arg("--diff-file")
    .arg(&path)
    .arg("--enforce-message-fields")
    .output()
    .unwrap();
  assert_eq!(strict.status.code(), Some(1));
  assert_eq!(
    stdout_lines(&strict)[1],
    "a.proto:1: field 'created_at' of type 'Timestamp' is missing 'optional' keyword"
  );
}

#[test]
fn outside_repository_reports_one_error_line() {
  let dir = TempDir::new().unwrap();
  let output = command(dir.path()).output().unwrap();

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert_eq!(stderr.lines().count(), 1);
  assert!(stderr.starts_with("error: Git validation error: not in a git repository"));
}

#[test]
fn missing_base_reference_reports_one_error_line() {
  let repo = TestRepo::new();
  repo.write_file("a.proto", "message A {}\n");
  repo.commit_all("Initial commit").unwrap();

  let output = command(repo.path()).arg("does-not-exist").output().unwrap();

  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert_eq!(stderr.lines().count(), 1);
  assert!(stderr.contains("base reference 'does-not-exist' not found. Common alternatives"));
}

#[test]
fn clean_branch_passes_end_to_end() {
  let repo = TestRepo::new();
  repo.write_file("a.proto", "message A {}\n");
  repo.commit_all("Initial commit").unwrap();
  repo.branch("base").unwrap();
  repo.write_file("b.proto", "message B {\n  optional string b = 1;\n}\n");
  repo.commit_all("Add b").unwrap();

  let output = command(repo.path()).args(["base", "HEAD"]).output().unwrap();

  assert_eq!(output.status.code(), Some(0));
  assert_eq!(stdout_lines(&output).len(), 1);
}
