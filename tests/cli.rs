//! CLI integration tests.
//!
//! Each test uses an isolated temp directory for the local mirror, so tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

mod common;

use std::path::PathBuf;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use cipherstudio::auth::TokenVerifier;
use cipherstudio::types::FileEntry;
use cipherstudio::workspace::{FileStorage, Workspace};
use predicates::prelude::*;
use serde_json::Value;

use common::{TEST_SECRET, TestServer};

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn storage(&self) -> PathBuf {
        self.temp_dir.path().join("local_storage.json")
    }

    fn storage_str(&self) -> String {
        self.storage().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cipherstudio").expect("failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env_remove("JWT_SECRET")
            .env_remove("CIPHERSTUDIO_SERVER")
            .env_remove("CIPHERSTUDIO_TOKEN");
        cmd
    }

    /// Save a project into the local mirror the way the editor would.
    fn save_local_project(&self, code: &str) -> String {
        let storage = FileStorage::open(self.storage()).expect("open storage");
        let mut workspace = Workspace::new(storage);
        workspace.update_file_content("/App.js", code);
        workspace.save().expect("save").id
    }
}

#[test]
fn test_token_issue_verifies_with_secret() {
    let ctx = TestContext::new();
    let output = ctx
        .cmd()
        .args(["token", "issue", "--user-id", "alice", "--jwt-secret", "s3cret"])
        .output()
        .expect("run token issue");
    assert!(output.status.success());

    let token = String::from_utf8(output.stdout).expect("utf8");
    let verifier = TokenVerifier::new(b"s3cret");
    assert_eq!(verifier.verify(token.trim()).expect("verify"), "alice");
    assert!(TokenVerifier::new(b"other").verify(token.trim()).is_err());
}

#[test]
fn test_token_issue_reads_config_file() {
    let ctx = TestContext::new();
    let config = ctx.temp_dir.child("server.toml");
    config
        .write_str("port = 6000\njwt_secret = \"from-file\"\n")
        .expect("write config");

    let output = ctx
        .cmd()
        .args(["token", "issue", "--user-id", "bob", "--config"])
        .arg(config.path())
        .output()
        .expect("run token issue");
    assert!(output.status.success());

    let token = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(
        TokenVerifier::new(b"from-file").verify(token.trim()).expect("verify"),
        "bob"
    );
}

#[test]
fn test_token_issue_rejects_bad_lifetimes() {
    let ctx = TestContext::new();
    for expires_in in ["0", "-30", "9223372036854775807"] {
        ctx.cmd()
            .args(["token", "issue", "--user-id", "alice", "--jwt-secret", "s3cret"])
            .args(["--expires-in", expires_in])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--expires-in"));
    }

    let output = ctx
        .cmd()
        .args(["token", "issue", "--user-id", "alice", "--jwt-secret", "s3cret"])
        .args(["--expires-in", "3600"])
        .output()
        .expect("run token issue");
    assert!(output.status.success());
    let token = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(TokenVerifier::new(b"s3cret").verify(token.trim()).expect("verify"), "alice");
}

#[test]
fn test_local_list_empty() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["local", "list", "--storage", &ctx.storage_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved projects."));
}

#[test]
fn test_local_list_and_show() {
    let ctx = TestContext::new();
    let id = ctx.save_local_project("export default () => 'hello'");

    ctx.cmd()
        .args(["local", "list", "--storage", &ctx.storage_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id));

    let output = ctx
        .cmd()
        .args(["local", "list", "--json", "--storage", &ctx.storage_str()])
        .output()
        .expect("run local list");
    let listed: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(listed[0]["id"], id.as_str());
    assert_eq!(listed[0]["files"], 2);

    ctx.cmd()
        .args(["local", "show", &id, "--storage", &ctx.storage_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("/App.js"))
        .stdout(predicate::str::contains("/styles.css"));
}

#[test]
fn test_local_delete_requires_yes_when_non_interactive() {
    let ctx = TestContext::new();
    let id = ctx.save_local_project("keep me");

    ctx.cmd()
        .args(["local", "delete", &id, "--non-interactive", "--storage", &ctx.storage_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes is required"));

    let storage = FileStorage::open(ctx.storage()).expect("open storage");
    assert!(Workspace::new(storage).saved_project(&id).expect("read").is_some());

    ctx.cmd()
        .args(["local", "delete", &id, "--yes", "--storage", &ctx.storage_str()])
        .assert()
        .success();

    let storage = FileStorage::open(ctx.storage()).expect("open storage");
    let workspace = Workspace::new(storage);
    assert!(workspace.saved_project(&id).expect("read").is_none());
    assert!(workspace.saved_projects().expect("list").is_empty());
}

#[test]
fn test_local_show_missing_fails() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["local", "show", "nope", "--storage", &ctx.storage_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No saved project"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_project_push_list_pull_delete() {
    let server = TestServer::start().await;
    let ctx = TestContext::new();
    let token = TokenVerifier::new(TEST_SECRET.as_bytes())
        .issue("alice", None)
        .expect("issue");
    let local_id = ctx.save_local_project("pushed code");
    let base_url = server.base_url.clone();

    let remote_id = tokio::task::spawn_blocking(move || {
        let output = ctx
            .cmd()
            .args(["project", "push", &local_id, "--public"])
            .args(["--server", &base_url, "--token", &token])
            .args(["--storage", &ctx.storage_str()])
            .output()
            .expect("run push");
        assert!(output.status.success(), "push failed: {output:?}");
        let stdout = String::from_utf8(output.stdout).expect("utf8");
        let remote_id = stdout
            .trim()
            .rsplit(' ')
            .next()
            .expect("remote id")
            .to_string();

        let output = ctx
            .cmd()
            .args(["project", "list", "--mine", "--json"])
            .args(["--server", &base_url, "--token", &token])
            .output()
            .expect("run list");
        assert!(output.status.success());
        let listed: Value = serde_json::from_slice(&output.stdout).expect("json");
        assert_eq!(listed[0]["id"], remote_id.as_str());
        assert_eq!(listed[0]["files"]["/App.js"]["code"], "pushed code");

        // Re-pushing onto the same remote project updates it in place.
        let storage = FileStorage::open(ctx.storage()).expect("open storage");
        let mut workspace = Workspace::new(storage);
        assert!(workspace.load(&local_id).expect("load"));
        workspace.update_file_content("/App.js", "updated code");
        workspace.save().expect("save");

        ctx.cmd()
            .args(["project", "push", &local_id, "--to", &remote_id])
            .args(["--server", &base_url, "--token", &token])
            .args(["--storage", &ctx.storage_str()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Updated"));

        let output = ctx
            .cmd()
            .args(["project", "list", "--mine", "--json"])
            .args(["--server", &base_url, "--token", &token])
            .output()
            .expect("run list");
        let listed: Value = serde_json::from_slice(&output.stdout).expect("json");
        assert_eq!(listed.as_array().expect("array").len(), 1);
        assert_eq!(listed[0]["files"]["/App.js"]["code"], "updated code");

        // Ids are path-escaped, so this cannot reach the /user/me route.
        ctx.cmd()
            .args(["project", "show", "user/me"])
            .args(["--server", &base_url, "--token", &token])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Project not found"));

        ctx.cmd()
            .args(["project", "pull", &remote_id])
            .args(["--server", &base_url])
            .args(["--storage", &ctx.storage_str()])
            .assert()
            .success();
        let storage = FileStorage::open(ctx.storage()).expect("open storage");
        let pulled = Workspace::new(storage)
            .saved_project(&remote_id)
            .expect("read")
            .expect("pulled project");
        assert_eq!(pulled.files["/App.js"], FileEntry::new("updated code"));

        ctx.cmd()
            .args(["project", "delete", &remote_id, "--non-interactive"])
            .args(["--server", &base_url, "--token", &token])
            .assert()
            .failure();

        ctx.cmd()
            .args(["project", "delete", &remote_id, "--yes"])
            .args(["--server", &base_url, "--token", &token])
            .assert()
            .success()
            .stdout(predicate::str::contains("Project deleted successfully"));

        ctx.cmd()
            .args(["project", "show", &remote_id])
            .args(["--server", &base_url])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Project not found"));

        remote_id
    })
    .await
    .expect("cli thread");

    assert!(!remote_id.is_empty());
}
