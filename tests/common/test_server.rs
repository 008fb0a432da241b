use std::path::Path;
use std::sync::Arc;

use cipherstudio::auth::TokenVerifier;
use cipherstudio::server::{AppState, create_router};
use cipherstudio::store::{SqliteStore, Store};
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A router served on an ephemeral port, backed by a throwaway database.
pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub verifier: TokenVerifier,
    server_task: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_body_limit(10 * 1024 * 1024).await
    }

    pub async fn start_with_body_limit(max_body_bytes: usize) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");

        let store = SqliteStore::new(temp_dir.path().join("cipherstudio.db")).expect("open store");
        store.initialize().expect("initialize store");

        let verifier = TokenVerifier::new(TEST_SECRET.as_bytes());
        let state = Arc::new(
            AppState::new(Arc::new(store), verifier.clone()).with_max_body_bytes(max_body_bytes),
        );
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let base_url = format!("http://127.0.0.1:{port}");

        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            temp_dir,
            base_url,
            verifier,
            server_task: Some(server_task),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A valid bearer credential for `user_id`.
    pub fn token_for(&self, user_id: &str) -> String {
        self.verifier.issue(user_id, None).expect("issue token")
    }

    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
    }
}
