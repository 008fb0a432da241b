use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use super::Workspace;
use super::storage::LocalStorage;

/// Quiet period between the last edit and the automatic save.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Trailing-edge debounce: at most one deadline is pending, and every new
/// `schedule` replaces it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY)
    }
}

/// Drives pending auto-saves for a shared workspace. Runs until the task is aborted.
pub async fn run_autosave<S: LocalStorage>(workspace: Arc<Mutex<Workspace<S>>>) {
    let changed: Arc<Notify> = workspace.lock().await.autosave_signal();

    loop {
        let deadline = workspace.lock().await.autosave_deadline();

        match deadline {
            Some(deadline) => {
                tokio::select! {
                    () = tokio::time::sleep_until(deadline) => {
                        let mut ws = workspace.lock().await;
                        match ws.flush_autosave() {
                            Ok(true) => tracing::debug!("Auto-saved workspace"),
                            Ok(false) => {}
                            Err(e) => tracing::warn!("Auto-save failed: {e}"),
                        }
                    }
                    () = changed.notified() => {}
                }
            }
            None => changed.notified().await,
        }
    }
}
