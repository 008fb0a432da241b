//! Client-side editing state: the open file map, the active file, and the
//! local mirror of saved projects.
//!
//! Storage layout (all values are text):
//! - `project_<id>`: one JSON document per saved project
//! - `projects`: JSON array of every saved project
//! - `lastProjectId`: id of the project opened most recently

pub mod debounce;
pub mod storage;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Notify;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::Error;
use crate::types::{FileEntry, FileMap, timestamp_now};

pub use debounce::{AUTOSAVE_DELAY, Debouncer, run_autosave};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};

pub const PROJECTS_KEY: &str = "projects";
pub const LAST_PROJECT_KEY: &str = "lastProjectId";

const DEFAULT_ACTIVE_FILE: &str = "/App.js";

const DEFAULT_APP: &str = r#"export default function App() {
  return (
    <main style={{ padding: '20px', fontFamily: 'system-ui, sans-serif' }}>
      <h1>Hello from CipherStudio</h1>
      <p>Edit this file to see the preview update.</p>
    </main>
  )
}
"#;

const DEFAULT_STYLES: &str = r#"body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
}
"#;

#[must_use]
pub fn project_key(id: &str) -> String {
    format!("project_{id}")
}

/// The starter template shown for a fresh project.
#[must_use]
pub fn default_files() -> FileMap {
    let mut files = FileMap::new();
    files.insert(DEFAULT_ACTIVE_FILE.to_string(), FileEntry::new(DEFAULT_APP));
    files.insert("/styles.css".to_string(), FileEntry::new(DEFAULT_STYLES));
    files
}

/// Paths are always rooted.
#[must_use]
pub fn normalize_path(name: &str) -> String {
    let name = name.trim();
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("cannot delete the last file")]
    LastFile,

    #[error("file already exists: {0}")]
    FileExists(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("file name cannot be empty")]
    EmptyFileName,

    #[error("storage error: {0}")]
    Storage(#[from] Error),
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// A project as kept in the local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    pub id: String,
    pub name: String,
    pub files: FileMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub struct Workspace<S> {
    storage: S,
    files: FileMap,
    active_file: Option<String>,
    current: Option<SavedProject>,
    theme: Theme,
    auto_save: bool,
    autosave: Debouncer,
    autosave_signal: Arc<Notify>,
}

impl<S: LocalStorage> Workspace<S> {
    /// A workspace holding the starter template and no current project.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            files: default_files(),
            active_file: Some(DEFAULT_ACTIVE_FILE.to_string()),
            current: None,
            theme: Theme::default(),
            auto_save: false,
            autosave: Debouncer::default(),
            autosave_signal: Arc::new(Notify::new()),
        }
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn files(&self) -> &FileMap {
        &self.files
    }

    #[must_use]
    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    #[must_use]
    pub fn current_project(&self) -> Option<&SavedProject> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn toggle_auto_save(&mut self) -> bool {
        self.auto_save = !self.auto_save;
        if !self.auto_save {
            self.autosave.cancel();
            self.autosave_signal.notify_one();
        }
        self.auto_save
    }

    // File operations

    pub fn create_file(&mut self, name: &str) -> Result<String> {
        if name.trim().trim_start_matches('/').is_empty() {
            return Err(WorkspaceError::EmptyFileName);
        }
        let path = normalize_path(name);
        if self.files.contains_key(&path) {
            return Err(WorkspaceError::FileExists(path));
        }

        self.files.insert(path.clone(), FileEntry::new(""));
        self.active_file = Some(path.clone());
        self.files_changed();
        Ok(path)
    }

    /// Removes a file, refusing to remove the last one. If the removed file
    /// was active, the first remaining file becomes active.
    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        if !self.files.contains_key(name) {
            return Err(WorkspaceError::FileNotFound(name.to_string()));
        }
        if self.files.len() <= 1 {
            return Err(WorkspaceError::LastFile);
        }

        self.files.shift_remove(name);
        if self.active_file.as_deref() == Some(name) {
            self.active_file = self.files.keys().next().cloned();
        }
        self.files_changed();
        Ok(())
    }

    /// Renames a file in place, keeping its position in the map.
    pub fn rename_file(&mut self, from: &str, to: &str) -> Result<String> {
        if to.trim().trim_start_matches('/').is_empty() {
            return Err(WorkspaceError::EmptyFileName);
        }
        let to = normalize_path(to);
        if !self.files.contains_key(from) {
            return Err(WorkspaceError::FileNotFound(from.to_string()));
        }
        if to == from {
            return Ok(to);
        }
        if self.files.contains_key(&to) {
            return Err(WorkspaceError::FileExists(to));
        }

        self.files = std::mem::take(&mut self.files)
            .into_iter()
            .map(|(path, entry)| {
                if path == from {
                    (to.clone(), entry)
                } else {
                    (path, entry)
                }
            })
            .collect();

        if self.active_file.as_deref() == Some(from) {
            self.active_file = Some(to.clone());
        }
        self.files_changed();
        Ok(to)
    }

    pub fn update_file_content(&mut self, name: &str, code: &str) {
        self.files.insert(name.to_string(), FileEntry::new(code));
        self.files_changed();
    }

    pub fn set_active_file(&mut self, name: &str) -> Result<()> {
        if !self.files.contains_key(name) {
            return Err(WorkspaceError::FileNotFound(name.to_string()));
        }
        self.active_file = Some(name.to_string());
        Ok(())
    }

    // Project operations

    /// Saves the open files as the current project, creating one if needed.
    pub fn save(&mut self) -> Result<SavedProject> {
        let now = timestamp_now();
        let project = match &self.current {
            Some(current) => SavedProject {
                id: current.id.clone(),
                name: current.name.clone(),
                files: self.files.clone(),
                created_at: current.created_at,
                updated_at: now,
            },
            None => {
                let id = Uuid::new_v4().simple().to_string();
                SavedProject {
                    name: format!("Project {}", &id[..8]),
                    id,
                    files: self.files.clone(),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        self.store_project(&project)?;
        self.storage.set_item(LAST_PROJECT_KEY, &project.id)?;

        self.current = Some(project.clone());
        self.autosave.cancel();
        tracing::debug!(id = %project.id, "Saved project locally");

        Ok(project)
    }

    /// Opens a saved project. Returns false, changing nothing, when no record exists.
    pub fn load(&mut self, id: &str) -> Result<bool> {
        let Some(project) = self.saved_project(id)? else {
            return Ok(false);
        };

        self.active_file = project.files.keys().next().cloned();
        self.files = project.files.clone();
        self.current = Some(project);
        self.autosave.cancel();
        self.storage.set_item(LAST_PROJECT_KEY, id)?;

        Ok(true)
    }

    /// Reopens the project that was open last, if any.
    pub fn restore(&mut self) -> Result<bool> {
        match self.storage.get_item(LAST_PROJECT_KEY)? {
            Some(id) => self.load(&id),
            None => Ok(false),
        }
    }

    /// Resets to the starter template with no current project.
    pub fn new_project(&mut self) -> Result<()> {
        self.files = default_files();
        self.active_file = Some(DEFAULT_ACTIVE_FILE.to_string());
        self.current = None;
        self.autosave.cancel();
        self.storage.remove_item(LAST_PROJECT_KEY)?;
        Ok(())
    }

    pub fn saved_projects(&self) -> Result<Vec<SavedProject>> {
        match self.storage.get_item(PROJECTS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json).map_err(Error::from)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn saved_project(&self, id: &str) -> Result<Option<SavedProject>> {
        match self.storage.get_item(&project_key(id))? {
            Some(json) => Ok(Some(serde_json::from_str(&json).map_err(Error::from)?)),
            None => Ok(None),
        }
    }

    /// Writes a project into the local mirror without opening it.
    pub fn import_project(&self, project: &SavedProject) -> Result<()> {
        self.store_project(project)
    }

    /// Removes a project from the local mirror, closing it if it is open.
    /// Returns false if it was not there.
    pub fn delete_saved_project(&mut self, id: &str) -> Result<bool> {
        let existed = self.storage.get_item(&project_key(id))?.is_some();
        self.storage.remove_item(&project_key(id))?;

        let mut projects = self.saved_projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        let listed = projects.len() != before;
        self.write_project_list(&projects)?;

        if self.storage.get_item(LAST_PROJECT_KEY)?.as_deref() == Some(id) {
            self.storage.remove_item(LAST_PROJECT_KEY)?;
        }

        // The open files stay, detached from the deleted record.
        if self.current.as_ref().is_some_and(|p| p.id == id) {
            self.current = None;
            self.autosave.cancel();
            self.autosave_signal.notify_one();
        }

        Ok(existed || listed)
    }

    // Auto-save

    /// Saves if an auto-save is due. Returns whether a save happened.
    pub fn flush_autosave(&mut self) -> Result<bool> {
        if !self.autosave.poll(Instant::now()) {
            return Ok(false);
        }
        if !self.auto_save || self.current.is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    #[must_use]
    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    /// Notified whenever the pending auto-save deadline changes.
    #[must_use]
    pub fn autosave_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.autosave_signal)
    }

    fn files_changed(&mut self) {
        if self.auto_save && self.current.is_some() {
            self.autosave.schedule(Instant::now());
            self.autosave_signal.notify_one();
        }
    }

    fn store_project(&self, project: &SavedProject) -> Result<()> {
        let json = serde_json::to_string(project).map_err(Error::from)?;
        self.storage.set_item(&project_key(&project.id), &json)?;

        let mut projects = self.saved_projects()?;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => projects.push(project.clone()),
        }
        self.write_project_list(&projects)
    }

    fn write_project_list(&self, projects: &[SavedProject]) -> Result<()> {
        let json = serde_json::to_string(projects).map_err(Error::from)?;
        self.storage.set_item(PROJECTS_KEY, &json)?;
        Ok(())
    }
}
