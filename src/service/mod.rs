//! Project operations with visibility and ownership enforced.

pub mod access;

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{ProjectFilter, Store};
use crate::types::{FileMap, Project, timestamp_now};

/// Fields for a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub files: FileMap,
    pub is_public: bool,
}

/// A partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub files: Option<FileMap>,
    pub is_public: Option<bool>,
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Public projects, plus the requester's own when one is given.
    pub fn list(&self, requester: Option<&str>) -> Result<Vec<Project>> {
        let filter = match requester {
            Some(subject) => ProjectFilter::VisibleTo(subject),
            None => ProjectFilter::Public,
        };
        self.store.list_projects(filter)
    }

    pub fn list_mine(&self, requester: &str) -> Result<Vec<Project>> {
        self.store.list_projects(ProjectFilter::OwnedBy(requester))
    }

    pub fn get(&self, id: &str, requester: Option<&str>) -> Result<Project> {
        let project = self.store.get_project(id)?.ok_or(Error::NotFound)?;

        if !access::can_read(&project, requester) {
            return Err(Error::Forbidden);
        }

        Ok(project)
    }

    /// Creates a project owned by the requester. Anonymous projects must be public.
    pub fn create(&self, new: NewProject, requester: Option<&str>) -> Result<Project> {
        if requester.is_none() && !new.is_public {
            return Err(Error::BadRequest(
                "Anonymous projects must be public; sign in to create a private project"
                    .to_string(),
            ));
        }

        let now = timestamp_now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: normalize_name(&new.name)?,
            files: new.files,
            owner_id: requester.map(str::to_string),
            is_public: new.is_public,
            created_at: now,
            updated_at: now,
        };

        self.store.create_project(&project)?;
        tracing::debug!(id = %project.id, owner = ?project.owner_id, "Created project");

        Ok(project)
    }

    pub fn update(
        &self,
        id: &str,
        changes: ProjectUpdate,
        requester: Option<&str>,
    ) -> Result<Project> {
        let mut project = self.store.get_project(id)?.ok_or(Error::NotFound)?;

        if !access::can_update(&project, requester) {
            return Err(Error::Forbidden);
        }

        if let Some(name) = changes.name {
            project.name = normalize_name(&name)?;
        }
        if let Some(files) = changes.files {
            project.files = files;
        }
        if let Some(is_public) = changes.is_public {
            project.is_public = is_public;
        }
        project.touch();

        self.store.update_project(&project)?;

        Ok(project)
    }

    /// Permanently removes a project owned by the requester.
    pub fn delete(&self, id: &str, requester: &str) -> Result<()> {
        let project = self.store.get_project(id)?.ok_or(Error::NotFound)?;

        if !access::can_delete(&project, requester) {
            return Err(Error::Forbidden);
        }

        if !self.store.delete_project(id)? {
            return Err(Error::NotFound);
        }
        tracing::debug!(id, "Deleted project");

        Ok(())
    }
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::BadRequest("Project name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
