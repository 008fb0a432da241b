mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::Project;

/// Which projects a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFilter<'a> {
    /// Public projects only.
    Public,
    /// Public projects plus every project owned by the subject.
    VisibleTo(&'a str),
    /// Only projects owned by the subject.
    OwnedBy(&'a str),
}

/// Store defines the database interface.
///
/// Listings are ordered by `updated_at` descending, ties broken by id.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    fn create_project(&self, project: &Project) -> Result<()>;
    fn get_project(&self, id: &str) -> Result<Option<Project>>;
    fn list_projects(&self, filter: ProjectFilter<'_>) -> Result<Vec<Project>>;
    /// Replaces the stored document. Fails with `NotFound` if the id is unknown.
    fn update_project(&self, project: &Project) -> Result<()>;
    fn delete_project(&self, id: &str) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
