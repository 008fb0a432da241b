//! Visibility and ownership rules for projects.
//!
//! A project with no owner is owned by nobody: no requester, authenticated
//! or not, matches an unset owner.

use crate::types::Project;

/// True when the requester is the project's owner.
#[must_use]
pub fn is_owner(project: &Project, requester: Option<&str>) -> bool {
    matches!(
        (project.owner_id.as_deref(), requester),
        (Some(owner), Some(requester)) if owner == requester
    )
}

/// Public projects are readable by anyone, private ones only by their owner.
#[must_use]
pub fn can_read(project: &Project, requester: Option<&str>) -> bool {
    project.is_public || is_owner(project, requester)
}

/// Updates follow the same owner-only rule as deletes, so anonymous
/// projects are immutable once created.
#[must_use]
pub fn can_update(project: &Project, requester: Option<&str>) -> bool {
    is_owner(project, requester)
}

#[must_use]
pub fn can_delete(project: &Project, requester: &str) -> bool {
    is_owner(project, Some(requester))
}
