use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::Project;
use crate::workspace::SavedProject;

/// Remote project line for list output
pub struct ProjectDisplay<'a> {
    pub project: &'a Project,
}

impl fmt::Display for ProjectDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visibility = if self.project.is_public {
            "[public]"
        } else {
            "[private]"
        };
        write!(
            f,
            "{}  {} {}  {} files  updated {}",
            self.project.id,
            self.project.name,
            visibility,
            self.project.files.len(),
            format_relative_time(&self.project.updated_at)
        )
    }
}

/// Local mirror entry for list output
pub struct SavedProjectDisplay<'a> {
    pub project: &'a SavedProject,
}

impl fmt::Display for SavedProjectDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {} files  saved {}",
            self.project.id,
            self.project.name,
            self.project.files.len(),
            format_relative_time(&self.project.updated_at)
        )
    }
}

pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let diff = Utc::now().signed_duration_since(*dt);

    if diff.num_seconds() < 0 {
        return "in the future".to_string();
    }
    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }
    if diff.num_minutes() < 60 {
        let mins = diff.num_minutes();
        return if mins == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{mins} minutes ago")
        };
    }
    if diff.num_hours() < 24 {
        let hours = diff.num_hours();
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        };
    }

    let days = diff.num_days();
    if days < 30 {
        return if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        };
    }

    dt.format("%Y-%m-%d").to_string()
}

/// Ask for confirmation unless --yes was given. Non-interactive runs must pass --yes.
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}
