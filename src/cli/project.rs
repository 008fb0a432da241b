use super::http_client::ApiClient;
use super::open_workspace;
use super::pickers::{ProjectDisplay, confirm_action, format_relative_time};
use crate::server::dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::types::Project;
use crate::workspace::SavedProject;

fn project_path(id: &str) -> String {
    format!("/projects/{}", urlencoding::encode(id))
}

fn require_token(client: &ApiClient, action: &str) -> anyhow::Result<()> {
    if !client.has_token() {
        anyhow::bail!("{action} requires a token. Pass --token or set CIPHERSTUDIO_TOKEN.");
    }
    Ok(())
}

pub fn run_project_list(client: &ApiClient, mine: bool, json: bool) -> anyhow::Result<()> {
    let projects: Vec<Project> = if mine {
        require_token(client, "Listing your projects")?;
        client.get("/projects/user/me")?
    } else {
        client.get("/projects")?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    println!();
    for project in &projects {
        println!("  {}", ProjectDisplay { project });
    }
    println!();

    Ok(())
}

pub fn run_project_show(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let project: Project = client.get(&project_path(id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
        return Ok(());
    }

    let visibility = if project.is_public { "public" } else { "private" };
    let owner = project.owner_id.as_deref().unwrap_or("anonymous");

    println!();
    println!("  {} ({})", project.name, project.id);
    println!("  {visibility}, owned by {owner}");
    println!("  created {}", format_relative_time(&project.created_at));
    println!("  updated {}", format_relative_time(&project.updated_at));
    println!();
    for (path, entry) in &project.files {
        println!("  {path}  ({} bytes)", entry.code.len());
    }
    println!();

    Ok(())
}

pub fn run_project_push(
    client: &ApiClient,
    storage: &str,
    local_id: &str,
    public: bool,
    to: Option<&str>,
) -> anyhow::Result<()> {
    let workspace = open_workspace(storage)?;
    let Some(local) = workspace.saved_project(local_id)? else {
        anyhow::bail!("No saved project with ID '{local_id}'");
    };

    if let Some(remote_id) = to {
        require_token(client, "Updating a project")?;
        let request = UpdateProjectRequest {
            name: Some(local.name),
            files: Some(local.files),
            is_public: public.then_some(true),
        };
        let updated: Project = client.put(&project_path(remote_id), &request)?;
        println!("Updated '{}' at {}", updated.name, updated.id);
        return Ok(());
    }

    if !public && !client.has_token() {
        anyhow::bail!("Pushing without a token requires --public");
    }

    let request = CreateProjectRequest {
        name: local.name,
        files: local.files,
        is_public: Some(public),
    };
    let created: Project = client.post("/projects", &request)?;

    println!("Pushed '{}' as {}", created.name, created.id);
    if created.owner_id.is_none() {
        println!("  No token was given, so the project is anonymous and cannot be changed later.");
    }

    Ok(())
}

pub fn run_project_pull(client: &ApiClient, storage: &str, id: &str) -> anyhow::Result<()> {
    let project: Project = client.get(&project_path(id))?;

    let workspace = open_workspace(storage)?;
    let saved = SavedProject {
        id: project.id,
        name: project.name,
        files: project.files,
        created_at: project.created_at,
        updated_at: project.updated_at,
    };
    workspace.import_project(&saved)?;

    println!("Pulled '{}' into {}", saved.name, storage);

    Ok(())
}

pub fn run_project_delete(
    client: &ApiClient,
    id: &str,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    require_token(client, "Deleting a project")?;

    let message = format!("Delete project '{id}'? This cannot be undone.");
    if !confirm_action(&message, yes, non_interactive)? {
        println!("Cancelled.");
        return Ok(());
    }

    let message = client.delete(&project_path(id))?;
    println!("{message}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_path_escapes_id() {
        assert_eq!(project_path("abc-123"), "/projects/abc-123");
        assert_eq!(project_path("user/me"), "/projects/user%2Fme");
        assert_eq!(project_path("a b?c"), "/projects/a%20b%3Fc");
    }
}
