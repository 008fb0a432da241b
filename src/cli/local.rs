use serde::Serialize;

use super::open_workspace;
use super::pickers::{SavedProjectDisplay, confirm_action, format_relative_time};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocalProjectOutput {
    id: String,
    name: String,
    files: usize,
    created_at: String,
    updated_at: String,
}

pub fn run_local_list(storage: &str, json: bool) -> anyhow::Result<()> {
    let workspace = open_workspace(storage)?;
    let projects = workspace.saved_projects()?;

    if json {
        let output: Vec<LocalProjectOutput> = projects
            .iter()
            .map(|p| LocalProjectOutput {
                id: p.id.clone(),
                name: p.name.clone(),
                files: p.files.len(),
                created_at: p.created_at.to_rfc3339(),
                updated_at: p.updated_at.to_rfc3339(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No saved projects.");
        return Ok(());
    }

    println!();
    for project in &projects {
        println!("  {}", SavedProjectDisplay { project });
    }
    println!();

    Ok(())
}

pub fn run_local_show(storage: &str, id: &str) -> anyhow::Result<()> {
    let workspace = open_workspace(storage)?;
    let Some(project) = workspace.saved_project(id)? else {
        anyhow::bail!("No saved project with ID '{id}'");
    };

    println!();
    println!("  {} ({})", project.name, project.id);
    println!("  created {}", format_relative_time(&project.created_at));
    println!("  saved   {}", format_relative_time(&project.updated_at));
    println!();
    for (path, entry) in &project.files {
        println!("  {path}  ({} bytes)", entry.code.len());
    }
    println!();

    Ok(())
}

pub fn run_local_delete(
    storage: &str,
    id: &str,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let mut workspace = open_workspace(storage)?;
    let Some(project) = workspace.saved_project(id)? else {
        anyhow::bail!("No saved project with ID '{id}'");
    };

    let message = format!("Delete '{}' from the local mirror?", project.name);
    if !confirm_action(&message, yes, non_interactive)? {
        println!("Cancelled.");
        return Ok(());
    }

    workspace.delete_saved_project(id)?;
    println!("Deleted '{}'.", project.name);

    Ok(())
}
