mod commands;
pub mod http_client;
mod local;
pub mod pickers;
mod project;
mod token;

use std::path::Path;

pub use commands::{LocalCommands, ProjectCommands, TokenCommands};
pub use local::{run_local_delete, run_local_list, run_local_show};
pub use project::{
    run_project_delete, run_project_list, run_project_pull, run_project_push, run_project_show,
};
pub use token::run_token_issue;

use crate::workspace::{FileStorage, Workspace};

/// Open the local mirror file, creating its parent directory if needed.
pub fn open_workspace(storage: &str) -> anyhow::Result<Workspace<FileStorage>> {
    let path = Path::new(storage);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Workspace::new(FileStorage::open(path)?))
}
