pub mod dto;
mod projects;
pub mod response;
mod router;
pub mod validation;

pub use projects::projects_router;
pub use router::{AppState, create_router};
