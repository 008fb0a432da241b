use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::auth::{OptionalAuth, RequireAuth};
use crate::server::AppState;
use crate::server::dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::server::response::{ApiError, MessageResponse, ServiceResultExt};
use crate::server::validation::{validate_files, validate_project_name};

pub fn projects_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/user/me", get(list_my_projects))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "Request body too large".to_string(),
            }
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    })
}

pub async fn list_projects(
    OptionalAuth(requester): OptionalAuth,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let projects = state
        .projects
        .list(requester.as_deref())
        .api_err("Failed to list projects")?;

    Ok::<_, ApiError>(Json(projects))
}

pub async fn list_my_projects(
    RequireAuth(requester): RequireAuth,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let projects = state
        .projects
        .list_mine(&requester)
        .api_err("Failed to list user projects")?;

    Ok::<_, ApiError>(Json(projects))
}

pub async fn get_project(
    OptionalAuth(requester): OptionalAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let project = state
        .projects
        .get(&id, requester.as_deref())
        .api_err("Failed to get project")?;

    Ok::<_, ApiError>(Json(project))
}

pub async fn create_project(
    OptionalAuth(requester): OptionalAuth,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload)?;

    validate_project_name(&req.name)?;
    validate_files(&req.files)?;

    let project = state
        .projects
        .create(req.into(), requester.as_deref())
        .api_err("Failed to create project")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    OptionalAuth(requester): OptionalAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload)?;

    if let Some(name) = &req.name {
        validate_project_name(name)?;
    }
    if let Some(files) = &req.files {
        validate_files(files)?;
    }

    let project = state
        .projects
        .update(&id, req.into(), requester.as_deref())
        .api_err("Failed to update project")?;

    Ok::<_, ApiError>(Json(project))
}

pub async fn delete_project(
    RequireAuth(requester): RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state
        .projects
        .delete(&id, &requester)
        .api_err("Failed to delete project")?;

    Ok::<_, ApiError>(Json(MessageResponse::new("Project deleted successfully")))
}
