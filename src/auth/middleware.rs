use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::helpers::{TokenValidationError, authenticate};
use crate::server::AppState;

/// Extractor that requires a valid credential; yields the subject identifier.
pub struct RequireAuth(pub String);

/// Extractor that identifies the caller when it can. Missing or invalid
/// credentials both yield `None`.
pub struct OptionalAuth(pub Option<String>);

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuth => "No authentication token",
            AuthError::InvalidScheme => "Invalid authorization scheme",
            AuthError::InvalidToken => "Invalid token",
            AuthError::TokenExpired => "Token expired",
        };

        let mut response =
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response();
        response.headers_mut().insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static("Bearer realm=\"cipherstudio\""),
        );
        response
    }
}

fn auth_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let subject = authenticate(&state.verifier, auth_header(parts)).map_err(|e| match e {
            TokenValidationError::InvalidScheme => AuthError::InvalidScheme,
            TokenValidationError::InvalidToken => AuthError::InvalidToken,
            TokenValidationError::TokenExpired => AuthError::TokenExpired,
        })?;

        subject.map(RequireAuth).ok_or(AuthError::MissingAuth)
    }
}

impl FromRequestParts<Arc<AppState>> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(&state.verifier, auth_header(parts)) {
            Ok(subject) => Ok(OptionalAuth(subject)),
            Err(e) => {
                tracing::debug!("Ignoring unusable credential on optional-auth route: {e:?}");
                Ok(OptionalAuth(None))
            }
        }
    }
}
