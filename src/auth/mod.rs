mod helpers;
mod middleware;
mod token;

pub use helpers::{TokenValidationError, authenticate, extract_bearer_token};
pub use middleware::{AuthError, OptionalAuth, RequireAuth};
pub use token::{Claims, TokenError, TokenVerifier};
