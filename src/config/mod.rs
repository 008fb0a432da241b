mod server;

pub use server::{DEFAULT_JWT_SECRET, ServerConfig};
