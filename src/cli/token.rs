use std::path::Path;

use chrono::Duration;

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;

pub fn run_token_issue(
    user_id: &str,
    expires_in: Option<i64>,
    jwt_secret: Option<String>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    if user_id.trim().is_empty() {
        anyhow::bail!("User ID cannot be empty");
    }

    let mut server_config = match config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    }
    .with_env();
    if jwt_secret.is_some() {
        server_config.jwt_secret = jwt_secret;
    }

    let ttl = expires_in.map(parse_ttl).transpose()?;

    let verifier = TokenVerifier::new(server_config.secret().as_bytes());
    let token = verifier.issue(user_id, ttl)?;

    println!("{token}");

    Ok(())
}

fn parse_ttl(secs: i64) -> anyhow::Result<Duration> {
    if secs <= 0 {
        anyhow::bail!("--expires-in must be a positive number of seconds");
    }
    Duration::try_seconds(secs)
        .ok_or_else(|| anyhow::anyhow!("--expires-in is too large: {secs} seconds"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl(60).unwrap(), Duration::seconds(60));
        assert!(parse_ttl(0).is_err());
        assert!(parse_ttl(-5).is_err());
        assert!(parse_ttl(i64::MAX).is_err());
    }
}
