use super::token::{TokenError, TokenVerifier};

#[derive(Debug, PartialEq, Eq)]
pub enum TokenValidationError {
    InvalidScheme,
    InvalidToken,
    TokenExpired,
}

impl From<TokenError> for TokenValidationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => TokenValidationError::TokenExpired,
            _ => TokenValidationError::InvalidToken,
        }
    }
}

/// Extracts the credential from an Authorization header value.
/// Returns None if no header is present or the bearer value is empty.
/// Returns Err if the auth scheme is not Bearer.
pub fn extract_bearer_token(
    auth_header: Option<&str>,
) -> Result<Option<&str>, TokenValidationError> {
    match auth_header {
        Some(header) => match header.strip_prefix("Bearer ") {
            Some(token) if token.trim().is_empty() => Ok(None),
            Some(token) => Ok(Some(token.trim())),
            None => Err(TokenValidationError::InvalidScheme),
        },
        None => Ok(None),
    }
}

/// Resolves a header to a subject identifier.
/// `Ok(None)` means no credential was supplied at all.
pub fn authenticate(
    verifier: &TokenVerifier,
    auth_header: Option<&str>,
) -> Result<Option<String>, TokenValidationError> {
    match extract_bearer_token(auth_header)? {
        Some(token) => Ok(Some(verifier.verify(token)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer_token(Some("Bearer abc")), Ok(Some("abc")));
        assert_eq!(extract_bearer_token(Some("Bearer ")), Ok(None));
        assert_eq!(extract_bearer_token(None), Ok(None));
        assert_eq!(
            extract_bearer_token(Some("Basic eC10b2tlbjpmb28=")),
            Err(TokenValidationError::InvalidScheme)
        );
    }

    #[test]
    fn test_authenticate() {
        let verifier = TokenVerifier::new(b"secret");
        let token = verifier.issue("user-1", None).unwrap();
        let header = format!("Bearer {token}");

        assert_eq!(
            authenticate(&verifier, Some(&header)),
            Ok(Some("user-1".to_string()))
        );
        assert_eq!(authenticate(&verifier, None), Ok(None));
        assert_eq!(
            authenticate(&verifier, Some("Bearer garbage")),
            Err(TokenValidationError::InvalidToken)
        );
    }
}
