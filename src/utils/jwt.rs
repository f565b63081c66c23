use jiff::Timestamp;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token issued by the identity service; never accepted here
    Refresh,
}

/// JWT claims. `sub` carries the numeric id of the user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user, valid for `expiration_hours` from now.
    pub fn new(user_id: i64, token_type: TokenType, expiration_hours: i64) -> Self {
        let now = Timestamp::now().as_second();

        Self {
            sub: user_id.to_string(),
            token_type,
            iat: now,
            exp: now.saturating_add(expiration_hours.saturating_mul(3600)),
        }
    }

    /// Parses the subject into a user id.
    ///
    /// Only positive integers identify a user.
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Invalid token subject".to_string(),
            })
    }
}

/// Generates a signed JWT for a user.
pub fn generate_token(
    user_id: i64,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Generates an access token (short-lived)
pub fn generate_access_token(
    user_id: i64,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    generate_token(user_id, TokenType::Access, secret, expiration_hours)
}

/// Validates and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to validate
/// * `secret` - The secret key for verifying the token
/// * `expected_type` - Optional expected token type to validate against
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected, claims.token_type
            ),
        });
    }

    Ok(claims)
}

/// Validates an access token
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing";

    #[test]
    fn test_generate_access_token() {
        let token = generate_access_token(1, TEST_SECRET, 1).unwrap();
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_access_token_roundtrip() {
        let token = generate_access_token(42, TEST_SECRET, 1).unwrap();

        let claims = validate_access_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_is_rejected_as_access_token() {
        let token = generate_token(1, TokenType::Refresh, TEST_SECRET, 168).unwrap();

        match validate_access_token(&token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => {
                assert!(message.contains("Invalid token type"))
            }
            other => panic!("Expected Unauthorized error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token = generate_access_token(1, TEST_SECRET, 24).unwrap();

        match validate_token(&token, "wrong_secret", None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_token_invalid_format() {
        let result = validate_token("invalid.token.format", TEST_SECRET, None);
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_expired_token() {
        // already expired, well past the default leeway
        let token = generate_access_token(1, TEST_SECRET, -1).unwrap();

        match validate_token(&token, TEST_SECRET, None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized error, got {other:?}"),
        }
    }

    #[test]
    fn test_claims_user_id_requires_positive_integer() {
        let mut claims = Claims::new(7, TokenType::Access, 1);
        assert_eq!(claims.user_id().unwrap(), 7);
        assert!(claims.exp > claims.iat);

        claims.sub = "abc".to_string();
        assert!(claims.user_id().is_err());
        claims.sub = "0".to_string();
        assert!(claims.user_id().is_err());
        claims.sub = "-5".to_string();
        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_token_type_serialization() {
        let json = serde_json::to_string(&Claims::new(1, TokenType::Access, 1)).unwrap();
        assert!(json.contains("\"token_type\":\"access\""));
    }
}
