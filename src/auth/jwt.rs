/// Session Token Issuing and Verification
///
/// Tokens are HS256 JWTs signed with the configured secret. Verification
/// accepts HS256 only, so a token cannot choose its own algorithm.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::account::{AccountId, Role};
use crate::auth::claims::{Claims, VerifiedClaims};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issue a session token for an account
///
/// # Errors
/// Returns an internal error if signing fails
pub fn generate_session_token(
    account_id: AccountId,
    role: Role,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(account_id, role, config.token_lifetime_seconds);

    encode(
        &Header::new(SESSION_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify a session token and extract its claims
///
/// # Errors
/// `AuthError::TokenInvalid` when the token is malformed, signed with another
/// key or algorithm, expired, or carries claims that do not parse
pub fn validate_session_token(token: &str, config: &JwtSettings) -> Result<VerifiedClaims, AuthError> {
    let mut validation = Validation::new(SESSION_ALGORITHM);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Session token rejected");
        AuthError::TokenInvalid
    })?;

    VerifiedClaims::try_from(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            token_lifetime_seconds: 3600,
            cookie_lifetime_seconds: 86400,
        }
    }

    fn sign_with(header: Header, claims: &Claims, secret: &str) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = get_test_config();

        for (id, role) in [(1, Role::Regular), (2, Role::Admin), (i32::MAX, Role::Admin)] {
            let token = generate_session_token(id, role, &config).expect("Failed to generate token");
            let claims = validate_session_token(&token, &config).expect("Failed to validate token");

            assert_eq!(claims.account_id, id);
            assert_eq!(claims.role, role);
        }
    }

    #[test]
    fn test_invalid_token() {
        let config = get_test_config();
        for token in ["", "invalid.token.here", "a.b", "not a token at all"] {
            assert_eq!(
                validate_session_token(token, &config),
                Err(AuthError::TokenInvalid)
            );
        }
    }

    #[test]
    fn test_tampered_token() {
        let config = get_test_config();
        let token = generate_session_token(1, Role::Regular, &config).unwrap();

        let tampered = format!("{}X", token);
        assert!(validate_session_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_forged_role_is_rejected() {
        let config = get_test_config();
        let token = generate_session_token(1, Role::Regular, &config).unwrap();
        let forged = sign_with(
            Header::new(SESSION_ALGORITHM),
            &Claims::new(1, Role::Admin, 3600),
            "some-other-secret",
        );

        // Graft an Admin payload onto a genuine signature.
        let genuine: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let grafted = format!("{}.{}.{}", genuine[0], forged_parts[1], genuine[2]);

        assert!(validate_session_token(&grafted, &config).is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config = get_test_config();
        let mut other = get_test_config();
        other.secret = "a-completely-different-signing-secret".to_string();

        let token = generate_session_token(1, Role::Admin, &other).unwrap();
        assert_eq!(
            validate_session_token(&token, &config),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_other_algorithms_are_rejected() {
        let config = get_test_config();
        let claims = Claims::new(1, Role::Admin, 3600);

        for alg in [Algorithm::HS384, Algorithm::HS512] {
            let token = sign_with(Header::new(alg), &claims, &config.secret);
            assert_eq!(
                validate_session_token(&token, &config),
                Err(AuthError::TokenInvalid),
                "{:?} must not be accepted",
                alg
            );
        }
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        let config = get_test_config();
        let token = generate_session_token(1, Role::Admin, &config).unwrap();
        let payload = token.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert!(validate_session_token(&unsigned, &config).is_err());
    }

    #[test]
    fn test_expired_token() {
        let config = get_test_config();
        let claims = Claims::new(1, Role::Regular, -3600);
        let token = sign_with(Header::new(SESSION_ALGORITHM), &claims, &config.secret);

        assert!(claims.exp < claims.iat);
        assert!(validate_session_token(&token, &config).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let config = get_test_config();
        let mut claims = Claims::new(1, Role::Regular, 3600);
        claims.sub = "alice".to_string();
        let token = sign_with(Header::new(SESSION_ALGORITHM), &claims, &config.secret);

        assert_eq!(
            validate_session_token(&token, &config),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_unknown_role() {
        let config = get_test_config();
        let claims = serde_json::json!({
            "sub": "1",
            "role": "Root",
            "exp": chrono::Utc::now().timestamp() + 3600,
            "iat": chrono::Utc::now().timestamp(),
        });
        let token = encode(
            &Header::new(SESSION_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_session_token(&token, &config).is_err());
    }
}
