/// Access Gate
///
/// Decides whether a request may reach a resource requiring a given tier.
/// The probe endpoints and `SessionGuard` both call `authorize_request`; this
/// is the only place a session cookie is read and verified.

use actix_web::HttpRequest;

use crate::account::Role;
use crate::auth::claims::VerifiedClaims;
use crate::auth::jwt::validate_session_token;
use crate::configuration::JwtSettings;
use crate::error::AuthError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "jwt";

/// Decide PERMIT (`Ok`) or DENY (`Err`) for a presented credential.
pub fn authorize(
    credential: Option<&str>,
    required: Role,
    config: &JwtSettings,
) -> Result<VerifiedClaims, AuthError> {
    let token = credential
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = validate_session_token(token, config)?;

    if !claims.role.satisfies(required) {
        return Err(AuthError::InsufficientRole);
    }

    Ok(claims)
}

/// Run the gate against the session cookie of an incoming request.
pub fn authorize_request(
    req: &HttpRequest,
    required: Role,
    config: &JwtSettings,
) -> Result<VerifiedClaims, AuthError> {
    let cookie = req.cookie(SESSION_COOKIE);
    let result = authorize(cookie.as_ref().map(|c| c.value()), required, config);

    match &result {
        Ok(claims) => tracing::debug!(
            account_id = claims.account_id,
            role = %claims.role,
            required = %required,
            "Access granted"
        ),
        Err(reason) => tracing::debug!(reason = %reason, required = %required, "Session rejected"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_session_token;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    fn config() -> JwtSettings {
        JwtSettings {
            secret: "gate-test-secret".to_string(),
            token_lifetime_seconds: 600,
            cookie_lifetime_seconds: 600,
        }
    }

    #[test]
    fn test_missing_credential_is_denied() {
        assert_eq!(
            authorize(None, Role::Regular, &config()),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            authorize(Some(""), Role::Regular, &config()),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn test_invalid_credential_is_denied() {
        assert_eq!(
            authorize(Some("garbage"), Role::Regular, &config()),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_regular_token_cannot_reach_admin() {
        let token = generate_session_token(1, Role::Regular, &config()).unwrap();
        assert_eq!(
            authorize(Some(token.as_str()), Role::Admin, &config()),
            Err(AuthError::InsufficientRole)
        );
    }

    #[test]
    fn test_permit_returns_claims() {
        let token = generate_session_token(5, Role::Regular, &config()).unwrap();
        let claims = authorize(Some(token.as_str()), Role::Regular, &config()).unwrap();
        assert_eq!(claims.account_id, 5);
        assert_eq!(claims.role, Role::Regular);

        let token = generate_session_token(9, Role::Admin, &config()).unwrap();
        assert!(authorize(Some(token.as_str()), Role::Admin, &config()).is_ok());
        assert!(authorize(Some(token.as_str()), Role::Regular, &config()).is_ok());
    }

    #[test]
    fn test_reads_session_cookie_only() {
        let token = generate_session_token(3, Role::Admin, &config()).unwrap();

        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
            .to_http_request();
        assert!(authorize_request(&req, Role::Admin, &config()).is_ok());

        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .cookie(Cookie::new("session", token))
            .to_http_request();
        assert_eq!(
            authorize_request(&req, Role::Admin, &config()),
            Err(AuthError::MissingToken)
        );
    }
}
