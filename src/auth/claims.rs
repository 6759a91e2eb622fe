/// JWT Claims structure
///
/// `Claims` is the wire payload; `VerifiedClaims` is what the rest of the
/// service sees once a token has passed verification.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountId, Role};
use crate::error::AuthError;

/// JWT payload of a session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account id as a decimal string)
    pub sub: String,
    /// Capability tier of the account
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims expiring `lifetime_seconds` from now
    pub fn new(account_id: AccountId, role: Role, lifetime_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: account_id.to_string(),
            role,
            exp: now + lifetime_seconds,
            iat: now,
        }
    }
}

/// Identity and tier of a caller whose token verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub account_id: AccountId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Claims> for VerifiedClaims {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let account_id = claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| AuthError::TokenInvalid)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthError::TokenInvalid)?;

        Ok(Self {
            account_id,
            role: claims.role,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, Role::Admin, 3600);

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_verified_claims_from_wire_claims() {
        let claims = Claims::new(42, Role::Regular, 60);
        let exp = claims.exp;
        let verified = VerifiedClaims::try_from(claims).unwrap();

        assert_eq!(verified.account_id, 42);
        assert_eq!(verified.role, Role::Regular);
        assert_eq!(verified.expires_at.timestamp(), exp);
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let mut claims = Claims::new(1, Role::Regular, 60);
        claims.sub = "not-an-id".to_string();

        assert_eq!(
            VerifiedClaims::try_from(claims),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_role_wire_format() {
        let claims = Claims::new(1, Role::Admin, 60);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "Admin");
        assert_eq!(json["sub"], "1");
    }
}
