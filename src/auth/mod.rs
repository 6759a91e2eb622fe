/// Authentication module
///
/// Password hashing, session token issuing/verification and the access gate.

mod claims;
mod gate;
mod jwt;
mod password;

pub use claims::{Claims, VerifiedClaims};
pub use gate::{authorize, authorize_request, SESSION_COOKIE};
pub use jwt::{generate_session_token, validate_session_token};
pub use password::{hash_password, verify_password, MAX_HASH_COST, MIN_HASH_COST};
