/// Input validators for account credentials
///
/// Limits follow the `account` table (`user_name varchar(50)`) and bcrypt,
/// which only reads the first 72 bytes of a password.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 50;
const MAX_PASSWORD_BYTES: usize = 72;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
}

/// Validates a username and returns it trimmed
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("userName".to_string()));
    }

    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong("userName".to_string(), MAX_USERNAME_LENGTH));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("userName".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a password before it is hashed
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooManyBytes("password".to_string(), MAX_PASSWORD_BYTES));
    }

    Ok(())
}

/// Parses an account id taken from a request path
pub fn parse_account_id(raw: &str) -> Result<i32, ValidationError> {
    raw.parse::<i32>()
        .map_err(|_| ValidationError::InvalidId(raw.to_string()))
}
