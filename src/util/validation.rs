//! Form-side checks the session store leaves to its callers.
//!
//! The store forwards whatever it is given to the provider; password policy
//! and required fields are enforced here, before any provider call.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const EMAIL_REQUIRED: &str = "Enter your email address.";
pub const SIGN_IN_FIELDS_REQUIRED: &str = "Enter both email and password.";

/// Inline message shown under an auth form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormFeedback {
    Error(String),
    Success(String),
}

impl FormFeedback {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Error(m) | Self::Success(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Check sign-up input. Returns the trimmed email.
///
/// # Errors
///
/// Returns the message to show inline: missing email, mismatched
/// confirmation (checked first), or a password shorter than
/// [`MIN_PASSWORD_LEN`] characters.
pub fn validate_sign_up(email: &str, password: &str, confirm: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EMAIL_REQUIRED);
    }
    if password != confirm {
        return Err(PASSWORDS_DO_NOT_MATCH);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PASSWORD_TOO_SHORT);
    }
    Ok(email.to_owned())
}

/// Check sign-in input. Returns the trimmed email.
///
/// # Errors
///
/// Returns [`SIGN_IN_FIELDS_REQUIRED`] when either field is blank.
pub fn validate_sign_in(email: &str, password: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(SIGN_IN_FIELDS_REQUIRED);
    }
    Ok(email.to_owned())
}
