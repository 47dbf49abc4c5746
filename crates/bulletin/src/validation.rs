//! Client-side form checks, run before any request goes out.
//!
//! Every `validate_*` function returns the first problem it finds, in the
//! order the fields appear on the form. The [`ValidationError`] message is
//! meant to be shown to the user as-is, so a rendering layer never has to
//! map variants to text itself.
//!
//! These checks only save a round trip. The server validates again and
//! its answer wins.

use std::sync::LazyLock;

use bulletin_protocol::{BoardDraft, LoginRequest, SignupRequest};
use regex::Regex;

/// Longest title the board accepts, in characters.
pub const MAX_TITLE_CHARS: usize = 255;

/// Longest post body the board accepts, in characters.
pub const MAX_CONTENT_CHARS: usize = 255;

/// Shortest acceptable password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A form the user must fix. The message is shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error(
        "Passwords need at least 8 characters, including a letter, a digit and a symbol."
    )]
    WeakPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter your username and password.")]
    MissingCredentials,

    #[error("Please enter a title and content.")]
    MissingTitleOrContent,

    #[error("Titles are limited to 255 characters.")]
    TitleTooLong,

    #[error("Content is limited to 255 characters.")]
    ContentTooLong,
}

/// Checks a sign-up form. Errors are reported in form order: empty fields
/// first, then the e-mail, the password strength, and the confirmation.
pub fn validate_signup(form: &SignupRequest) -> Result<(), ValidationError> {
    if form.username.is_empty()
        || form.name.is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(&form.username) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_strong_password(&form.password) {
        return Err(ValidationError::WeakPassword);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Checks a login form: both fields must be filled in.
///
/// The e-mail format is deliberately not checked here; a malformed
/// username simply fails at the server like a wrong password would.
pub fn validate_login(form: &LoginRequest) -> Result<(), ValidationError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Checks a post before create or update.
///
/// Title and content must contain something other than whitespace, and
/// neither may exceed its limit ([`MAX_TITLE_CHARS`], [`MAX_CONTENT_CHARS`]).
/// Limits count characters, not bytes, so multi-byte text is not
/// penalized.
pub fn validate_board_draft(draft: &BoardDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
        return Err(ValidationError::MissingTitleOrContent);
    }
    if draft.title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    if draft.content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ValidationError::ContentTooLong);
    }
    Ok(())
}

/// Returns `true` for `local@domain.tld` shapes: no whitespace, exactly
/// one `@`, and a dot somewhere after it. This is a plausibility check,
/// not RFC 5322.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// At least [`MIN_PASSWORD_CHARS`] characters with an ASCII letter, an
/// ASCII digit, and a symbol. Anything outside `[A-Za-z0-9]` counts as a
/// symbol, underscore included.
pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_CHARS
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| !c.is_ascii_alphanumeric())
}
