//! Field checks applied to a draft before it is submitted.

use super::errors::ValidationError;
use super::models::UserDraft;
use regex::Regex;
use std::sync::LazyLock;

// Same shape browsers accept for `<input type="email">`: the domain needs
// no dot, so `a@x` passes.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"#,
    )
    .expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Checks a draft in field order and reports the first problem.
///
/// A username of only whitespace counts as empty. The email is checked as
/// given; `DirectoryMachine::submit` trims it first, so whitespace reaching
/// this point makes it malformed.
pub fn validate_draft(draft: &UserDraft) -> Result<(), ValidationError> {
    if draft.username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if draft.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !is_valid_email(&draft.email) {
        return Err(ValidationError::MalformedEmail(draft.email.clone()));
    }
    Ok(())
}
