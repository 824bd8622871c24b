//! Entities stored in the single table.
//!
//! Field rules are declared with `validator` attributes on each entity and
//! surfaced as the crate's [`ValidationError`] through [`Entity::validate`].

mod order;
mod product;
mod user;

use std::borrow::Cow;

pub use order::{Order, OrderStatus};
pub use product::Product;
pub use user::User;

use crate::error::ValidationError;
use crate::keys::{EntityKind, KeyPair};

/// Trait for any struct stored as an item payload.
///
/// `validate` runs before anything is written; `key` derives the item's
/// primary key and fails if an identity field is blank.
pub trait Entity: Send + Sync {
    const KIND: EntityKind;

    fn validate(&self) -> Result<(), ValidationError>;

    fn key(&self) -> Result<KeyPair, ValidationError>;
}

const REQUIRED: &str = "required";

/// Runs the derived rules of `entity` and reports the first failing field,
/// taking fields in `fields` order.
pub(crate) fn check<T: validator::Validate>(
    entity: &T,
    fields: &[&'static str],
) -> Result<(), ValidationError> {
    let Err(errors) = validator::Validate::validate(entity) else {
        return Ok(());
    };
    let by_field = errors.field_errors();

    for &field in fields {
        let Some((_, failures)) = by_field.iter().find(|(name, _)| &***name == field) else {
            continue;
        };
        let failure = failures
            .iter()
            .find(|e| e.code == REQUIRED)
            .or_else(|| failures.first());
        if let Some(failure) = failure {
            return Err(convert(field, failure));
        }
    }

    Err(ValidationError::new("entity", errors.to_string()))
}

fn convert(field: &'static str, failure: &validator::ValidationError) -> ValidationError {
    if failure.code == REQUIRED {
        return ValidationError::required(field);
    }
    match &failure.message {
        Some(message) => ValidationError::new(field, format!("{field} {message}")),
        None => ValidationError::new(field, format!("{field} is invalid ({})", failure.code)),
    }
}

fn failure(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new(REQUIRED));
    }
    Ok(())
}

/// Presence plus the dot-atom rules the `email` validator leaves out: no
/// leading, trailing or doubled dot in the local part, and a domain with at
/// least two labels.
pub(crate) fn email_address(value: &str) -> Result<(), validator::ValidationError> {
    not_blank(value)?;
    let invalid = || failure("email", "must be a valid email address");
    let (local, domain) = value.rsplit_once('@').ok_or_else(invalid)?;
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(invalid());
    }
    if !domain.contains('.') {
        return Err(invalid());
    }
    Ok(())
}

pub(crate) fn product_ids(products: &[String]) -> Result<(), validator::ValidationError> {
    if products.iter().any(|id| id.trim().is_empty()) {
        return Err(failure("product_id", "must not contain empty product ids"));
    }
    Ok(())
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(
            field,
            format!("{field} must be a finite number"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(email: &str) -> User {
        User {
            email: email.to_string(),
            name: "A".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_email() {
        for ok in ["a@x.com", "first.last@mail.example.org", "x+tag@y.io"] {
            assert_eq!(user_with(ok).validate(), Ok(()), "{ok} should be accepted");
        }
        let rejected = [
            "a",
            "a@",
            "@x.com",
            "a@x",
            "a@@x.com",
            "a@x..com",
            "a b@x.com",
            "a@x.com.",
            "a<b>@x.com",
            ".a@x.com",
            "a.@x.com",
            "a..b@x.com",
            "a@-x-.com",
            "\"@x.com",
        ];
        for bad in rejected {
            let err = user_with(bad).validate().unwrap_err();
            assert_eq!(err.field, "email", "{bad} should be rejected");
        }
    }

    #[test]
    fn test_blank_is_reported_as_required() {
        for blank in ["", " "] {
            assert_eq!(
                user_with(blank).validate(),
                Err(ValidationError::required("email"))
            );
        }
    }

    #[test]
    fn test_first_field_in_order_is_reported() {
        let user = User {
            name: String::new(),
            ..user_with("not-an-email")
        };
        assert_eq!(user.validate().unwrap_err().field, "email");
    }
}
