use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::LazyLock;
use thiserror::Error;

/// local@domain.tld with no whitespace and a single `@`
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    EmptyField { field: &'static str },
    #[error("'{value}' is not a valid email address")]
    MalformedEmail { value: String },
}

/// Visitor data from the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Visitor data from the resume capture dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequesterInput {
    pub name: String,
    pub email: String,
}

/// An input that passed validation. Notification requests can only be
/// built from one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

/// Returns the address without surrounding whitespace, which is the form
/// that gets sent.
fn require_email(value: &str) -> Result<String, ValidationError> {
    require("email", value)?;
    let email = value.trim();
    if !is_email_shaped(email) {
        return Err(ValidationError::MalformedEmail {
            value: value.to_string(),
        });
    }
    Ok(email.to_string())
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

impl InquiryInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }

    /// Fields are checked in form order so the first reported error matches
    /// the first field the visitor would have to fix.
    pub fn validate(&self) -> Result<Validated<InquiryInput>, ValidationError> {
        require("name", &self.name)?;
        let email = require_email(&self.email)?;
        require("message", &self.message)?;
        Ok(Validated(InquiryInput {
            email,
            ..self.clone()
        }))
    }
}

impl DownloadRequesterInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }

    pub fn validate(&self) -> Result<Validated<DownloadRequesterInput>, ValidationError> {
        require("name", &self.name)?;
        let email = require_email(&self.email)?;
        Ok(Validated(DownloadRequesterInput {
            email,
            ..self.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_inquiry_validates() {
        let input = InquiryInput::new("A", "a@x.com", "hi");
        let validated = input.validate().unwrap();
        assert_eq!(validated.name, "A");
        assert_eq!(validated.into_inner(), input);
    }

    #[test]
    fn test_empty_fields_reported_in_form_order() {
        let err = InquiryInput::new("", "", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "name" });

        let err = InquiryInput::new("A", "a@x.com", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "message" });
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let err = DownloadRequesterInput::new("   ", "b@x.com")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "name" });
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("j@x.com"));
        assert!(is_email_shaped("first.last+tag@mail.example.org"));
        assert!(!is_email_shaped("no-at-sign.com"));
        assert!(!is_email_shaped("two@@x.com"));
        assert!(!is_email_shaped("spaces in@x.com"));
        assert!(!is_email_shaped("missing@tld"));
        assert!(!is_email_shaped("trailing@dot."));
    }

    #[test]
    fn test_email_surrounding_whitespace_is_stripped() {
        let validated = InquiryInput::new("A", "  a@x.com \n", "hi").validate().unwrap();
        assert_eq!(validated.email, "a@x.com");
        assert_eq!(validated.name, "A");

        let validated = DownloadRequesterInput::new("B", "\tb@x.com ").validate().unwrap();
        assert_eq!(validated.email, "b@x.com");
    }

    #[test]
    fn test_malformed_email_rejected() {
        let err = DownloadRequesterInput::new("B", "not-an-email")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::MalformedEmail { .. }));
        assert_eq!(err.to_string(), "'not-an-email' is not a valid email address");
    }

    #[test]
    fn test_default_inputs_are_empty() {
        assert!(InquiryInput::default().is_empty());
        assert!(DownloadRequesterInput::default().is_empty());
        assert!(!DownloadRequesterInput::new("B", "").is_empty());
    }
}
