//! Input checks applied before a create or update request is sent.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{NewUser, UserPatch};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// One rejected field and the message to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .fields.iter().map(|f| f.message).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message)
    }
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();

        if self.name.trim().is_empty() {
            fields.push(FieldError {
                field: "name",
                message: "Name is required",
            });
        }

        if self.email.trim().is_empty() {
            fields.push(FieldError {
                field: "email",
                message: "Email is required",
            });
        } else if !EMAIL.is_match(&self.email) {
            fields.push(FieldError {
                field: "email",
                message: "Please enter a valid email address",
            });
        }

        if self.phone.trim().is_empty() {
            fields.push(FieldError {
                field: "phone",
                message: "Phone Number is required",
            });
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }
}

impl UserPatch {
    /// Check only the fields the patch carries; absent fields stay as they are.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();

        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            fields.push(FieldError {
                field: "name",
                message: "Name is required",
            });
        }

        match self.email.as_deref() {
            Some(email) if email.trim().is_empty() => fields.push(FieldError {
                field: "email",
                message: "Email is required",
            }),
            Some(email) if !EMAIL.is_match(email) => fields.push(FieldError {
                field: "email",
                message: "Please enter a valid email address",
            }),
            _ => {}
        }

        if self.phone.as_deref().is_some_and(|p| p.trim().is_empty()) {
            fields.push(FieldError {
                field: "phone",
                message: "Phone number is required",
            });
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }
}
