use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{email_address::EmailAddress, macros::nutype_string};

pub static SUBMISSION_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").unwrap());

pub static SUBMISSION_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{10,15}$").unwrap());

/// Longest address accepted on the wire (RFC 5321 forward-path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

nutype_string!(SubmissionName(validate(
    len_char_min = 2,
    len_char_max = 100,
    regex = SUBMISSION_NAME_REGEX
)));

nutype_string!(SubmissionSubject(validate(
    len_char_min = 5,
    len_char_max = 200
)));

nutype_string!(SubmissionMessage(validate(
    len_char_min = 10,
    len_char_max = 1000
)));

nutype_string!(SubmissionPhone(validate(regex = SUBMISSION_PHONE_REGEX)));

nutype_string!(SubmissionCompany(validate(len_char_max = 100)));

/// A raw contact form payload, exactly as decoded from the request body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// A fully validated contact form submission. Constructing one is only
/// possible through [`ContactRequest::validate`], so downstream consumers
/// never see partially valid data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmissionName,
    pub email: EmailAddress,
    pub subject: SubmissionSubject,
    pub message: SubmissionMessage,
    pub phone: Option<SubmissionPhone>,
    pub company: Option<SubmissionCompany>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", .0.iter().map(|err| err.message.as_str()).collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ContactRequest {
    /// Checks every field and returns either a complete submission or the
    /// full list of field errors. Trimming and email lowercasing are the
    /// only silent normalizations; empty optional fields count as absent.
    pub fn validate(self) -> Result<ContactSubmission, ValidationErrors> {
        let mut errors = Vec::new();

        let name = SubmissionName::try_new(self.name)
            .map_err(|err| {
                errors.push(FieldError {
                    field: "name",
                    message: match err {
                        SubmissionNameError::RegexViolated => {
                            "Name can only contain letters and spaces".into()
                        }
                        _ => "Name must be between 2 and 100 characters".into(),
                    },
                })
            })
            .ok();

        let email = validate_email(&self.email)
            .map_err(|message| errors.push(FieldError { field: "email", message }))
            .ok();

        let subject = SubmissionSubject::try_new(self.subject)
            .map_err(|_| {
                errors.push(FieldError {
                    field: "subject",
                    message: "Subject must be between 5 and 200 characters".into(),
                })
            })
            .ok();

        let message = SubmissionMessage::try_new(self.message)
            .map_err(|_| {
                errors.push(FieldError {
                    field: "message",
                    message: "Message must be between 10 and 1000 characters".into(),
                })
            })
            .ok();

        let phone = match non_empty(self.phone) {
            Some(raw) => SubmissionPhone::try_new(raw)
                .map_err(|_| {
                    errors.push(FieldError {
                        field: "phone",
                        message: "Please provide a valid phone number".into(),
                    })
                })
                .ok()
                .map(Some),
            None => Some(None),
        };

        let company = match non_empty(self.company) {
            Some(raw) => SubmissionCompany::try_new(raw)
                .map_err(|_| {
                    errors.push(FieldError {
                        field: "company",
                        message: "Company name cannot exceed 100 characters".into(),
                    })
                })
                .ok()
                .map(Some),
            None => Some(None),
        };

        match (name, email, subject, message, phone, company) {
            (Some(name), Some(email), Some(subject), Some(message), Some(phone), Some(company)) => {
                Ok(ContactSubmission {
                    name,
                    email,
                    subject,
                    message,
                    phone,
                    company,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Validates a single email address the way the contact form does: trim,
/// lowercase, length cap, then the full address grammar.
pub fn validate_email(raw: &str) -> Result<EmailAddress, String> {
    const MESSAGE: &str = "Please provide a valid email address";

    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() || normalized.len() > MAX_EMAIL_LENGTH {
        return Err(MESSAGE.into());
    }
    normalized.parse().map_err(|_| MESSAGE.into())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
