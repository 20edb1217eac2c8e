//! Intake submission types and form validation rules.

use chrono::{DateTime, Utc};
use hsg_core::{AppResult, FieldErrors};
use serde::{Deserialize, Serialize};

use crate::IntakeId;

/// Maximum number of characters accepted for the contact name.
pub const NAME_MAX_LENGTH: usize = 200;

/// Maximum number of characters accepted for the phone number.
pub const PHONE_MAX_LENGTH: usize = 30;

/// Maximum number of characters accepted for the free-form message.
pub const MESSAGE_MAX_LENGTH: usize = 5000;

/// Summary message returned when one or more intake fields are invalid.
pub const INTAKE_VALIDATION_MESSAGE: &str = "Please fix the highlighted fields.";

/// Raw intake form values as received from the public form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeDraft {
    /// Contact name.
    #[serde(default)]
    pub name: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Selected business stage.
    #[serde(default)]
    pub business_stage: String,
    /// Selected service.
    #[serde(default)]
    pub service_needed: String,
    /// Optional free-form message.
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated intake submission ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeSubmission {
    name: String,
    email: EmailAddress,
    phone: String,
    business_stage: String,
    service_needed: String,
    message: Option<String>,
}

impl IntakeSubmission {
    /// Validates a draft, collecting the first error for every invalid field.
    pub fn validate(draft: IntakeDraft) -> AppResult<Self> {
        let mut errors = FieldErrors::new();

        let name = draft.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required.");
        } else if name.chars().count() > NAME_MAX_LENGTH {
            errors.add("name", "Name must be under 200 characters.");
        }

        let email = draft.email.trim();
        let parsed_email = if email.is_empty() {
            errors.add("email", "Email is required.");
            None
        } else {
            match EmailAddress::new(email) {
                Ok(address) => Some(address),
                Err(_) => {
                    errors.add("email", "Please enter a valid email address.");
                    None
                }
            }
        };

        let phone = draft.phone.trim();
        if phone.is_empty() {
            errors.add("phone", "Phone number is required.");
        } else if phone.chars().count() > PHONE_MAX_LENGTH {
            errors.add("phone", "Phone number is too long.");
        }

        if draft.business_stage.is_empty() {
            errors.add("businessStage", "Business stage is required.");
        }

        if draft.service_needed.is_empty() {
            errors.add("serviceNeeded", "Service selection is required.");
        }

        let message = draft.message.unwrap_or_default();
        if message.chars().count() > MESSAGE_MAX_LENGTH {
            errors.add("message", "Message must be under 5,000 characters.");
        }

        errors.into_result(INTAKE_VALIDATION_MESSAGE)?;

        let Some(email) = parsed_email else {
            return Err(hsg_core::AppError::Internal(
                "email validation produced no address".to_owned(),
            ));
        };

        Ok(Self {
            name: name.to_owned(),
            email,
            phone: phone.to_owned(),
            business_stage: draft.business_stage,
            service_needed: draft.service_needed,
            message: (!message.is_empty()).then_some(message),
        })
    }

    /// Returns the trimmed contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the validated email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the trimmed phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Returns the selected business stage.
    #[must_use]
    pub fn business_stage(&self) -> &str {
        self.business_stage.as_str()
    }

    /// Returns the selected service.
    #[must_use]
    pub fn service_needed(&self) -> &str {
        self.service_needed.as_str()
    }

    /// Returns the message, if one was provided.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Persisted intake submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    /// Intake identifier.
    pub id: IntakeId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Selected business stage.
    pub business_stage: String,
    /// Selected service.
    pub service_needed: String,
    /// Optional message.
    pub message: Option<String>,
}

/// Structurally validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Requires exactly one `@`, a non-empty local part, a dotted domain with
    /// non-empty labels, and no whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        let invalid = |reason: &str| {
            Err(hsg_core::AppError::Validation(format!(
                "invalid email address: {reason}"
            )))
        };

        if trimmed.is_empty() {
            return invalid("must not be empty");
        }

        if trimmed.chars().any(char::is_whitespace) {
            return invalid("must not contain whitespace");
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return invalid("must contain '@'");
        };

        if local.is_empty() || domain.contains('@') {
            return invalid("must contain exactly one '@' after a local part");
        }

        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return invalid("domain must contain non-empty dotted labels");
        }

        if trimmed.len() > 254 {
            return invalid("must not exceed 254 characters");
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Business maturity options offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessStage {
    /// Idea stage.
    Idea,
    /// Preparing to launch.
    PreLaunch,
    /// Formed within the last year.
    NewlyFormed,
    /// Operating for one to three years.
    Operating,
    /// Operating for more than three years.
    Scaling,
}

impl BusinessStage {
    /// Returns all stages in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Idea,
            Self::PreLaunch,
            Self::NewlyFormed,
            Self::Operating,
            Self::Scaling,
        ]
    }

    /// Returns the stable form value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::PreLaunch => "pre-launch",
            Self::NewlyFormed => "newly-formed",
            Self::Operating => "operating",
            Self::Scaling => "scaling",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idea => "Idea Stage",
            Self::PreLaunch => "Pre-Launch",
            Self::NewlyFormed => "Newly Formed (0–12 months)",
            Self::Operating => "Operating (1–3 years)",
            Self::Scaling => "Scaling (3+ years)",
        }
    }
}

/// Service options offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// Business formation and structuring.
    Formation,
    /// Compliance and operations setup.
    Compliance,
    /// Strategic advisory.
    Advisory,
    /// Managed business services.
    Managed,
    /// Business credit enablement.
    CreditEnablement,
    /// Anything else.
    Other,
}

impl ServiceType {
    /// Returns all service types in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Formation,
            Self::Compliance,
            Self::Advisory,
            Self::Managed,
            Self::CreditEnablement,
            Self::Other,
        ]
    }

    /// Returns the stable form value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formation => "formation",
            Self::Compliance => "compliance",
            Self::Advisory => "advisory",
            Self::Managed => "managed",
            Self::CreditEnablement => "credit-enablement",
            Self::Other => "other",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Formation => "Business Formation & Structuring",
            Self::Compliance => "Compliance & Operations Setup",
            Self::Advisory => "Strategic Advisory",
            Self::Managed => "Managed Business Services",
            Self::CreditEnablement => "Credit Enablement",
            Self::Other => "Other / Not Sure",
        }
    }
}

#[cfg(test)]
mod tests {
    use hsg_core::AppError;

    use super::{EmailAddress, IntakeDraft, IntakeSubmission};

    fn valid_draft() -> IntakeDraft {
        IntakeDraft {
            name: "  Dana Whitfield ".to_owned(),
            email: "dana@example.com".to_owned(),
            phone: "555-0100".to_owned(),
            business_stage: "operating".to_owned(),
            service_needed: "formation".to_owned(),
            message: None,
        }
    }

    #[test]
    fn valid_draft_is_trimmed_and_accepted() {
        let submission = IntakeSubmission::validate(valid_draft());
        assert!(submission.is_ok());

        let submission = match submission {
            Ok(value) => value,
            Err(error) => panic!("unexpected validation error: {error}"),
        };
        assert_eq!(submission.name(), "Dana Whitfield");
        assert_eq!(submission.message(), None);
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let result = IntakeSubmission::validate(IntakeDraft::default());

        let Err(AppError::InvalidFields { fields, .. }) = result else {
            panic!("expected field errors");
        };
        assert_eq!(fields.get("name"), Some("Name is required."));
        assert_eq!(fields.get("email"), Some("Email is required."));
        assert_eq!(fields.get("phone"), Some("Phone number is required."));
        assert_eq!(
            fields.get("businessStage"),
            Some("Business stage is required.")
        );
        assert_eq!(
            fields.get("serviceNeeded"),
            Some("Service selection is required.")
        );
        assert_eq!(fields.get("message"), None);
    }

    #[test]
    fn overlong_values_are_rejected() {
        let mut draft = valid_draft();
        draft.name = "x".repeat(201);
        draft.phone = "1".repeat(31);
        draft.message = Some("m".repeat(5001));

        let Err(AppError::InvalidFields { fields, .. }) = IntakeSubmission::validate(draft) else {
            panic!("expected field errors");
        };
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn empty_message_is_stored_as_none() {
        let mut draft = valid_draft();
        draft.message = Some(String::new());

        let submission = IntakeSubmission::validate(draft);
        assert!(submission.is_ok_and(|value| value.message().is_none()));
    }

    #[test]
    fn email_requires_dotted_domain() {
        assert!(EmailAddress::new("dana@example").is_err());
        assert!(EmailAddress::new("dana@@example.com").is_err());
        assert!(EmailAddress::new("da na@example.com").is_err());
        assert!(EmailAddress::new("dana@example.com").is_ok());
    }
}
