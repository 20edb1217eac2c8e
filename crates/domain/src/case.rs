//! Filing case types: case numbers, lifecycle status, and admin updates.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use hsg_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CaseId, IntakeId, IntakeRecord};

/// Prefix carried by every case number issued by the firm.
pub const CASE_NUMBER_PREFIX: &str = "HSG";

/// Lowest random sequence value a case number may carry.
pub const CASE_SEQUENCE_MIN: u16 = 1000;

/// Highest random sequence value a case number may carry.
pub const CASE_SEQUENCE_MAX: u16 = 9999;

/// Human-readable case identifier shaped `HSG-YYYY-SUFFIX`.
///
/// The suffix is either a four-digit sequence or an uppercase base-36
/// timestamp issued when random sequences are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseNumber(String);

impl CaseNumber {
    /// Builds a case number from its year and suffix.
    pub fn new(year: i32, suffix: &str) -> AppResult<Self> {
        if !(1000..=9999).contains(&year) {
            return Err(AppError::Validation(format!(
                "case number year must have four digits, got {year}"
            )));
        }

        if suffix.is_empty()
            || !suffix
                .chars()
                .all(|character| character.is_ascii_digit() || character.is_ascii_uppercase())
        {
            return Err(AppError::Validation(format!(
                "case number suffix must be uppercase alphanumeric, got '{suffix}'"
            )));
        }

        Ok(Self(format!("{CASE_NUMBER_PREFIX}-{year}-{suffix}")))
    }

    /// Builds a case number from a random four-digit sequence.
    pub fn from_sequence(year: i32, sequence: u16) -> AppResult<Self> {
        if !(CASE_SEQUENCE_MIN..=CASE_SEQUENCE_MAX).contains(&sequence) {
            return Err(AppError::Validation(format!(
                "case sequence must be within {CASE_SEQUENCE_MIN}..={CASE_SEQUENCE_MAX}, got {sequence}"
            )));
        }

        Self::new(year, sequence.to_string().as_str())
    }

    /// Parses a stored or transported case number.
    pub fn parse(value: &str) -> AppResult<Self> {
        let mut parts = value.splitn(3, '-');
        let (Some(prefix), Some(year), Some(suffix)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::Validation(format!(
                "case number '{value}' must look like {CASE_NUMBER_PREFIX}-YYYY-SUFFIX"
            )));
        };

        if prefix != CASE_NUMBER_PREFIX {
            return Err(AppError::Validation(format!(
                "case number '{value}' must start with {CASE_NUMBER_PREFIX}-"
            )));
        }

        if year.len() != 4 || !year.chars().all(|character| character.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "case number '{value}' has an invalid year"
            )));
        }

        let year = year
            .parse::<i32>()
            .map_err(|error| AppError::Validation(format!("invalid case number year: {error}")))?;

        Self::new(year, suffix)
    }

    /// Returns the year segment.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.segments()
            .and_then(|(year, _)| year.parse().ok())
            .unwrap_or_default()
    }

    /// Returns the suffix segment.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.segments()
            .map(|(_, suffix)| suffix)
            .unwrap_or_default()
    }

    /// Returns the random sequence when the suffix is a four-digit number.
    #[must_use]
    pub fn sequence(&self) -> Option<u16> {
        let suffix = self.suffix();
        if suffix.len() != 4 || !suffix.chars().all(|character| character.is_ascii_digit()) {
            return None;
        }

        suffix.parse().ok()
    }

    /// Returns the full case number string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn segments(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix(CASE_NUMBER_PREFIX)?.strip_prefix('-')?;
        rest.split_once('-')
    }
}

impl Display for CaseNumber {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for CaseNumber {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<CaseNumber> for String {
    fn from(value: CaseNumber) -> Self {
        value.0
    }
}

/// Lifecycle status of a filing case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    /// Freshly created from an intake.
    New,
    /// Being reviewed by staff.
    InReview,
    /// Waiting on information from the client.
    NeedsInfo,
    /// Work underway.
    InProgress,
    /// Filed with the relevant authority.
    Filed,
    /// Closed out.
    Completed,
}

impl CaseStatus {
    /// Returns the stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InReview => "IN_REVIEW",
            Self::NeedsInfo => "NEEDS_INFO",
            Self::InProgress => "IN_PROGRESS",
            Self::Filed => "FILED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns all statuses in workflow order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::New,
            Self::InReview,
            Self::NeedsInfo,
            Self::InProgress,
            Self::Filed,
            Self::Completed,
        ]
    }

    /// Parses a transport value into a status.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for CaseStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown case status '{value}'")))
    }
}

/// Persisted filing case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingCase {
    /// Case identifier.
    pub id: CaseId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Intake that produced this case.
    pub intake_id: IntakeId,
    /// Human-readable case number.
    pub case_number: CaseNumber,
    /// Current status.
    pub status: CaseStatus,
    /// Staff member handling the case.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Free-form staff notes.
    pub notes: Option<String>,
}

/// A filing case joined with the intake it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseWithIntake {
    /// The case row.
    pub case: FilingCase,
    /// The linked intake, when it still exists.
    pub intake: Option<IntakeRecord>,
}

/// Status filter applied when listing cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStatusFilter {
    /// Every status.
    #[default]
    All,
    /// Only cases in the given status.
    Only(CaseStatus),
}

impl CaseStatusFilter {
    /// Parses the optional `status` query value; absent or `ALL` means no filter.
    pub fn from_query(value: Option<&str>) -> AppResult<Self> {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            None | Some("ALL") => Ok(Self::All),
            Some(status) => CaseStatus::from_transport(status).map(Self::Only),
        }
    }

    /// Returns whether a case status passes the filter.
    #[must_use]
    pub fn matches(&self, status: CaseStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == status,
        }
    }
}

/// Whitelisted admin update to a filing case.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CasePatch {
    /// New status.
    pub status: Option<CaseStatus>,
    /// New assignee.
    pub assigned_to: Option<Option<String>>,
    /// New due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

impl CasePatch {
    /// Builds a patch from a loosely typed JSON object.
    ///
    /// Unknown keys and unknown statuses are ignored. Empty strings and
    /// `null` clear a field.
    pub fn from_json(body: &Map<String, Value>) -> AppResult<Self> {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .and_then(|value| CaseStatus::from_transport(value).ok());

        let assigned_to = optional_text(body, "assigned_to")?;
        let notes = optional_text(body, "notes")?;
        let due_date = optional_text(body, "due_date")?
            .map(|value| {
                value
                    .map(|date| {
                        NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").map_err(|error| {
                            AppError::Validation(format!(
                                "due_date must be formatted as YYYY-MM-DD: {error}"
                            ))
                        })
                    })
                    .transpose()
            })
            .transpose()?;

        Ok(Self {
            status,
            assigned_to,
            due_date,
            notes,
        })
    }

    /// Returns whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
            && self.notes.is_none()
    }

    /// Applies the patch to a case in place.
    pub fn apply_to(&self, case: &mut FilingCase) {
        if let Some(status) = self.status {
            case.status = status;
        }
        if let Some(assigned_to) = &self.assigned_to {
            case.assigned_to.clone_from(assigned_to);
        }
        if let Some(due_date) = self.due_date {
            case.due_date = due_date;
        }
        if let Some(notes) = &self.notes {
            case.notes.clone_from(notes);
        }
    }
}

fn optional_text(body: &Map<String, Value>, key: &str) -> AppResult<Option<Option<String>>> {
    match body.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(value)) if value.is_empty() => Ok(Some(None)),
        Some(Value::String(value)) => Ok(Some(Some(value.clone()))),
        Some(_) => Err(AppError::Validation(format!(
            "{key} must be a string or null"
        ))),
    }
}
