//! # Identity Field Validation
//!
//! | Field | Rule |
//! |-------|------|
//! | `document_type` | one of `passport`, `national_id`, `drivers_license`, `other` |
//! | `document_number`, `nationality`, `full_name` | non-empty after trimming |
//! | `date_of_birth` | ISO-8601 date (`1990-04-01`) or RFC 3339 timestamp, from 1900-01-01 up to today |
//! | proof reference | non-empty |
//!
//! Accepted values are returned trimmed. Dates of birth are stored as
//! `%Y-%m-%d` whichever spelling was submitted, so the content hash sees one
//! form per date.

use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{DocumentType, IdentityFields, Timestamp};

use super::entities::IdentityForm;
use super::errors::IdentityError;

const CANONICAL_DATE: &str = "%Y-%m-%d";

/// Calendar date (UTC) of a Unix-millisecond timestamp.
pub fn utc_date(now_millis: Timestamp) -> NaiveDate {
    i64::try_from(now_millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.date_naive())
        .unwrap_or(NaiveDate::MAX)
}

/// Validate a submission and return the normalized fields. `today` bounds
/// the date of birth.
pub fn validate_identity(
    form: &IdentityForm,
    proof_ref: &str,
    today: NaiveDate,
) -> Result<IdentityFields, IdentityError> {
    let document_type: DocumentType = form
        .document_type
        .trim()
        .parse()
        .map_err(|_| IdentityError::invalid("document_type", "unsupported document type"))?;

    let fields = IdentityFields {
        document_type,
        document_number: non_empty("document_number", &form.document_number)?,
        date_of_birth: birth_date("date_of_birth", &form.date_of_birth, today)?,
        nationality: non_empty("nationality", &form.nationality)?,
        full_name: non_empty("full_name", &form.full_name)?,
    };

    if proof_ref.trim().is_empty() {
        return Err(IdentityError::invalid("proof_ref", "identity document is required"));
    }

    Ok(fields)
}

fn non_empty(field: &'static str, value: &str) -> Result<String, IdentityError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::invalid(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn birth_date(field: &'static str, value: &str, today: NaiveDate) -> Result<String, IdentityError> {
    let trimmed = value.trim();
    let date = NaiveDate::parse_from_str(trimmed, CANONICAL_DATE)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|t| t.date_naive()))
        .ok_or_else(|| IdentityError::invalid(field, "expected an ISO-8601 date"))?;

    let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    if date < earliest {
        return Err(IdentityError::invalid(field, "must not be before 1900-01-01"));
    }
    if date > today {
        return Err(IdentityError::invalid(field, "must not be in the future"));
    }
    Ok(date.format(CANONICAL_DATE).to_string())
}
