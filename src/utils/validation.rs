use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::employee::EmploymentStatus;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One failed rule, keyed by the wire (camelCase) field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Runs the derive-generated rules of `payload` and returns every failure.
pub fn validate_payload<T: Validate>(prefix: Option<&str>, payload: &T) -> Vec<Violation> {
    match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect_violations(prefix, &errors),
    }
}

/// Flattens `ValidationErrors` into a list sorted by field name.
pub fn collect_violations(prefix: Option<&str>, errors: &ValidationErrors) -> Vec<Violation> {
    let mut violations: Vec<Violation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = match prefix {
                Some(prefix) => format!("{}.{}", prefix, camel_case(field)),
                None => camel_case(field),
            };
            field_errors.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                Violation::new(field.clone(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

pub fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        // presence is checked by the length rule
        return Ok(());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            let mut err = ValidationError::new("date");
            err.message = Some("must be a date in YYYY-MM-DD format".into());
            err
        })
}

pub fn validate_year(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut err = ValidationError::new("year");
    err.message = Some("must be a four-digit year".into());
    Err(err)
}

pub fn validate_employment_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<EmploymentStatus>().is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("employment_status");
    err.message = Some("must be either 'fresher' or 'experienced'".into());
    Err(err)
}

/// Accepts `"2020"` and `2020` alike; form builders disagree on which they send.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
