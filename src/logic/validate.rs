use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use std::fmt;

use crate::model::{non_empty, Id};

/// Which end of a date range a value belongs to; used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Start => f.write_str("start"),
            DateField::End => f.write_str("end"),
        }
    }
}

/// Rejection reasons. The `Display` text is what the client receives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill all required fields. Missing required field: {0}.")]
    MissingFields(String),

    #[error("Invalid {0} date format. Use yyyy-MM-dd.")]
    InvalidDate(DateField),

    #[error("End date cannot be before start date.")]
    EndBeforeStart,

    #[error("Id in the route ({route}) does not match id in the body ({body}).")]
    IdMismatch { route: Id, body: Id },

    #[error("No image file provided.")]
    MissingImage,

    #[error("{0}")]
    Malformed(String),
}

/// Fails with every blank field named, in the order given.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ValidationError> {
    let missing = fields
        .iter()
        .filter(|(_, value)| non_empty(*value).is_none())
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing.iter().join(", ")))
    }
}

/// Parses a date that must be written exactly as `yyyy-MM-dd`.
pub fn parse_date_exact(input: &str, field: DateField) -> Result<NaiveDate, ValidationError> {
    if !has_iso_date_shape(input) {
        return Err(ValidationError::InvalidDate(field));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(field))
}

/// Exact parse of an optional date; blank input means no date.
pub fn parse_optional_date_exact(
    input: Option<&str>,
    field: DateField,
) -> Result<Option<NaiveDate>, ValidationError> {
    non_empty(input)
        .map(|value| parse_date_exact(value, field))
        .transpose()
}

const LOOSE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const LOOSE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Lenient parse used by the date edit endpoints: unpadded numbers, slash and
/// dot separators, month names and full timestamps are all accepted.
pub fn parse_date_loose(input: &str, field: DateField) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();

    if let Some(date) = LOOSE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
    {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.date_naive());
    }

    LOOSE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|timestamp| timestamp.date())
        .ok_or(ValidationError::InvalidDate(field))
}

/// Rejects a range whose end falls before its start. Open ranges pass.
pub fn ensure_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}

/// `0001-01-01` is what a cleared date picker submits; the category start date
/// edit treats it as "no date provided".
pub fn is_unset_date(date: NaiveDate) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1) == Some(date)
}

fn has_iso_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_require_fields_names_every_missing_field() {
        assert!(require_fields(&[("name", Some("Tech")), ("url", Some("tech"))]).is_ok());

        let err = require_fields(&[
            ("title", Some("Cars")),
            ("description", Some("")),
            ("tabs", None),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields("description, tabs".to_string())
        );
        assert!(err
            .to_string()
            .ends_with("Missing required field: description, tabs."));
    }

    #[test]
    fn test_parse_date_exact_accepts_iso_dates() {
        assert_eq!(
            parse_date_exact("2024-01-01", DateField::Start),
            Ok(date(2024, 1, 1))
        );
        assert_eq!(
            parse_date_exact("2024-02-29", DateField::End),
            Ok(date(2024, 2, 29))
        );
    }

    #[test]
    fn test_parse_date_exact_rejects_malformed_input() {
        for input in [
            "2024-13-40",
            "not-a-date",
            "2024-1-5",
            "2024/01/01",
            "01/05/2024",
            "2023-02-29",
            " 2024-01-01",
            "",
        ] {
            assert_eq!(
                parse_date_exact(input, DateField::Start),
                Err(ValidationError::InvalidDate(DateField::Start)),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_optional_date_exact_treats_blank_as_absent() {
        assert_eq!(parse_optional_date_exact(None, DateField::End), Ok(None));
        assert_eq!(parse_optional_date_exact(Some(""), DateField::End), Ok(None));
        assert_eq!(
            parse_optional_date_exact(Some("2024-03-04"), DateField::End),
            Ok(Some(date(2024, 3, 4)))
        );
        assert_eq!(
            parse_optional_date_exact(Some("soon"), DateField::End),
            Err(ValidationError::InvalidDate(DateField::End))
        );
    }

    #[test]
    fn test_parse_date_loose_accepts_common_forms() {
        let expected = date(2024, 1, 5);
        for input in [
            "2024-01-05",
            "2024-1-5",
            "2024/01/05",
            "01/05/2024",
            "05.01.2024",
            "January 5, 2024",
            "Jan 5 2024",
            "5 January 2024",
            "2024-01-05T10:30:00",
            "2024-01-05T10:30:00+02:00",
        ] {
            assert_eq!(
                parse_date_loose(input, DateField::Start),
                Ok(expected),
                "{input:?} should parse"
            );
        }
    }

    #[test]
    fn test_parse_date_loose_rejects_garbage() {
        for input in ["2024-13-40", "not-a-date", ""] {
            assert_eq!(
                parse_date_loose(input, DateField::End),
                Err(ValidationError::InvalidDate(DateField::End))
            );
        }
    }

    #[test]
    fn test_ensure_date_range() {
        let start = Some(date(2024, 1, 1));
        assert!(ensure_date_range(start, Some(date(2024, 1, 1))).is_ok());
        assert!(ensure_date_range(start, Some(date(2024, 6, 1))).is_ok());
        assert!(ensure_date_range(start, None).is_ok());
        assert!(ensure_date_range(None, Some(date(2020, 1, 1))).is_ok());
        assert_eq!(
            ensure_date_range(start, Some(date(2023, 12, 31))),
            Err(ValidationError::EndBeforeStart)
        );
        assert_eq!(
            ValidationError::EndBeforeStart.to_string(),
            "End date cannot be before start date."
        );
    }

    #[test]
    fn test_unset_date_sentinel() {
        assert!(is_unset_date(date(1, 1, 1)));
        assert!(!is_unset_date(date(1970, 1, 1)));
        assert_eq!(parse_date_loose("0001-01-01", DateField::Start), Ok(date(1, 1, 1)));
    }
}
