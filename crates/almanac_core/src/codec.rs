//! Text round-tripping for picker fields.
//!
//! One codec serves the three field kinds: the full value, the date
//! portion, and the time portion. Formatting an unset value yields the
//! empty string. Parsing trims first; all-whitespace input is
//! `Ok(None)` so callers can treat it as "leave the value alone", while
//! a pattern mismatch is a [`FieldParseError`] the caller answers by
//! reverting the displayed text. No fuzzy or partial parsing: the input
//! must match the field's pattern exactly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::clock::Precision;

/// Text did not match the exact pattern of its field.
#[derive(Debug, Error)]
#[error("`{input}` does not match `{placeholder}`")]
pub struct FieldParseError {
    /// The trimmed input that was rejected.
    pub input: String,
    /// Human-facing pattern of the field, e.g. `YYYY-MM-DD`.
    pub placeholder: &'static str,
    #[source]
    source: chrono::ParseError,
}

/// Formats and parses the three field texts at a fixed precision.
#[derive(Clone, Copy, Debug)]
pub struct TextCodec {
    precision: Precision,
}

impl TextCodec {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// chrono pattern of the full-value field. Date-only precision
    /// drops the time component from this field entirely.
    pub fn value_pattern(&self) -> &'static str {
        match self.precision {
            Precision::Seconds => "%Y-%m-%d %H:%M:%S",
            Precision::Minutes => "%Y-%m-%d %H:%M",
            Precision::DateOnly => "%Y-%m-%d",
        }
    }

    /// chrono pattern of the date field.
    pub fn date_pattern(&self) -> &'static str {
        "%Y-%m-%d"
    }

    /// chrono pattern of the time field.
    pub fn time_pattern(&self) -> &'static str {
        if self.precision.has_seconds() {
            "%H:%M:%S"
        } else {
            "%H:%M"
        }
    }

    /// Watermark text for the full-value field.
    pub fn value_placeholder(&self) -> &'static str {
        match self.precision {
            Precision::Seconds => "YYYY-MM-DD hh:mm:ss",
            Precision::Minutes => "YYYY-MM-DD hh:mm",
            Precision::DateOnly => "YYYY-MM-DD",
        }
    }

    /// Watermark text for the date field.
    pub fn date_placeholder(&self) -> &'static str {
        "YYYY-MM-DD"
    }

    /// Watermark text for the time field.
    pub fn time_placeholder(&self) -> &'static str {
        if self.precision.has_seconds() {
            "hh:mm:ss"
        } else {
            "hh:mm"
        }
    }

    pub fn format_value(&self, value: Option<NaiveDateTime>) -> String {
        match value {
            Some(dt) => dt.format(self.value_pattern()).to_string(),
            None => String::new(),
        }
    }

    pub fn format_date(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => d.format(self.date_pattern()).to_string(),
            None => String::new(),
        }
    }

    pub fn format_time(&self, time: Option<NaiveTime>) -> String {
        match time {
            Some(t) => t.format(self.time_pattern()).to_string(),
            None => String::new(),
        }
    }

    /// Parse full-value field text. `Ok(None)` for blank input.
    pub fn parse_value(&self, input: &str) -> Result<Option<NaiveDateTime>, FieldParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let parsed = if self.precision.has_time() {
            NaiveDateTime::parse_from_str(trimmed, self.value_pattern())
        } else {
            NaiveDate::parse_from_str(trimmed, self.value_pattern())
                .map(|d| d.and_time(NaiveTime::MIN))
        };
        match parsed {
            Ok(dt) => Ok(Some(self.precision.truncate(dt))),
            Err(source) => Err(self.reject(trimmed, self.value_placeholder(), source)),
        }
    }

    /// Parse date field text. `Ok(None)` for blank input.
    pub fn parse_date(&self, input: &str) -> Result<Option<NaiveDate>, FieldParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(trimmed, self.date_pattern()) {
            Ok(d) => Ok(Some(d)),
            Err(source) => Err(self.reject(trimmed, self.date_placeholder(), source)),
        }
    }

    /// Parse time field text. `Ok(None)` for blank input.
    pub fn parse_time(&self, input: &str) -> Result<Option<NaiveTime>, FieldParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match NaiveTime::parse_from_str(trimmed, self.time_pattern()) {
            Ok(t) => Ok(Some(self.precision.truncate_time(t))),
            Err(source) => Err(self.reject(trimmed, self.time_placeholder(), source)),
        }
    }

    fn reject(
        &self,
        input: &str,
        placeholder: &'static str,
        source: chrono::ParseError,
    ) -> FieldParseError {
        tracing::debug!("TextCodec::parse - rejected `{}` ({})", input, source);
        FieldParseError {
            input: input.to_string(),
            placeholder,
            source,
        }
    }
}
