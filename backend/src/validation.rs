//! Pure field-level checks applied to incoming payloads before anything
//! reaches the store.
//!
//! Every check returns `Result<T, FieldError>`. Request types feed these
//! results through [`ValidationErrors::take`] so that a single pass reports
//! every failing field at once instead of stopping at the first one.

use std::fmt;

use serde::Serialize;

pub const DEFAULT_CURRENCY: &str = "XOF";
pub const CURRENCY_MIN_LEN: usize = 3;
pub const CURRENCY_MAX_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulates field errors across one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Unwraps a check result, recording the error and substituting a
    /// placeholder when it failed. The placeholder never escapes because
    /// [`ValidationErrors::finish`] refuses to build once anything was recorded.
    pub fn take<T: Default>(&mut self, result: Result<T, FieldError>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.push(e);
                T::default()
            }
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Trimmed, non-empty, at most `max` characters.
pub fn required_text(field: &'static str, value: Option<&str>, max: usize) -> Result<String, FieldError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    if char_len(trimmed) > max {
        return Err(FieldError::new(field, format!("must be at most {} characters", max)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed; blank input normalizes to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    let trimmed = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };
    if char_len(trimmed) > max {
        return Err(FieldError::new(field, format!("must be at most {} characters", max)));
    }
    Ok(Some(trimmed.to_string()))
}

/// Trimmed length must fall inside `[min, max]`.
pub fn bounded_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    let len = char_len(trimmed);
    if len < min || len > max {
        return Err(FieldError::new(
            field,
            format!("must be between {} and {} characters", min, max),
        ));
    }
    Ok(trimmed.to_string())
}

/// Absent is valid; present must be finite and within the inclusive range.
pub fn optional_in_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<Option<f64>, FieldError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= min && v <= max => Ok(Some(v)),
        Some(_) => Err(FieldError::new(
            field,
            format!("must be between {} and {}", min, max),
        )),
    }
}

pub fn strictly_positive(field: &'static str, value: Option<f64>) -> Result<f64, FieldError> {
    match value {
        None => Err(FieldError::new(field, "is required")),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(FieldError::new(field, "must be strictly greater than 0")),
    }
}

/// Upper-cased currency code, defaulting to [`DEFAULT_CURRENCY`] when absent.
pub fn currency_code(field: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    let normalized = value.unwrap_or(DEFAULT_CURRENCY).trim().to_uppercase();
    if normalized.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    // Upper-casing can lengthen a string ("ß" -> "SS"), so bound the result.
    bounded_text(field, &normalized, CURRENCY_MIN_LEN, CURRENCY_MAX_LEN)
}

pub fn positive_id(field: &'static str, value: Option<i64>) -> Result<Option<i64>, FieldError> {
    match value {
        Some(v) if v <= 0 => Err(FieldError::new(field, "must be a positive integer")),
        other => Ok(other),
    }
}

pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, FieldError> {
    value.ok_or_else(|| FieldError::new(field, "is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", Some("  Riz "), 120).unwrap(), "Riz");
        assert!(required_text("name", Some("   "), 120).is_err());
        assert!(required_text("name", None, 120).is_err());
    }

    #[test]
    fn required_text_counts_characters_not_bytes() {
        let accented = "é".repeat(120);
        assert!(required_text("name", Some(&accented), 120).is_ok());
        let too_long = "é".repeat(121);
        let err = required_text("name", Some(&too_long), 120).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn optional_text_normalizes_blank_to_none() {
        assert_eq!(optional_text("unit", Some("  "), 32).unwrap(), None);
        assert_eq!(optional_text("unit", None, 32).unwrap(), None);
        assert_eq!(optional_text("unit", Some(" kg "), 32).unwrap(), Some("kg".to_string()));
        assert!(optional_text("unit", Some(&"x".repeat(33)), 32).is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(optional_in_range("latitude", Some(-90.0), -90.0, 90.0).unwrap(), Some(-90.0));
        assert_eq!(optional_in_range("latitude", Some(90.0), -90.0, 90.0).unwrap(), Some(90.0));
        assert!(optional_in_range("latitude", Some(90.0001), -90.0, 90.0).is_err());
        assert!(optional_in_range("latitude", Some(f64::NAN), -90.0, 90.0).is_err());
        assert_eq!(optional_in_range("latitude", None, -90.0, 90.0).unwrap(), None);
    }

    #[test]
    fn strictly_positive_rejects_zero_negative_and_missing() {
        assert!(strictly_positive("value", Some(0.0)).is_err());
        assert!(strictly_positive("value", Some(-1.5)).is_err());
        assert!(strictly_positive("value", None).is_err());
        assert!(strictly_positive("value", Some(f64::INFINITY)).is_err());
        assert_eq!(strictly_positive("value", Some(0.01)).unwrap(), 0.01);
    }

    #[test]
    fn currency_is_uppercased_and_defaulted() {
        assert_eq!(currency_code("currency", Some(" xof ")).unwrap(), "XOF");
        assert_eq!(currency_code("currency", None).unwrap(), "XOF");
        assert_eq!(currency_code("currency", Some("usdt_erc")).unwrap(), "USDT_ERC");
        assert!(currency_code("currency", Some("eu")).is_err());
        assert!(currency_code("currency", Some("toolongcode")).is_err());
        assert!(currency_code("currency", Some("  ")).is_err());
    }

    #[test]
    fn currency_length_is_checked_after_uppercasing() {
        // Five characters in, ten out.
        let err = currency_code("currency", Some("ßßßßß")).unwrap_err();
        assert_eq!(err.field, "currency");
        assert_eq!(currency_code("currency", Some("ßß")).unwrap(), "SSSS");
    }

    #[test]
    fn take_collects_every_failure() {
        let mut errors = ValidationErrors::new();
        let name: String = errors.take(required_text("name", Some(""), 10));
        let value: f64 = errors.take(strictly_positive("value", Some(-1.0)));
        let unit = errors.take(optional_text("unit", Some("kg"), 10));

        assert_eq!(name, "");
        assert_eq!(value, 0.0);
        assert_eq!(unit.as_deref(), Some("kg"));
        assert!(errors.has_field("name"));
        assert!(errors.has_field("value"));
        assert_eq!(errors.errors().len(), 2);
        assert!(errors.finish(()).is_err());
    }

    #[test]
    fn positive_id_rejects_non_positive() {
        assert!(positive_id("user_id", Some(0)).is_err());
        assert_eq!(positive_id("user_id", None).unwrap(), None);
        assert!(positive_id("user_id", Some(-5)).is_err());
        assert_eq!(positive_id("user_id", Some(3)).unwrap(), Some(3));
    }
}
