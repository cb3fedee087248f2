use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::FormatItem, macros::format_description, Date};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// Path ids that do not parse are reported the same way as unknown ids.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// Collects field errors for a request body; failures are reported all at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_empty(&mut self, param: &str, value: Option<&str>, msg: &str) -> &mut Self {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.errors.push(FieldError::body(param, value, msg));
        }
        self
    }

    /// Records `msg` for `param` unless `ok` holds.
    pub fn check(&mut self, ok: bool, param: &str, value: Option<&str>, msg: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::body(param, value, msg));
        }
        self
    }

    pub fn email(&mut self, param: &str, value: Option<&str>, msg: &str) -> &mut Self {
        if !value.is_some_and(is_valid_email) {
            self.errors.push(FieldError::body(param, value, msg));
        }
        self
    }

    pub fn min_len(&mut self, param: &str, value: Option<&str>, min: usize, msg: &str) -> &mut Self {
        if value.map_or(0, |v| v.chars().count()) < min {
            // never echo secrets back
            self.errors.push(FieldError::body(param, None, msg));
        }
        self
    }

    /// Required `YYYY-MM-DD` date.
    pub fn date(&mut self, param: &str, value: Option<&str>, msg: &str) -> Option<Date> {
        match value.filter(|v| !v.trim().is_empty()) {
            None => {
                self.errors.push(FieldError::body(param, value, msg));
                None
            }
            Some(raw) => self.optional_date(param, Some(raw)),
        }
    }

    pub fn optional_date(&mut self, param: &str, value: Option<&str>) -> Option<Date> {
        let raw = value.filter(|v| !v.trim().is_empty())?;
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.errors.push(FieldError::body(param, Some(raw), "Invalid date"));
        }
        parsed
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}
