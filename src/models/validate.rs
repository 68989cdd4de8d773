use std::collections::HashMap;

use crate::error::ApiError;

/// Accumulates field-level violations so a payload reports every problem
/// at once instead of failing on the first. Field keys use the wire-format
/// (camelCase) names.
#[derive(Debug, Default)]
pub struct Violations {
    errors: HashMap<String, String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn length_between(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.add(field, format!("must be between {} and {} characters", min, max));
        }
    }

    pub fn min_length(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(field, format!("must be at least {} characters", min));
        }
    }

    pub fn max_length(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("must be at most {} characters", max));
        }
    }

    pub fn positive(&mut self, field: &str, value: f64) {
        if value <= 0.0 {
            self.add(field, "must be greater than 0");
        }
    }

    pub fn positive_count(&mut self, field: &str, value: u32) {
        if value == 0 {
            self.add(field, "must be greater than 0");
        }
    }

    pub fn within(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if value < min || value > max {
            self.add(field, format!("must be between {} and {}", min, max));
        }
    }

    pub fn rating(&mut self, field: &str, value: u8) {
        if !(1..=5).contains(&value) {
            self.add(field, "must be between 1 and 5");
        }
    }

    pub fn non_empty<T>(&mut self, field: &str, items: &[T], message: &str) {
        if items.is_empty() {
            self.add(field, message);
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.add(field, "must be a valid email address");
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid field values", self.errors))
        }
    }
}

/// Minimal email grammar: one '@', non-empty local part, dotted domain with
/// non-empty labels, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_grammar() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));

        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@exa mple.com"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn bounds_count_characters_not_bytes() {
        let mut v = Violations::new();
        // Two chars, four bytes in UTF-8.
        v.length_between("name", "éé", 2, 10);
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn violations_collect_all_fields() {
        let mut v = Violations::new();
        v.min_length("sellerId", "abc", 5);
        v.positive("price", 0.0);
        let err = v.into_result().unwrap_err();

        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["sellerId"].is_string());
        assert!(body["field_errors"]["price"].is_string());
    }

    #[test]
    fn first_violation_per_field_wins() {
        let mut v = Violations::new();
        v.min_length("name", "x", 3);
        v.max_length("name", "x", 0);
        let err = v.into_result().unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["name"], "must be at least 3 characters");
    }
}
