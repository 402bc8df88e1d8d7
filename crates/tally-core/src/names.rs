//! Metric and label name grammar.
//!
//! - metric: `[a-zA-Z_:][a-zA-Z0-9_:]*`
//! - label:  `[a-zA-Z_][a-zA-Z0-9_]*`, and never starting with `__`

use crate::error::{Result, TallyError};

pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false; };
    if !(first.is_ascii_alphabetic() || first == '_' || first == ':') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

pub fn is_valid_label_name(name: &str) -> bool {
    // `__` prefix is reserved for internal use.
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false; };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn validate_metric_name(name: &str) -> Result<()> {
    if is_valid_metric_name(name) {
        Ok(())
    } else {
        Err(TallyError::InvalidMetricName(name.to_string()))
    }
}

pub fn validate_label_name(name: &str) -> Result<()> {
    if is_valid_label_name(name) {
        Ok(())
    } else {
        Err(TallyError::InvalidLabelName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names() {
        assert!(is_valid_metric_name("http_requests_total"));
        assert!(is_valid_metric_name(":colon:prefixed"));
        assert!(is_valid_metric_name("_x9"));
        assert!(!is_valid_metric_name(""));
        assert!(!is_valid_metric_name("9lives"));
        assert!(!is_valid_metric_name("has-dash"));
        assert!(!is_valid_metric_name("spa ce"));
    }

    #[test]
    fn label_names() {
        assert!(is_valid_label_name("method"));
        assert!(is_valid_label_name("_private"));
        assert!(!is_valid_label_name("__reserved"));
        assert!(!is_valid_label_name("with:colon"));
        assert!(!is_valid_label_name("1st"));
        assert!(!is_valid_label_name(""));
    }

    #[test]
    fn validate_reports_kind() {
        let err = validate_label_name("__name__").unwrap_err();
        assert_eq!(err.kind().as_str(), "INVALID_LABEL_NAME");
        assert!(validate_metric_name("ok_name").is_ok());
    }
}
