//! Centralized validation helpers.

/// Maximum length of a stage label (it becomes part of every output file name)
pub const MAX_LABEL_LENGTH: usize = 128;

/// Label validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty label provided")]
    EmptyLabel,
    #[error("Label too long: exceeds {MAX_LABEL_LENGTH} characters")]
    LabelTooLong,
    #[error("Invalid label '{0}': only letters, digits, '.', '-' and '_' are allowed")]
    InvalidLabel(String),
}

/// Validate a stage label used as the file-name part of an output prefix.
///
/// Labels are joined onto the temp directory, so anything that could escape
/// it (separators, `..`, control characters) is rejected rather than sanitized.
///
/// # Errors
///
/// Returns `ValidationError::EmptyLabel` if the label is blank,
/// `ValidationError::LabelTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidLabel` if it contains disallowed characters.
///
/// # Examples
///
/// ```
/// use variant_qc::utils::validation::validate_label;
///
/// assert!(validate_label("cges").is_ok());
/// assert!(validate_label("../etc").is_err());
/// ```
pub fn validate_label(label: &str) -> Result<&str, ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::EmptyLabel);
    }

    if label.len() > MAX_LABEL_LENGTH {
        return Err(ValidationError::LabelTooLong);
    }

    let allowed = label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !allowed || label.contains("..") || label.starts_with('.') {
        return Err(ValidationError::InvalidLabel(label.to_string()));
    }

    Ok(label)
}
