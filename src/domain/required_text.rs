use super::SubmissionError;

/// A submitted text field that is known to be present and non-empty.
///
/// Values are kept exactly as submitted. Whitespace is not trimmed and the
/// content is not sanitised or length-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Returns the field value if it was submitted and is not empty, or a
    /// [`SubmissionError::MissingField`] naming `field` otherwise.
    pub fn parse(value: Option<String>, field: &'static str) -> Result<Self, SubmissionError> {
        match value {
            Some(s) if !s.is_empty() => Ok(Self(s)),
            _ => Err(SubmissionError::MissingField(field)),
        }
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
