/// A payload field that failed the post-deserialization check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn blank(field: &'static str) -> Self {
        Self {
            field,
            reason: "must not be blank",
        }
    }
}

/// Checks a deserialized payload before it reaches a handler.
///
/// Deserialization already enforces presence and types of every field, so
/// implementations only cover what serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::blank(field));
    }
    Ok(())
}
