// ⚠️ Error Taxonomy - per-line failures vs. source failures
// Two channels: a bad line never stops the run, an unreadable source always does

use thiserror::Error;

// ============================================================================
// PER-LINE ERRORS
// ============================================================================

/// Why a single roster line was rejected.
///
/// These are caught by the batch processor, logged with the line number and
/// the original text, and the run moves on to the next line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Structural: the line does not have the subtype's field count.
    #[error("expected {expected} fields but the line has {actual}")]
    WrongFieldCount { expected: usize, actual: usize },

    #[error("identifier '{value}' does not match pattern {pattern}")]
    InvalidIdentifierFormat { value: String, pattern: String },

    #[error("hire date '{value}' does not follow the dd/mm/yyyy format")]
    InvalidDateFormat { value: String },

    #[error("salary '{value}' is not a valid number")]
    InvalidSalary { value: String },

    #[error("annual revenue '{value}' is not a valid number")]
    InvalidRevenue { value: String },

    #[error("performance '{value}' is not a valid integer")]
    InvalidPerformance { value: String },

    #[error("grade '{value}' must be an integer between {min} and {max}")]
    InvalidGrade { value: String, min: i32, max: i32 },

    /// Cross-reference: no manager with this identifier in the batch so far or in the store.
    #[error("manager '{identifier}' was not found in the file or in the store")]
    ManagerNotFound { identifier: String },

    /// The external manager store could not answer the lookup.
    #[error("manager lookup for '{identifier}' failed: {message}")]
    ManagerLookupFailed { identifier: String, message: String },

    /// Classification: the leading character is not M, T or C.
    /// Carries the whole line; the message does not repeat it.
    #[error("unknown employee type: line must start with M, T or C")]
    UnknownRecordType { line: String },
}

impl RecordError {
    /// Short stable code, used in the rejection export
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::WrongFieldCount { .. } => "WrongFieldCount",
            RecordError::InvalidIdentifierFormat { .. } => "InvalidIdentifierFormat",
            RecordError::InvalidDateFormat { .. } => "InvalidDateFormat",
            RecordError::InvalidSalary { .. } => "InvalidSalary",
            RecordError::InvalidRevenue { .. } => "InvalidRevenue",
            RecordError::InvalidPerformance { .. } => "InvalidPerformance",
            RecordError::InvalidGrade { .. } => "InvalidGrade",
            RecordError::ManagerNotFound { .. } => "ManagerNotFound",
            RecordError::ManagerLookupFailed { .. } => "ManagerLookupFailed",
            RecordError::UnknownRecordType { .. } => "UnknownRecordType",
        }
    }
}

/// Outcome of one line: a built employee or the reason it was refused
pub type LineOutcome<T> = std::result::Result<T, RecordError>;

// ============================================================================
// SOURCE ERRORS
// ============================================================================

/// The roster could not be read at all. Terminal for the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read source '{path}': {reason}")]
    SourceUnavailable { path: String, reason: String },
}
