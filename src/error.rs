use thiserror::Error;

/// Field-level checks applied when a row is built from user input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("String is too long.")]
    StringTooLong,

    #[error("ID must be positive.")]
    NegativeId,
}

/// Everything that can go wrong between reading a line and touching the file.
///
/// The `Display` text of each variant is the message shown at the prompt.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Syntax error. Could not parse statement.")]
    Syntax,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedStatement(String),

    #[error("Unrecognized command '{0}'.")]
    UnrecognizedMetaCommand(String),

    #[error("Error: Table full.")]
    TableFull,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Db file is corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("Tried to fetch page number out of bounds. {index} >= {max}")]
    PageOutOfBounds { index: usize, max: usize },

    #[error("Tried to flush page {index} which is not cached")]
    FlushUncached { index: usize },
}

impl DbError {
    /// Fatal errors mean the backing store can no longer be trusted and the
    /// session has to end. The rest only reject the current line.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DbError::Storage(_)
                | DbError::Corrupt { .. }
                | DbError::PageOutOfBounds { .. }
                | DbError::FlushUncached { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_not_fatal() {
        assert!(!DbError::Syntax.is_fatal());
        assert!(!DbError::TableFull.is_fatal());
        assert!(!DbError::from(ValidationError::NegativeId).is_fatal());
        assert!(!DbError::UnrecognizedStatement("foo".into()).is_fatal());
        assert!(!DbError::UnrecognizedMetaCommand(".foo".into()).is_fatal());
    }

    #[test]
    fn storage_errors_are_fatal() {
        let io = std::io::Error::other("disk gone");
        assert!(DbError::from(io).is_fatal());
        assert!(DbError::PageOutOfBounds { index: 100, max: 100 }.is_fatal());
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = DbError::from(ValidationError::StringTooLong);
        assert_eq!(err.to_string(), "String is too long.");
    }
}
