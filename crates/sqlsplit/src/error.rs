use thiserror::Error;

/// Failure to install a new statement delimiter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterError {
    /// The command has no value.
    #[error("DELIMITER must be followed by a 'delimiter' character or string")]
    Missing,
    /// The value contains a backslash.
    #[error("DELIMITER cannot contain a backslash character")]
    ContainsBackslash,
    /// The value contains a space or a tab.
    #[error("DELIMITER should not contain blank spaces")]
    ContainsBlankSpace,
    /// The value is a single reserved word or operator.
    #[error("DELIMITER should not be a reserved keyword")]
    ReservedKeyword,
    /// The value holds nothing the lexer can scan.
    #[error("DELIMITER cannot be lexed into a token")]
    CannotExtractToken,
}

/// A delimiter command that could not be applied, with the 1-based line it
/// appears on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{source} at line {line}")]
pub struct SplitError {
    pub(crate) source: DelimiterError,
    pub(crate) line: usize,
}

impl SplitError {
    /// The underlying delimiter error.
    #[must_use]
    pub fn kind(&self) -> DelimiterError {
        self.source
    }

    /// 1-based line of the offending command.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}
