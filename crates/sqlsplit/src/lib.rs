//! Splits SQL scripts and dumps into individually executable statements.
//!
//! A script is split on its statement delimiter, which scripts may redefine
//! with `DELIMITER <value>` or `\d <value>`. Stored routines, triggers and
//! other compound statements contain the delimiter inside `BEGIN … END`,
//! `IF … END IF` and friends; those blocks are kept in one piece. Input is
//! bytes, and malformed UTF-8 or text that is not SQL at all never stops the
//! split.
//!
//! [`Splitter`] produces raw [`Segment`]s with line numbers and spans.
//! [`Classifier`] turns those into [`ExecutableStatement`]s by running each
//! through `sqlparser`, falling back to an opaque [`UnparsedStatement`] when
//! the text does not parse as exactly one statement.
//!
//! ```
//! let statements = sqlsplit::parse_script(
//!     "DELIMITER $$\nCREATE TABLE t (a INT)$$\nDELIMITER ;\nSELECT a FROM t;",
//! )
//! .unwrap();
//! assert_eq!(statements.len(), 2);
//! assert_eq!(statements[0].start_line(), 2);
//! assert_eq!(statements[1].text(), "SELECT a FROM t");
//! ```

mod block;
mod classifier;
mod delimiter;
mod error;
mod lexer;
mod options;
mod scanner;
mod splitter;

#[cfg(test)]
mod tests;

pub use block::{BlockFrame, BlockMatcher};
pub use classifier::{Classifier, ExecutableStatement, ParsedStatement, UnparsedStatement};
pub use delimiter::{Delimiter, command_argument, command_value, extract_delimiter_value};
pub use error::{DelimiterError, SplitError};
pub use lexer::{Lexer, Token, TokenKind};
pub use options::{BlockTracking, EndMatching, SplitterOptions, SqlDialect};
pub use scanner::{BoundaryScanner, StatementEnd};
pub use splitter::{Segment, SegmentKind, Splitter};

/// Splits and classifies scripts with one set of options.
#[derive(Debug, Clone, Default)]
pub struct ScriptParser {
    splitter: Splitter,
    classifier: Classifier,
}

impl ScriptParser {
    /// Creates a parser whose splitter and classifier share `options`.
    #[must_use]
    pub fn new(options: SplitterOptions) -> Self {
        Self {
            splitter: Splitter::new(options),
            classifier: Classifier::new(options),
        }
    }

    /// Splits `input` into segments. See [`Splitter::split`].
    ///
    /// # Errors
    ///
    /// Fails on a delimiter command with an invalid value.
    pub fn split(&mut self, input: impl AsRef<[u8]>) -> Result<Vec<Segment>, SplitError> {
        self.splitter.split(input)
    }

    /// Splits `input` and classifies every segment.
    ///
    /// # Errors
    ///
    /// Fails on a delimiter command with an invalid value.
    pub fn parse(&mut self, input: impl AsRef<[u8]>) -> Result<Vec<ExecutableStatement>, SplitError> {
        let segments = self.splitter.split(input)?;
        self.classifier.classify(&segments)
    }
}

/// Splits `input` with the default options.
///
/// # Errors
///
/// Fails on a delimiter command with an invalid value.
pub fn split(input: impl AsRef<[u8]>) -> Result<Vec<Segment>, SplitError> {
    Splitter::default().split(input)
}

/// Splits and classifies `input` with the default options.
///
/// # Errors
///
/// Fails on a delimiter command with an invalid value.
pub fn parse_script(input: impl AsRef<[u8]>) -> Result<Vec<ExecutableStatement>, SplitError> {
    ScriptParser::default().parse(input)
}
