use bstr::{BStr, BString, ByteSlice};
use sqlparser::{ast::Statement, parser::Parser};
use tracing::debug;

use crate::{
    delimiter::{self, Delimiter},
    error::SplitError,
    lexer::Lexer,
    options::{SplitterOptions, SqlDialect},
    splitter::Segment,
};

/// A statement the parser accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    /// The syntax tree.
    pub statement: Statement,
    /// Statement text without the trailing delimiter.
    pub text: String,
    /// 1-based line the statement starts on.
    pub start_line: usize,
}

/// Placeholder for a segment the parser could not turn into exactly one
/// statement. The text is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedStatement {
    /// The original segment text, delimiter included.
    pub text: BString,
    /// 1-based line the segment starts on.
    pub start_line: usize,
}

/// One executable unit of a script.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutableStatement {
    /// Exactly one statement parsed.
    Parsed(ParsedStatement),
    /// Anything else, kept as text.
    Unparsed(UnparsedStatement),
}

impl ExecutableStatement {
    /// 1-based line the statement starts on.
    #[must_use]
    pub fn start_line(&self) -> usize {
        match self {
            ExecutableStatement::Parsed(parsed) => parsed.start_line,
            ExecutableStatement::Unparsed(unparsed) => unparsed.start_line,
        }
    }

    /// The statement text.
    #[must_use]
    pub fn text(&self) -> &BStr {
        match self {
            ExecutableStatement::Parsed(parsed) => parsed.text.as_bytes().as_bstr(),
            ExecutableStatement::Unparsed(unparsed) => unparsed.text.as_bstr(),
        }
    }

    /// The syntax tree, if the statement parsed.
    #[must_use]
    pub fn statement(&self) -> Option<&Statement> {
        match self {
            ExecutableStatement::Parsed(parsed) => Some(&parsed.statement),
            ExecutableStatement::Unparsed(_) => None,
        }
    }

    /// Returns `true` for [`ExecutableStatement::Parsed`].
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, ExecutableStatement::Parsed(_))
    }
}

/// Turns segments into executable statements.
///
/// The classifier follows delimiter commands itself so that it strips the
/// delimiter that was in effect for each statement.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    delimiter: Delimiter,
    dialect: SqlDialect,
}

impl Classifier {
    /// Creates a classifier that parses with the dialect in `options`.
    #[must_use]
    pub fn new(options: SplitterOptions) -> Self {
        Self {
            delimiter: Delimiter::default(),
            dialect: options.dialect,
        }
    }

    /// Classifies `segments` in order.
    ///
    /// Delimiter commands and segments holding only comments are dropped.
    /// Every other segment becomes either a [`ParsedStatement`] or an
    /// [`UnparsedStatement`]; text the parser rejects is never an error.
    ///
    /// # Errors
    ///
    /// Returns a [`SplitError`] when a delimiter command carries a value
    /// that cannot be installed.
    pub fn classify(&mut self, segments: &[Segment]) -> Result<Vec<ExecutableStatement>, SplitError> {
        self.delimiter.reset();
        let dialect = self.dialect.parser_dialect();

        let mut statements = Vec::with_capacity(segments.len());
        for segment in segments {
            let text = segment.text.as_slice();
            let first = Lexer::new(text).next_token();
            if first.is_eof() {
                continue;
            }
            if let Some(value) = delimiter::command_value(&first, text) {
                self.delimiter.set(value).map_err(|source| SplitError {
                    source,
                    line: segment.start_line,
                })?;
                continue;
            }

            let body = self.delimiter.strip_suffix(text);
            if body.is_empty() {
                continue;
            }
            let Ok(sql) = body.to_str() else {
                debug!(
                    target: "sqlsplit::classifier",
                    line = segment.start_line,
                    "segment is not valid UTF-8, keeping it unparsed"
                );
                statements.push(unparsed(segment));
                continue;
            };

            match Parser::parse_sql(&*dialect, sql).map(<[Statement; 1]>::try_from) {
                Ok(Ok([statement])) => statements.push(ExecutableStatement::Parsed(ParsedStatement {
                    statement,
                    text: sql.to_owned(),
                    start_line: segment.start_line,
                })),
                Ok(Err(parsed)) => {
                    debug!(
                        target: "sqlsplit::classifier",
                        line = segment.start_line,
                        statements = parsed.len(),
                        "segment does not hold exactly one statement, keeping it unparsed"
                    );
                    statements.push(unparsed(segment));
                }
                Err(error) => {
                    debug!(
                        target: "sqlsplit::classifier",
                        line = segment.start_line,
                        %error,
                        "parser rejected segment, keeping it unparsed"
                    );
                    statements.push(unparsed(segment));
                }
            }
        }
        Ok(statements)
    }
}

fn unparsed(segment: &Segment) -> ExecutableStatement {
    ExecutableStatement::Unparsed(UnparsedStatement {
        text: segment.text.clone(),
        start_line: segment.start_line,
    })
}
