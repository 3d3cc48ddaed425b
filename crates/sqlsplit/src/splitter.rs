use core::ops::Range;

use bstr::{BStr, BString, ByteSlice};
use tracing::{debug, trace};

use crate::{
    delimiter::Delimiter,
    error::SplitError,
    lexer::{self, Lexer},
    options::SplitterOptions,
    scanner::BoundaryScanner,
};

/// What a [`Segment`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// A statement, delimiter included.
    Statement,
    /// A `DELIMITER` or `\d` command line.
    DelimiterCommand,
    /// Comments with no statement after them.
    Trivia,
}

/// One unit of a split script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The raw text with surrounding whitespace removed.
    pub text: BString,
    /// 1-based line of the first token, or of the first non-blank byte for
    /// trivia.
    pub start_line: usize,
    /// Untrimmed byte range in the input. Spans of consecutive segments are
    /// contiguous.
    pub span: Range<usize>,
    /// What the segment holds.
    pub kind: SegmentKind,
}

impl Segment {
    /// The trimmed text.
    #[must_use]
    pub fn text(&self) -> &BStr {
        self.text.as_bstr()
    }

    /// Returns `true` for a statement segment.
    #[must_use]
    pub fn is_statement(&self) -> bool {
        self.kind == SegmentKind::Statement
    }
}

/// Splits scripts into statement-sized segments.
///
/// Delimiter changes made by a script last until the end of that call only:
/// every call to [`Splitter::split`] starts again from `;`.
///
/// # Example
///
/// ```
/// use sqlsplit::Splitter;
///
/// let mut splitter = Splitter::default();
/// let segments = splitter.split("SELECT 1;SELECT 2").unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].text, "SELECT 1;");
/// assert_eq!(segments[1].start_line, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    delimiter: Delimiter,
    scanner: BoundaryScanner,
}

impl Splitter {
    /// Creates a splitter configured by `options`.
    #[must_use]
    pub fn new(options: SplitterOptions) -> Self {
        Self {
            delimiter: Delimiter::default(),
            scanner: BoundaryScanner::new(&options),
        }
    }

    /// The delimiter in effect after the last split.
    #[must_use]
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Splits `input` into segments, in input order.
    ///
    /// Malformed bytes and unterminated quotes never fail a split; they end
    /// up inside some segment. A whitespace-only tail produces no segment.
    ///
    /// # Errors
    ///
    /// Returns a [`SplitError`] carrying the line of the first delimiter
    /// command whose value is rejected.
    pub fn split(&mut self, input: impl AsRef<[u8]>) -> Result<Vec<Segment>, SplitError> {
        let input = input.as_ref();
        self.delimiter.reset();

        let mut segments = Vec::new();
        let mut line = 0;
        let mut offset = 0;
        while offset < input.len() {
            let rest = &input[offset..];
            let found = self
                .scanner
                .find_statement_end(rest, &mut self.delimiter)
                .map_err(|source| {
                    let first = Lexer::new(rest).next_token().start;
                    SplitError {
                        source,
                        line: line + count_lines(&rest[..first]) + 1,
                    }
                })?;

            let raw = &rest[..found.end];
            let lead = found.first_token.unwrap_or_else(|| {
                raw.iter()
                    .position(|&b| !lexer::is_space(b))
                    .unwrap_or(raw.len())
            });
            let text = lexer::trim_space(raw);
            if !text.is_empty() {
                let segment = Segment {
                    text: BString::from(text),
                    start_line: line + count_lines(&raw[..lead]) + 1,
                    span: offset..offset + found.end,
                    kind: found.kind,
                };
                trace!(
                    target: "sqlsplit::splitter",
                    line = segment.start_line,
                    span = ?segment.span,
                    kind = ?segment.kind,
                    "segment"
                );
                segments.push(segment);
            }

            line += count_lines(raw);
            offset += found.end;
        }

        debug!(
            target: "sqlsplit::splitter",
            segments = segments.len(),
            lines = line,
            "split finished"
        );
        Ok(segments)
    }
}

fn count_lines(bytes: &[u8]) -> usize {
    bytes.find_iter(b"\n").count()
}
