//! Boundary scanner: finds where the statement at the start of a buffer ends.
//!
//! What it does
//! - Applies `DELIMITER` / `\d` commands found at the start of the buffer and
//!   reports the command line as its own unit.
//! - Otherwise walks tokens until the active delimiter matches, skipping over
//!   compound blocks with the [`BlockMatcher`] when block tracking is on.
//!
//! Invariants
//! - A non-empty buffer always yields `end > 0`, so a driver that advances by
//!   `end` makes progress on every call.
//! - Quoted text never ends a statement. An unterminated quote runs the
//!   statement to the end of the buffer.

use crate::{
    block::{BlockFrame, BlockMatcher},
    delimiter::{self, Delimiter},
    error::DelimiterError,
    lexer::{Lexer, TokenKind},
    options::{BlockTracking, SplitterOptions},
    splitter::SegmentKind,
};


/// Where one statement ends, relative to the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementEnd {
    /// Offset just past the statement, delimiter included. For a delimiter
    /// command this is the end of its line; the newline is not consumed.
    pub end: usize,
    /// Offset of the first token, or `None` when the buffer holds no token.
    pub first_token: Option<usize>,
    /// What the scanned range contains.
    pub kind: SegmentKind,
}

/// Finds statement boundaries one statement at a time.
#[derive(Debug, Clone, Default)]
pub struct BoundaryScanner {
    blocks: BlockMatcher,
    block_tracking: BlockTracking,
}

impl BoundaryScanner {
    /// Creates a scanner configured by `options`.
    #[must_use]
    pub fn new(options: &SplitterOptions) -> Self {
        Self {
            blocks: BlockMatcher::new(options.end_matching),
            block_tracking: options.block_tracking,
        }
    }

    /// Computes the end of the statement that starts at the beginning of
    /// `text`.
    ///
    /// A delimiter command is applied to `delimiter` before returning.
    ///
    /// # Errors
    ///
    /// Returns the [`DelimiterError`] of a delimiter command whose value is
    /// rejected by [`Delimiter::set`].
    pub fn find_statement_end(
        &mut self,
        text: &[u8],
        delimiter: &mut Delimiter,
    ) -> Result<StatementEnd, DelimiterError> {
        let mut lexer = Lexer::new(text);
        let first = lexer.next_token();
        if first.is_eof() {
            return Ok(StatementEnd {
                end: text.len(),
                first_token: None,
                kind: SegmentKind::Trivia,
            });
        }

        if let Some(value) = delimiter::command_value(&first, text) {
            delimiter.set(value)?;
            return Ok(StatementEnd {
                end: lexer.line_end(first.end),
                first_token: Some(first.start),
                kind: SegmentKind::DelimiterCommand,
            });
        }

        let track_blocks = match self.block_tracking {
            BlockTracking::DefaultDelimiter => delimiter.is_default(),
            BlockTracking::Always => true,
            BlockTracking::Never => false,
        };
        let statement = |end| StatementEnd {
            end,
            first_token: Some(first.start),
            kind: SegmentKind::Statement,
        };

        let mut pending = Some(first);
        loop {
            let token = match pending.take() {
                Some(token) => token,
                None => lexer.next_token(),
            };
            match token.kind {
                TokenKind::Eof => return Ok(statement(text.len())),
                TokenKind::Invalid => {
                    lexer.recover(&token);
                    continue;
                }
                _ => {}
            }
            if let Some(end) = delimiter.match_end(&token, text) {
                return Ok(statement(end));
            }
            if track_blocks {
                if let Some(frame) = BlockFrame::opened_by(&token, &lexer, delimiter) {
                    pending = self.blocks.skip_block(&mut lexer, frame, delimiter);
                }
            }
        }
    }
}
