//! Block matcher: decides when the compound statement that began at an
//! opener is closed again.
//!
//! What it does
//! - Recognises the openers `BEGIN`, `IF`, `CASE`, `REPEAT`, `WHILE` and
//!   `LOOP`, minus the spellings that look like openers but are not: a
//!   transaction `BEGIN` (`BEGIN;`, `BEGIN WORK`), a column named `begin`
//!   (`SELECT begin FROM t`), the `IF()` and `REPEAT()` functions, and
//!   `IF [NOT] EXISTS` clauses.
//! - Consumes tokens while any block is open, keeping a stack of frames.
//! - Under a delimiter that glues onto words, `END$$` and `END IF$$` close
//!   blocks like their spaced forms.
//!
//! Invariants
//! - `END IF`, `END CASE`, `END REPEAT`, `END WHILE` and `END LOOP` close only
//!   a frame of the same kind, and only when it is innermost. A mismatched
//!   pair is ordinary text.
//! - A bare `END` closes the innermost frame under [`EndMatching::AnyFrame`],
//!   or only a `BEGIN` frame under [`EndMatching::BeginOnly`].
//! - Every step either consumes a token or steps the lexer over an invalid
//!   byte, so [`BlockMatcher::skip_block`] terminates on any input.

use tracing::trace;

use crate::{
    delimiter::Delimiter,
    lexer::{self, Lexer, Token, TokenKind},
    options::EndMatching,
};


/// Reserved words that follow `begin` used as a name and never start a
/// compound body.
const NOT_A_BODY: &[&str] = &[
    "AND", "AS", "ASC", "BETWEEN", "COLLATE", "DESC", "DIV", "ELSE", "FROM", "GROUP", "HAVING",
    "IN", "INTO", "IS", "JOIN", "LIKE", "LIMIT", "MOD", "NOT", "ON", "OR", "ORDER", "REGEXP",
    "RLIKE", "THEN", "UNION", "USING", "WHEN", "WHERE", "XOR",
];

/// One open compound statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFrame {
    /// `BEGIN … END`
    BeginEnd,
    /// `IF … END IF`
    IfEndIf,
    /// `CASE … END CASE`, or `CASE … END` as an expression
    CaseEndCase,
    /// `REPEAT … END REPEAT`
    RepeatEndRepeat,
    /// `WHILE … END WHILE`
    WhileEndWhile,
    /// `LOOP … END LOOP`
    LoopEndLoop,
}

impl BlockFrame {
    /// Frame closed by `END <kind>`.
    fn closed_by(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::If => Some(BlockFrame::IfEndIf),
            TokenKind::Case => Some(BlockFrame::CaseEndCase),
            TokenKind::Repeat => Some(BlockFrame::RepeatEndRepeat),
            TokenKind::While => Some(BlockFrame::WhileEndWhile),
            TokenKind::Loop => Some(BlockFrame::LoopEndLoop),
            _ => None,
        }
    }

    /// Classifies `token` as an opener, looking one token ahead in `lexer`.
    ///
    /// `lexer` must be positioned just past `token`.
    #[must_use]
    pub fn opened_by(token: &Token<'_>, lexer: &Lexer<'_>, delimiter: &Delimiter) -> Option<Self> {
        let frame = match token.kind {
            TokenKind::Begin => BlockFrame::BeginEnd,
            TokenKind::If => BlockFrame::IfEndIf,
            TokenKind::Case => BlockFrame::CaseEndCase,
            TokenKind::Repeat => BlockFrame::RepeatEndRepeat,
            TokenKind::While => BlockFrame::WhileEndWhile,
            TokenKind::Loop => BlockFrame::LoopEndLoop,
            _ => return None,
        };
        let next = lexer.peek_token();
        let opens = match frame {
            BlockFrame::BeginEnd => {
                starts_body(&next) && delimiter.match_end(&next, lexer.source()).is_none()
            }
            BlockFrame::IfEndIf => {
                !(next.kind == TokenKind::Punct(b'(') || next.is_word("EXISTS") || next.is_word("NOT"))
            }
            BlockFrame::RepeatEndRepeat => next.kind != TokenKind::Punct(b'('),
            _ => true,
        };
        opens.then_some(frame)
    }
}

/// Nesting state for one block-tracking pass.
#[derive(Debug, Clone, Default)]
pub struct BlockMatcher {
    stack: Vec<BlockFrame>,
    end_matching: EndMatching,
}

impl BlockMatcher {
    /// Creates a matcher with no open blocks.
    #[must_use]
    pub fn new(end_matching: EndMatching) -> Self {
        Self {
            stack: Vec::new(),
            end_matching,
        }
    }

    /// Number of currently open blocks.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consumes tokens from `lexer` until the block opened by `opener` and
    /// everything nested in it is closed.
    ///
    /// Returns the token read past the closer that the caller must still
    /// examine: the lookahead after a bare `END`, the identifier carrying a
    /// glued delimiter (`END$$`, `IF$$`), or `Eof` when input ran out first.
    /// Returns `None` when the closer was consumed in full.
    pub fn skip_block<'src>(
        &mut self,
        lexer: &mut Lexer<'src>,
        opener: BlockFrame,
        delimiter: &Delimiter,
    ) -> Option<Token<'src>> {
        self.stack.clear();
        self.stack.push(opener);
        let mut pending = None;

        loop {
            let token = match pending.take() {
                Some(token) => token,
                None => lexer.next_token(),
            };
            match token.kind {
                TokenKind::Eof => {
                    trace!(target: "sqlsplit::block", depth = self.depth(), "input ended inside a block");
                    self.stack.clear();
                    return Some(token);
                }
                TokenKind::Invalid => lexer.recover(&token),
                TokenKind::End => {
                    let next = lexer.next_token();
                    let closer = BlockFrame::closed_by(next.kind).or_else(|| {
                        glued_keyword(&next, lexer.source(), delimiter).and_then(BlockFrame::closed_by)
                    });
                    if let Some(frame) = closer {
                        if self.stack.last() == Some(&frame) {
                            self.stack.pop();
                            if self.stack.is_empty() {
                                // `END IF$$`: the delimiter is still ahead.
                                return (next.kind == TokenKind::Identifier).then_some(next);
                            }
                        }
                    } else {
                        if self.closes_bare_end() {
                            self.stack.pop();
                            if self.stack.is_empty() {
                                return Some(next);
                            }
                        }
                        pending = Some(next);
                    }
                }
                TokenKind::Identifier
                    if glued_keyword(&token, lexer.source(), delimiter) == Some(TokenKind::End) =>
                {
                    if self.closes_bare_end() {
                        self.stack.pop();
                        if self.stack.is_empty() {
                            return Some(token);
                        }
                    }
                }
                _ => {
                    if let Some(frame) = BlockFrame::opened_by(&token, lexer, delimiter) {
                        self.stack.push(frame);
                    }
                }
            }
        }
    }

    fn closes_bare_end(&self) -> bool {
        match self.end_matching {
            EndMatching::AnyFrame => true,
            EndMatching::BeginOnly => self.stack.last() == Some(&BlockFrame::BeginEnd),
        }
    }
}

/// Whether `next`, the token after `BEGIN`, can start a compound body.
fn starts_body(next: &Token<'_>) -> bool {
    match next.kind {
        TokenKind::Identifier | TokenKind::QuotedIdentifier => !next.is_word("WORK"),
        TokenKind::Keyword => !NOT_A_BODY.iter().any(|word| next.is_word(word)),
        kind => kind.is_keyword() && kind != TokenKind::Operator,
    }
}

/// Kind of the word an identifier carries in front of a glued delimiter.
fn glued_keyword(token: &Token<'_>, src: &[u8], delimiter: &Delimiter) -> Option<TokenKind> {
    delimiter.glued_word(token, src).map(lexer::classify_word)
}
