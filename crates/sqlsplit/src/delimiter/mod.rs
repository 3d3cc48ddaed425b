//! Delimiter state: the current statement terminator and the client commands
//! that redefine it.
//!
//! What it does
//! - Holds the active delimiter text plus an anchor, the first token of that
//!   text lexed on its own. The anchor decides which source tokens are even
//!   considered when looking for the delimiter.
//! - Validates candidates before installing them.
//! - Recognises `DELIMITER <value>` and `\d <value>` at the start of a
//!   statement and extracts the value using the `mysql` client's quoting rules.
//!
//! Invariants
//! - The installed text is non-empty, contains no backslash and no blank, is
//!   not a reserved word or operator, and lexes to at least one token.
//! - A failed [`Delimiter::set`] leaves the previous delimiter in place.

use bstr::{BStr, BString, ByteSlice};
use tracing::debug;

use crate::{
    error::DelimiterError,
    lexer::{self, Lexer, Token, TokenKind},
};

#[cfg(test)]
mod tests;

const DEFAULT: &[u8] = b";";

/// The active statement delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    text: BString,
    anchor_kind: TokenKind,
    anchor_literal: BString,
}

impl Default for Delimiter {
    fn default() -> Self {
        Self {
            text: BString::from(DEFAULT),
            anchor_kind: TokenKind::Punct(b';'),
            anchor_literal: BString::from(DEFAULT),
        }
    }
}

impl Delimiter {
    /// The delimiter text.
    #[must_use]
    pub fn text(&self) -> &BStr {
        self.text.as_bstr()
    }

    /// Kind of the first token of the delimiter text.
    #[must_use]
    pub fn anchor_kind(&self) -> TokenKind {
        self.anchor_kind
    }

    /// Returns `true` while the delimiter is `;`.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.text == DEFAULT
    }

    /// Restores the default `;`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validates `candidate` and installs it as the new delimiter.
    ///
    /// # Errors
    ///
    /// Checks run in this order and the first failure is returned:
    /// [`DelimiterError::Missing`] for an empty candidate,
    /// [`DelimiterError::ContainsBackslash`],
    /// [`DelimiterError::ContainsBlankSpace`],
    /// [`DelimiterError::CannotExtractToken`] when the candidate holds no
    /// scannable token, and [`DelimiterError::ReservedKeyword`] when it is a
    /// single reserved word or operator.
    pub fn set(&mut self, candidate: &[u8]) -> Result<(), DelimiterError> {
        if candidate.is_empty() {
            return Err(DelimiterError::Missing);
        }
        if candidate.contains(&b'\\') {
            return Err(DelimiterError::ContainsBackslash);
        }
        if candidate.iter().copied().any(is_blank) {
            return Err(DelimiterError::ContainsBlankSpace);
        }

        let anchor = Lexer::new(candidate).next_token();
        if matches!(anchor.kind, TokenKind::Eof | TokenKind::Invalid) {
            return Err(DelimiterError::CannotExtractToken);
        }
        if anchor.kind.is_keyword() && anchor.span() == (0..candidate.len()) {
            return Err(DelimiterError::ReservedKeyword);
        }

        self.text = BString::from(candidate);
        self.anchor_kind = anchor.kind;
        self.anchor_literal = BString::from(anchor.literal);
        debug!(
            target: "sqlsplit::delimiter",
            delimiter = %self.text,
            anchor = ?self.anchor_kind,
            "delimiter changed"
        );
        Ok(())
    }

    /// If the delimiter occurs at `token`, returns the offset in `src` just
    /// past the occurrence.
    ///
    /// Only tokens of the anchor's kind are considered:
    /// - identifier anchors look for the delimiter starting anywhere inside
    ///   the identifier, so `1$$` and `END$$` match `$$`;
    /// - string literal anchors need the whole literal to match;
    /// - every other kind compares the source bytes at the token start.
    #[must_use]
    pub fn match_end(&self, token: &Token<'_>, src: &[u8]) -> Option<usize> {
        if token.kind != self.anchor_kind {
            return None;
        }
        let len = self.text.len();
        match self.anchor_kind {
            TokenKind::Identifier => {
                let window = src.get(token.start..(token.end + len - 1).min(src.len()))?;
                lexer::find(window, &self.text).map(|i| token.start + i + len)
            }
            TokenKind::StringLiteral => {
                (token.literal == self.anchor_literal.as_slice()).then_some(token.end)
            }
            _ => src
                .get(token.start..)?
                .starts_with(&self.text)
                .then_some(token.start + len),
        }
    }

    /// If the delimiter is glued to the end of a word inside the identifier
    /// `token`, as in `END$$`, returns that word.
    #[must_use]
    pub(crate) fn glued_word<'a>(&self, token: &Token<'a>, src: &[u8]) -> Option<&'a [u8]> {
        if token.kind != TokenKind::Identifier {
            return None;
        }
        let start = self.match_end(token, src)? - self.text.len();
        (start > token.start && start < token.end).then(|| &token.literal[..start - token.start])
    }

    /// Removes one trailing occurrence of the delimiter, ignoring surrounding
    /// whitespace.
    #[must_use]
    pub fn strip_suffix<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        let text = lexer::trim_space(text);
        text.strip_suffix(self.text.as_slice())
            .map_or(text, lexer::trim_space)
    }
}

/// If `first` is the first token of a delimiter command, returns the rest of
/// the command's line after the command word.
///
/// Two spellings are recognised: `\d` and `DELIMITER` (any case), each
/// followed by whitespace or the end of input. The remainder stops before
/// the next `\n`, with a trailing `\r` removed.
#[must_use]
pub fn command_argument<'src>(first: &Token<'_>, src: &'src [u8]) -> Option<&'src [u8]> {
    let word_end = match first.kind {
        // `\d` lexes as two tokens, so check the raw bytes.
        TokenKind::Backslash => {
            let after = src.get(first.end + 1).copied();
            (src.get(first.end) == Some(&b'd') && after.is_none_or(lexer::is_space))
                .then_some(first.end + 1)?
        }
        TokenKind::Identifier if first.is_word("DELIMITER") => src
            .get(first.end)
            .copied()
            .is_none_or(lexer::is_space)
            .then_some(first.end)?,
        _ => return None,
    };
    let rest = &src[word_end..lexer::line_end(src, word_end)];
    Some(rest.strip_suffix(b"\r").unwrap_or(rest))
}

/// Extracts a delimiter value from a command remainder.
///
/// Leading whitespace is skipped. A value opening with `'`, `"` or `` ` ``
/// runs to the matching quote, or to the end when unclosed, without the
/// quotes. Anything else runs to the next whitespace byte; a backslash keeps
/// the byte after it, so an escaped blank does not end the value.
#[must_use]
pub fn extract_delimiter_value(remainder: &[u8]) -> &[u8] {
    let start = remainder
        .iter()
        .position(|&b| !lexer::is_space(b))
        .unwrap_or(remainder.len());
    let value = &remainder[start..];
    match value.first() {
        Some(&quote @ (b'\'' | b'"' | b'`')) => {
            let body = &value[1..];
            let end = body.find_byte(quote).unwrap_or(body.len());
            &body[..end]
        }
        _ => {
            let mut i = 0;
            while let Some(&b) = value.get(i) {
                if lexer::is_space(b) {
                    break;
                }
                i += if b == b'\\' { 2 } else { 1 };
            }
            &value[..i.min(value.len())]
        }
    }
}

/// Recognises a delimiter command at `first` and extracts its value.
#[must_use]
pub fn command_value<'src>(first: &Token<'_>, src: &'src [u8]) -> Option<&'src [u8]> {
    command_argument(first, src).map(extract_delimiter_value)
}

#[inline]
fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}
