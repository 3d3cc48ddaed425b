//! Lexer: the token source behind statement boundary detection.
//!
//! What it does
//! - Scans a borrowed byte buffer one token at a time, skipping whitespace
//!   and the three MySQL comment forms (`-- `, `#`, `/* … */`).
//! - Recognises just enough of the MySQL lexical grammar to tell quoted text
//!   from code: string literals (`'…'`, `"…"`), quoted identifiers
//!   (`` `…` ``), numbers, words, operators and single punctuation bytes.
//! - Classifies words into the block keywords, the remaining reserved words,
//!   and plain identifiers.
//!
//! Invariants
//! - The offset never moves backwards.
//! - A byte that cannot start any token (a control byte, or a malformed UTF-8
//!   sequence) yields a zero-width [`TokenKind::Invalid`] token and leaves the
//!   offset where it was. Callers step over it with [`Lexer::recover`]; the
//!   lexer never skips it on its own.
//! - An unterminated quoted token is reported as `Invalid` spanning to the
//!   end of input. That token does advance the offset.
//!
//! Notes
//! - Input is `&[u8]`, not `&str`. Bytes in legacy encodings pass through
//!   untouched.

use core::ops::Range;

mod keywords;

pub(crate) use keywords::classify as classify_word;


/// Multi-byte operators, longest first so that `<=>` wins over `<=`.
const OPERATORS: [&[u8]; 12] = [
    b"<=>", b"->>", b"<=", b">=", b"<>", b"!=", b"||", b"&&", b":=", b"<<", b">>", b"->",
];

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An unquoted word that is not a reserved word.
    Identifier,
    /// A backtick-quoted identifier.
    QuotedIdentifier,
    /// A single- or double-quoted string literal.
    StringLiteral,
    /// A numeric literal.
    Number,
    /// A lone `\`.
    Backslash,
    /// `BEGIN`
    Begin,
    /// `END`
    End,
    /// `IF`
    If,
    /// `CASE`
    Case,
    /// `REPEAT`
    Repeat,
    /// `WHILE`
    While,
    /// `LOOP`
    Loop,
    /// Any other reserved word.
    Keyword,
    /// `=` or a multi-byte operator such as `<=` or `||`.
    Operator,
    /// Any other single ASCII punctuation byte.
    Punct(u8),
    /// Bytes that cannot be scanned.
    Invalid,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns `true` for every kind the grammar treats as a reserved token
    /// rather than a name: block keywords, other keywords and operators.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Begin
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Case
                | TokenKind::Repeat
                | TokenKind::While
                | TokenKind::Loop
                | TokenKind::Keyword
                | TokenKind::Operator
        )
    }
}

/// A token borrowed from the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// What the bytes were classified as.
    pub kind: TokenKind,
    /// The raw bytes of the token, quotes included.
    pub literal: &'src [u8],
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Byte offset one past the last byte of the token.
    pub end: usize,
}

impl Token<'_> {
    /// Byte range of the token in the scanned buffer.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` for the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Case-insensitive comparison of the literal against an ASCII word.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.literal.eq_ignore_ascii_case(word.as_bytes())
    }
}

/// Lazily tokenizes one buffer.
#[derive(Debug, Clone, Default)]
pub struct Lexer<'src> {
    src: &'src [u8],
    pos: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `src`.
    #[must_use]
    pub fn new(src: &'src [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Points the lexer at a new buffer and rewinds to its start.
    pub fn reset(&mut self, src: &'src [u8]) {
        self.src = src;
        self.pos = 0;
    }

    /// The buffer being scanned.
    #[must_use]
    pub fn source(&self) -> &'src [u8] {
        self.src
    }

    /// Current scan offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Moves the scan offset forward by `delta` raw bytes, clamped to the end
    /// of the buffer.
    pub fn seek(&mut self, delta: usize) {
        self.pos = self.pos.saturating_add(delta).min(self.src.len());
    }

    /// Steps over an `Invalid` token that did not advance the offset.
    ///
    /// This is the only way past an unscannable byte, which is what keeps
    /// every scanning loop terminating on malformed input.
    pub fn recover(&mut self, token: &Token<'_>) {
        if token.kind == TokenKind::Invalid && self.pos == token.start {
            self.seek(1);
        }
    }

    /// Lexes the next token without consuming it.
    #[must_use]
    pub fn peek_token(&self) -> Token<'src> {
        self.clone().next_token()
    }

    /// Offset of the next `\n` at or after `from`, or the buffer length.
    #[must_use]
    pub fn line_end(&self, from: usize) -> usize {
        line_end(self.src, from)
    }

    /// Scans the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_trivia();
        let start = self.pos;
        let Some(&b) = self.src.get(start) else {
            return self.token(TokenKind::Eof, start);
        };
        let kind = match b {
            b'\'' | b'"' => self.quoted(b, true, TokenKind::StringLiteral),
            b'`' => self.quoted(b, false, TokenKind::QuotedIdentifier),
            b'\\' => {
                self.pos += 1;
                TokenKind::Backslash
            }
            b'0'..=b'9' => self.number_or_word(),
            b if is_word_byte(b) => self.word(),
            0x80..=0xff => {
                if decode_char(&self.src[start..]).is_some() {
                    self.word()
                } else {
                    TokenKind::Invalid
                }
            }
            b if b.is_ascii_punctuation() => self.operator_or_punct(b),
            _ => TokenKind::Invalid,
        };
        self.token(kind, start)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'src> {
        Token {
            kind,
            literal: &self.src[start..self.pos],
            start,
            end: self.pos,
        }
    }

    #[inline]
    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek_byte(0), self.peek_byte(1)) {
                (Some(b), _) if is_space(b) => self.pos += 1,
                (Some(b'#'), _) => self.pos = self.line_end(self.pos),
                (Some(b'-'), Some(b'-'))
                    if self
                        .peek_byte(2)
                        .is_none_or(|b| is_space(b) || b.is_ascii_control()) =>
                {
                    self.pos = self.line_end(self.pos);
                }
                (Some(b'/'), Some(b'*')) => {
                    let body = self.pos + 2;
                    self.pos = find(&self.src[body..], b"*/").map_or(self.src.len(), |i| body + i + 2);
                }
                _ => return,
            }
        }
    }

    fn quoted(&mut self, quote: u8, backslash_escapes: bool, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        while let Some(b) = self.peek_byte(0) {
            self.pos += 1;
            if backslash_escapes && b == b'\\' {
                self.seek(1);
            } else if b == quote {
                // A doubled quote is an escaped quote, not the end.
                if self.peek_byte(0) == Some(quote) {
                    self.pos += 1;
                } else {
                    return kind;
                }
            }
        }
        TokenKind::Invalid
    }

    /// Numbers that run straight into word bytes (`1$$`, `0x1F`, `12abc`) are
    /// identifiers in MySQL, so they are rescanned as words.
    fn number_or_word(&mut self) -> TokenKind {
        let start = self.pos;
        self.eat_while(|b| b.is_ascii_digit());
        match (self.peek_byte(0), self.peek_byte(1)) {
            (Some(b'.'), Some(d)) if d.is_ascii_digit() => {
                self.pos += 1;
                self.eat_while(|b| b.is_ascii_digit());
                TokenKind::Number
            }
            (Some(b), _) if is_word_byte(b) || b >= 0x80 => {
                self.pos = start;
                self.word()
            }
            _ => TokenKind::Number,
        }
    }

    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(b) = self.peek_byte(0) {
            if is_word_byte(b) {
                self.pos += 1;
            } else if b >= 0x80 {
                match decode_char(&self.src[self.pos..]) {
                    Some(len) => self.pos += len,
                    None => break,
                }
            } else {
                break;
            }
        }
        keywords::classify(&self.src[start..self.pos])
    }

    fn operator_or_punct(&mut self, b: u8) -> TokenKind {
        let rest = &self.src[self.pos..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(op)) {
            self.pos += op.len();
            return TokenKind::Operator;
        }
        self.pos += 1;
        if b == b'=' {
            TokenKind::Operator
        } else {
            TokenKind::Punct(b)
        }
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek_byte(0).is_some_and(&pred) {
            self.pos += 1;
        }
    }
}

/// Whitespace as the MySQL lexer sees it.
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Strips leading and trailing [`is_space`] bytes.
pub(crate) fn trim_space(bytes: &[u8]) -> &[u8] {
    let Some(start) = bytes.iter().position(|&b| !is_space(b)) else {
        return &[];
    };
    let end = bytes.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// ASCII bytes that may appear in an unquoted identifier.
#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Byte length of the UTF-8 scalar at the start of `bytes`, or `None` when
/// the sequence is malformed.
#[inline]
fn decode_char(bytes: &[u8]) -> Option<usize> {
    match bstr::decode_utf8(bytes) {
        (Some(_), len) => Some(len),
        (None, _) => None,
    }
}

/// Offset of the next `\n` in `src` at or after `from`, or `src.len()`.
pub(crate) fn line_end(src: &[u8], from: usize) -> usize {
    src.get(from..)
        .and_then(|rest| rest.iter().position(|&b| b == b'\n'))
        .map_or(src.len(), |i| from + i)
}

#[inline]
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    bstr::ByteSlice::find(haystack, needle)
}
