use sqlparser::dialect::{AnsiDialect, Dialect, GenericDialect, MySqlDialect};

/// Configuration options for splitting and classifying a script.
///
/// # Default
///
/// Blocks are tracked only under the default `;` delimiter, a bare `END`
/// closes whatever block is innermost, and statements are parsed with the
/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitterOptions {
    /// When `BEGIN … END` style blocks suppress delimiter matching.
    ///
    /// # Default
    ///
    /// [`BlockTracking::DefaultDelimiter`]
    pub block_tracking: BlockTracking,

    /// Which blocks a bare `END` (one not followed by `IF`, `CASE`, …)
    /// may close.
    ///
    /// # Default
    ///
    /// [`EndMatching::AnyFrame`]
    pub end_matching: EndMatching,

    /// Grammar handed to the statement parser.
    ///
    /// # Default
    ///
    /// [`SqlDialect::MySql`]
    pub dialect: SqlDialect,
}

/// Controls when the block matcher runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockTracking {
    /// Track blocks only while the delimiter is the default `;`.
    ///
    /// Under a custom delimiter a glued closer such as `END$$` lexes as a
    /// single identifier and cannot close a block.
    #[default]
    DefaultDelimiter,
    /// Track blocks under every delimiter.
    Always,
    /// Never track blocks; every delimiter occurrence ends a statement.
    Never,
}

/// What a bare `END` closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndMatching {
    /// The innermost open block, whatever opened it. Matches MySQL, where
    /// `CASE … END` expressions and `BEGIN … END label` are both valid.
    #[default]
    AnyFrame,
    /// Only a block opened by `BEGIN`. A bare `END` inside any other block
    /// is ordinary text.
    BeginOnly,
}

/// SQL dialect used by the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SqlDialect {
    /// `sqlparser`'s `MySqlDialect`.
    #[default]
    MySql,
    /// `sqlparser`'s `GenericDialect`.
    Generic,
    /// `sqlparser`'s `AnsiDialect`.
    Ansi,
}

impl SqlDialect {
    pub(crate) fn parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
        }
    }
}
