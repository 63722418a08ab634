use thiserror::Error;

/// Input that does not satisfy a stage's declared schema. Partial scrape
/// artifacts (blank names, unmapped labels, zero denominators) are handled
/// inside the stages and never surface here.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("column '{column}' has non-numeric value '{raw}' for {player}")]
    NotNumeric {
        column: String,
        player: String,
        raw: String,
    },

    #[error("row for {player} has {got} cells, table has {expected} columns")]
    RowWidth {
        player: String,
        expected: usize,
        got: usize,
    },

    #[error("column '{column}' has {got} values, table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },
}
