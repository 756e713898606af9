use thiserror::Error;

#[derive(Error, Debug)]
pub enum AscError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("missing `{0}` header line")]
    MissingHeader(&'static str),

    #[error("malformed `{key}` header line: {line:?}")]
    Header { key: &'static str, line: String },

    #[error("data row {row} is short: expected {expected} samples, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unparseable sample {token:?} at data row {row}, column {col}")]
    Sample {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("unexpected end of file at data row {0}")]
    Eof(usize),
}
