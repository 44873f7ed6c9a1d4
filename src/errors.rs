use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to serialize transactions: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("import failed on line {line}: {message}")]
    Import { line: usize, message: String },
}
