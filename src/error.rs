use thiserror::Error;

/// Errors surfaced by the analysis engine.
///
/// A syntax error is fatal to the parse that raised it but never touches a
/// previously built table. Export errors are local to one export call; the
/// in-memory table stays valid and can be exported again once the
/// destination is fixed. A symbol lookup that finds nothing is not an
/// error at all (`describe` returns `None`).
#[derive(Debug, Error)]
pub enum Error {
    /// The source text is not valid Python.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// Message produced by the parser front end.
        message: String,
        /// 1-based line of the offending token.
        line: usize,
        /// 1-based column of the offending token.
        column: usize,
    },

    /// The export destination could not be written.
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer failed mid-serialization.
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON writer failed mid-serialization.
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The destination extension names no known export format.
    #[error("unsupported export format: {0:?}")]
    Format(String),
}
