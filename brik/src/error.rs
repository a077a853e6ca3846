use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrikError {
    #[error("Syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("Name error at line {line}: identifier '{name}' has not been defined")]
    NameError { line: usize, name: String },

    #[error("Nesting depth exceeds limit of {limit} at line {line}")]
    NestingTooDeep { line: usize, limit: usize },

    #[error("Source file '{path}' not found")]
    SourceNotFound { path: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
