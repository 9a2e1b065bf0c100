use thiserror::Error;

#[derive(Error, Debug)]
pub enum Vex2DocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0} not found")]
    FileNotFound(String),

    #[error("Unsupported VEX document: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Vex2DocError>;
