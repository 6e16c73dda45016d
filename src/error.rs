use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config directory not found at {0}. Run 'facture init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invoice amount must be greater than 0")]
    InvalidAmount,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Failed to render invoice markup: {0}")]
    Render(String),

    #[error("Failed to launch headless Chromium: {0}. Install Chrome or Chromium and make sure it is on PATH.")]
    BrowserLaunch(String),

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
