use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Clipboard initialization failed: {0}")]
    ClipboardInitFailed(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteFailed(String),

    #[error("IO Error: {0}")]
    IoError(String),

    #[error("Invalid file pattern: {0}")]
    PatternError(String),

    #[error("Selection UI error: {0}")]
    UiError(String),
}

impl From<std::io::Error> for CopyError {
    fn from(err: std::io::Error) -> Self {
        CopyError::IoError(err.to_string())
    }
}

impl From<glob::PatternError> for CopyError {
    fn from(err: glob::PatternError) -> Self {
        CopyError::PatternError(err.to_string())
    }
}
