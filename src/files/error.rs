use crate::files::multipart::MultipartError;
use crate::http::request::RequestError;

/// Every way a GET or POST can fail after the request head was accepted.
///
/// The dispatcher turns `NotFound` into 404 and everything else into 400
/// with the `Display` text as body.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("invalid URL: {0}")]
    InvalidPath(String),

    #[error("invalid file extension: {0}")]
    InvalidExtension(String),

    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    #[error("path escapes the server root: {0}")]
    OutsideRoot(String),

    #[error("no target file: set a URL path or a `file` header")]
    MissingFileName,

    #[error("no such file: multipart form has no `file` field")]
    MissingFileField,

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("request body too large: {size} bytes exceeds limit of {max}")]
    BodyTooLarge { size: u64, max: u64 },

    #[error("request body truncated: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: u64, received: u64 },

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FileError::NotFound(_))
    }
}
