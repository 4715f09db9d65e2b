//! File namespace served over HTTP
//!
//! Validation of target names and content types, multipart decoding, and
//! the GET/POST file transfers themselves.

pub mod error;
pub mod multipart;
pub mod transfer;
pub mod validator;

pub use error::FileError;
pub use transfer::{FileStore, DEFAULT_MAX_UPLOAD_SIZE};
pub use validator::{FileTarget, check_content_type, resolve, resolve_name};
