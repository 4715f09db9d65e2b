//! Target validation.
//!
//! Pure functions: nothing here touches the filesystem. A name is accepted
//! only if it is a single path component of the form `<stem>.<ext>` with an
//! extension from the whitelist.

use crate::files::error::FileError;
use crate::http::mime::ContentType;

/// A validated file name and the content type it is served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub filename: String,
    pub extension: String,
    pub content_type: ContentType,
}

/// Resolves a decoded URL path to a target.
///
/// `Ok(None)` means the path named no file at all (`/`); callers decide
/// what that means for their method.
pub fn resolve(url_path: &str) -> Result<Option<FileTarget>, FileError> {
    let name = url_path.strip_prefix('/').unwrap_or(url_path);

    if name.is_empty() {
        return Ok(None);
    }

    resolve_name(name).map(Some)
}

/// Validates a bare file name taken from the URL, a header, or a form part.
pub fn resolve_name(name: &str) -> Result<FileTarget, FileError> {
    if name.contains(['/', '\\']) {
        return Err(FileError::InvalidPath(name.to_string()));
    }

    let segments: Vec<&str> = name.split('.').collect();
    let [stem, extension] = segments.as_slice() else {
        return Err(FileError::InvalidPath(name.to_string()));
    };

    if stem.is_empty() || stem.contains('\0') {
        return Err(FileError::InvalidPath(name.to_string()));
    }

    let content_type = ContentType::from_extension(extension)
        .ok_or_else(|| FileError::InvalidExtension(extension.to_string()))?;

    Ok(FileTarget {
        filename: name.to_string(),
        extension: extension.to_string(),
        content_type,
    })
}

/// Checks a declared MIME value against the whitelist.
pub fn check_content_type(value: &str) -> Result<ContentType, FileError> {
    ContentType::from_mime(value).ok_or_else(|| FileError::InvalidContentType(value.to_string()))
}
