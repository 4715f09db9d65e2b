//! Reading and writing files under the server root.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::files::error::FileError;
use crate::files::multipart::{self, find_file, parse_boundary, parse_parts};
use crate::files::validator::{self, FileTarget};
use crate::http::mime::ContentType;
use crate::http::request::Request;

/// Default upper bound on a buffered multipart body (10 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Name of the multipart field and of the fallback header carrying the file.
const FILE_FIELD: &str = "file";

/// Flat file namespace rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_upload_size: u64,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_upload_size: u64) -> Self {
        Self {
            root: root.into(),
            max_upload_size,
        }
    }

    /// Serves a GET for a decoded URL path.
    ///
    /// The path is validated before anything on disk is looked at. A bare
    /// `/` is reported as not found.
    pub async fn get(&self, url_path: &str) -> Result<(Vec<u8>, ContentType), FileError> {
        let target = validator::resolve(url_path)?
            .ok_or_else(|| FileError::NotFound(url_path.to_string()))?;

        let body = self.read(&target).await?;
        Ok((body, target.content_type))
    }

    /// Reads a whole file into memory.
    pub async fn read(&self, target: &FileTarget) -> Result<Vec<u8>, FileError> {
        let path = self.contained_path(target).await?;

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileError::NotFound(target.filename.clone()),
            _ => FileError::Io(e),
        })
    }

    /// Stores the body of a POST and returns the file name written.
    ///
    /// Target selection, in order: a multipart `file` part (stored under the
    /// URL name if there is one, else under the part's filename), the raw
    /// body under the URL name, or the raw body under the `file` header
    /// after the declared Content-Type passed the whitelist.
    pub async fn post<R>(&self, request: &Request, body: &mut R) -> Result<String, FileError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let url_target = validator::resolve(&request.url_path()?)?;
        let length = request.body_length()?;

        if request.is_multipart() {
            return self.post_multipart(request, url_target, body, length).await;
        }

        let target = match url_target {
            Some(target) => target,
            None => {
                validator::check_content_type(request.header("Content-Type").unwrap_or(""))?;
                let name = request
                    .header(FILE_FIELD)
                    .ok_or(FileError::MissingFileName)?;
                validator::resolve_name(name)?
            }
        };

        self.write(&target, body, length).await?;
        Ok(target.filename)
    }

    async fn post_multipart<R>(
        &self,
        request: &Request,
        url_target: Option<FileTarget>,
        body: &mut R,
        length: u64,
    ) -> Result<String, FileError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        if length > self.max_upload_size {
            return Err(FileError::BodyTooLarge {
                size: length,
                max: self.max_upload_size,
            });
        }

        let boundary = parse_boundary(request.header("Content-Type").unwrap_or(""))?;

        // Grows with what actually arrives, not with the declared length
        let mut buf = Vec::new();
        body.take(length).read_to_end(&mut buf).await?;
        if (buf.len() as u64) < length {
            return Err(FileError::TruncatedBody {
                expected: length,
                received: buf.len() as u64,
            });
        }

        let parts = parse_parts(&buf, &boundary)?;
        let part = find_file(parts, FILE_FIELD).ok_or(FileError::MissingFileField)?;

        validator::check_content_type(part.content_type.as_deref().unwrap_or(""))?;

        let target = match url_target {
            Some(target) => target,
            None => validator::resolve_name(part.filename.as_deref().unwrap_or(""))?,
        };

        let multipart::Part { data, .. } = part;
        self.write(&target, &mut data.as_slice(), data.len() as u64)
            .await?;
        Ok(target.filename)
    }

    /// Copies `expected` bytes from `body` into the target, replacing any
    /// existing file. A failed or short copy removes what was written.
    pub async fn write<R>(
        &self,
        target: &FileTarget,
        body: &mut R,
        expected: u64,
    ) -> Result<u64, FileError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let path = self.contained_path(target).await?;
        let mut file = tokio::fs::File::create(&path).await?;

        match copy_exact(body, &mut file, expected).await {
            Ok(written) => {
                tracing::debug!(file = %target.filename, bytes = written, "File stored");
                Ok(written)
            }
            Err(e) => {
                drop(file);
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => tracing::warn!(file = %target.filename, error = %e, "Removed partial upload"),
                    Err(rm) => tracing::error!(
                        file = %target.filename,
                        error = %rm,
                        "Failed to remove partial upload"
                    ),
                }
                Err(e)
            }
        }
    }

    /// Joins the target onto the root and makes sure a symlink in its place
    /// does not lead outside the root.
    async fn contained_path(&self, target: &FileTarget) -> Result<PathBuf, FileError> {
        let path = self.root.join(&target.filename);

        match tokio::fs::symlink_metadata(&path).await {
            Ok(meta) if meta.file_type().is_symlink() => {
                let outside = || FileError::OutsideRoot(target.filename.clone());
                let root = tokio::fs::canonicalize(&self.root).await?;
                let resolved = tokio::fs::canonicalize(&path)
                    .await
                    .map_err(|_| outside())?;

                if !resolved.starts_with(&root) {
                    return Err(outside());
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(FileError::Io(e)),
        }

        Ok(path)
    }
}

async fn copy_exact<R, W>(reader: &mut R, writer: &mut W, expected: u64) -> Result<u64, FileError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut limited = reader.take(expected);
    let written = tokio::io::copy(&mut limited, writer).await?;
    writer.flush().await?;

    if written < expected {
        return Err(FileError::TruncatedBody {
            expected,
            received: written,
        });
    }

    Ok(written)
}
