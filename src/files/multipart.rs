//! `multipart/form-data` decoding.
//!
//! The body is buffered in full (bounded by the caller) and split on the
//! boundary declared in the request's Content-Type.

use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("missing boundary in multipart Content-Type")]
    MissingBoundary,
    #[error("invalid multipart boundary")]
    InvalidBoundary,
    #[error("missing Content-Disposition header in part")]
    MissingContentDisposition,
    #[error("invalid part headers: {0}")]
    InvalidPartHeaders(String),
    #[error("unexpected end of multipart data")]
    UnexpectedEof,
}

/// One decoded part of a multipart body.
#[derive(Debug, Clone)]
pub struct Part {
    /// Field name from Content-Disposition.
    pub name: String,
    /// Filename from Content-Disposition, if present.
    pub filename: Option<String>,
    /// The part's own Content-Type, if present.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Part {
    pub fn is_file(&self) -> bool {
        self.filename.as_deref().is_some_and(|f| !f.is_empty())
    }
}

/// Extracts the boundary parameter from a Content-Type value.
///
/// Content-Type format: `multipart/form-data; boundary=----WebKitFormBoundary...`
pub fn parse_boundary(content_type: &str) -> Result<String, MultipartError> {
    for param in split_params(content_type).into_iter().skip(1) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };

        if key.trim().eq_ignore_ascii_case("boundary") {
            let boundary = unquote(value);
            if boundary.is_empty() || boundary.len() > 70 {
                return Err(MultipartError::InvalidBoundary);
            }
            return Ok(boundary);
        }
    }

    Err(MultipartError::MissingBoundary)
}

/// Splits `body` into parts delimited by `boundary`.
///
/// A delimiter only counts at the start of a line and when the rest of its
/// line is optional spaces or tabs (another part follows) or `--` (end).
pub fn parse_parts(body: &[u8], boundary: &str) -> Result<Vec<Part>, MultipartError> {
    let delimiter = format!("--{boundary}").into_bytes();
    let mut next = Vec::with_capacity(delimiter.len() + 2);
    next.extend_from_slice(b"\r\n");
    next.extend_from_slice(&delimiter);

    // Skip preamble
    let first = body
        .starts_with(&delimiter)
        .then(|| delimiter_line_end(body, delimiter.len()))
        .flatten();
    let (mut pos, mut closed) = match first {
        Some(found) => found,
        None => {
            let (_, after, closed) = find_delimiter(body, &next, 0)?;
            (after, closed)
        }
    };

    let mut parts = Vec::new();

    while !closed {
        let (raw_headers, data_start) = if body[pos..].starts_with(b"\r\n") {
            (&body[pos..pos], pos + 2)
        } else {
            let head_end = find(body, b"\r\n\r\n", pos).ok_or(MultipartError::UnexpectedEof)?;
            (&body[pos..head_end], head_end + 4)
        };
        let headers = parse_part_headers(raw_headers)?;

        let disposition = headers
            .get("content-disposition")
            .ok_or(MultipartError::MissingContentDisposition)?;
        let (name, filename) = parse_content_disposition(disposition)?;

        // Data runs up to the CRLF that precedes the next delimiter
        let (data_end, after, last) = find_delimiter(body, &next, data_start)?;

        parts.push(Part {
            name,
            filename,
            content_type: headers.get("content-type").cloned(),
            data: body[data_start..data_end].to_vec(),
        });

        pos = after;
        closed = last;
    }

    Ok(parts)
}

/// Returns the first part named `field` that carries a filename.
pub fn find_file(parts: Vec<Part>, field: &str) -> Option<Part> {
    parts
        .into_iter()
        .find(|p| p.name == field && p.is_file())
}

fn parse_part_headers(raw: &[u8]) -> Result<HashMap<String, String>, MultipartError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| MultipartError::InvalidPartHeaders("not valid UTF-8".to_string()))?;

    let mut headers = HashMap::new();
    for line in text.split("\r\n").filter(|l| !l.is_empty()) {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| MultipartError::InvalidPartHeaders(line.to_string()))?;
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    Ok(headers)
}

fn parse_content_disposition(value: &str) -> Result<(String, Option<String>), MultipartError> {
    let mut params = split_params(value).into_iter();

    if !params
        .next()
        .is_some_and(|kind| kind.eq_ignore_ascii_case("form-data"))
    {
        return Err(MultipartError::InvalidPartHeaders(value.to_string()));
    }

    let mut name = None;
    let mut filename = None;

    for param in params {
        let Some((key, val)) = param.split_once('=') else {
            continue;
        };

        match key.trim().to_ascii_lowercase().as_str() {
            "name" => name = Some(unquote(val)),
            "filename" => filename = Some(unquote(val)),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| MultipartError::InvalidPartHeaders(value.to_string()))?;
    Ok((name, filename))
}

/// Splits a header value on `;` outside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(value[start..].trim());

    params
}

/// Strips surrounding quotes and resolves backslash escapes.
fn unquote(value: &str) -> String {
    let value = value.trim();
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Looks at what follows a delimiter starting right before `pos`.
///
/// Returns the position after the delimiter line and whether it closed
/// the body, or `None` when the match was just part data.
fn delimiter_line_end(body: &[u8], mut pos: usize) -> Option<(usize, bool)> {
    if body[pos..].starts_with(b"--") {
        return Some((pos + 2, true));
    }

    while matches!(body.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }

    body[pos..].starts_with(b"\r\n").then_some((pos + 2, false))
}

/// Finds the next `CRLF--boundary` line at or after `start`.
///
/// Returns where the CRLF begins, where the next part begins, and whether
/// the delimiter closed the body.
fn find_delimiter(
    body: &[u8],
    next: &[u8],
    mut start: usize,
) -> Result<(usize, usize, bool), MultipartError> {
    loop {
        let at = find(body, next, start).ok_or(MultipartError::UnexpectedEof)?;

        if let Some((after, closed)) = delimiter_line_end(body, at + next.len()) {
            return Ok((at, after, closed));
        }

        start = at + 1;
    }
}

fn find(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if start > haystack.len() {
        return None;
    }

    haystack[start..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + start)
}
