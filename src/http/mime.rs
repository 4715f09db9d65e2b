/// Content types the server is willing to store and serve.
///
/// Each variant is tied to exactly one file extension and one MIME string,
/// so the extension whitelist and the content-type whitelist can never
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `.html` → `text/html`
    Html,
    /// `.txt` → `text/plain`
    Plain,
    /// `.gif` → `image/gif`
    Gif,
    /// `.jpeg` → `image/jpeg`
    Jpeg,
    /// `.jpg` → `image/jpg`
    Jpg,
    /// `.css` → `text/css`
    Css,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Html,
        ContentType::Plain,
        ContentType::Gif,
        ContentType::Jpeg,
        ContentType::Jpg,
        ContentType::Css,
    ];

    /// Looks up a content type by file extension (without the dot).
    ///
    /// Matching is exact: `TXT` is not `txt`.
    ///
    /// ```
    /// # use flatserve::http::mime::ContentType;
    /// assert_eq!(ContentType::from_extension("css"), Some(ContentType::Css));
    /// assert_eq!(ContentType::from_extension("exe"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "html" => Some(ContentType::Html),
            "txt" => Some(ContentType::Plain),
            "gif" => Some(ContentType::Gif),
            "jpeg" => Some(ContentType::Jpeg),
            "jpg" => Some(ContentType::Jpg),
            "css" => Some(ContentType::Css),
            _ => None,
        }
    }

    /// Looks up a content type by a declared MIME value.
    ///
    /// Only the essence is compared: parameters after `;` are ignored and
    /// the comparison is ASCII case-insensitive.
    ///
    /// ```
    /// # use flatserve::http::mime::ContentType;
    /// assert_eq!(ContentType::from_mime("text/plain; charset=utf-8"), Some(ContentType::Plain));
    /// assert_eq!(ContentType::from_mime("application/json"), None);
    /// ```
    pub fn from_mime(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or("").trim();

        Self::ALL
            .into_iter()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(essence))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Plain => "text/plain",
            ContentType::Gif => "image/gif",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Jpg => "image/jpg",
            ContentType::Css => "text/css",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContentType::Html => "html",
            ContentType::Plain => "txt",
            ContentType::Gif => "gif",
            ContentType::Jpeg => "jpeg",
            ContentType::Jpg => "jpg",
            ContentType::Css => "css",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
