use flatserve::files::{FileError, check_content_type, resolve, resolve_name};
use flatserve::http::mime::ContentType;

#[test]
fn test_resolve_accepts_every_whitelisted_extension() {
    let expected = [
        ("html", "text/html"),
        ("txt", "text/plain"),
        ("gif", "image/gif"),
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpg"),
        ("css", "text/css"),
    ];

    for (ext, mime) in expected {
        let target = resolve(&format!("/name.{ext}")).unwrap().unwrap();

        assert_eq!(target.filename, format!("name.{ext}"));
        assert_eq!(target.extension, ext);
        assert_eq!(target.content_type.as_str(), mime);
    }
}

#[test]
fn test_resolve_root_has_no_target() {
    assert!(resolve("/").unwrap().is_none());
    assert!(resolve("").unwrap().is_none());
}

#[test]
fn test_resolve_rejects_other_extensions() {
    for path in ["/run.exe", "/data.json", "/page.HTML", "/notes.tx"] {
        assert!(
            matches!(resolve(path), Err(FileError::InvalidExtension(_))),
            "{path}"
        );
    }
}

#[test]
fn test_resolve_rejects_zero_or_many_dots() {
    for path in ["/README", "/archive.tar.css", "/a..txt", "/..", "/.txt"] {
        assert!(matches!(resolve(path), Err(FileError::InvalidPath(_))), "{path}");
    }
}

#[test]
fn test_resolve_rejects_extra_separators() {
    for path in ["/dir/page.html", "//page.html", "/dir\\page.html", "/../page.html"] {
        assert!(matches!(resolve(path), Err(FileError::InvalidPath(_))), "{path}");
    }
}

#[test]
fn test_resolve_name_without_leading_slash() {
    let target = resolve_name("upload.gif").unwrap();

    assert_eq!(target.content_type, ContentType::Gif);
}

#[test]
fn test_resolve_name_rejects_empty() {
    assert!(resolve_name("").is_err());
}

#[test]
fn test_check_content_type_whitelist() {
    assert_eq!(check_content_type("text/html").unwrap(), ContentType::Html);
    assert_eq!(check_content_type("image/jpg").unwrap(), ContentType::Jpg);
    assert_eq!(check_content_type("image/jpeg").unwrap(), ContentType::Jpeg);
    assert_eq!(
        check_content_type("Text/Plain; charset=utf-8").unwrap(),
        ContentType::Plain
    );
}

#[test]
fn test_check_content_type_rejects_others() {
    for value in ["", "application/octet-stream", "text/javascript", "image/png"] {
        assert!(
            matches!(check_content_type(value), Err(FileError::InvalidContentType(_))),
            "{value}"
        );
    }
}

#[test]
fn test_content_type_extension_round_trip() {
    for ct in ContentType::ALL {
        assert_eq!(ContentType::from_extension(ct.extension()), Some(ct));
        assert_eq!(ContentType::from_mime(ct.as_str()), Some(ct));
    }
}
