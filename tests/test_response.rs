use flatserve::http::mime::ContentType;
use flatserve::http::response::{Response, ResponseBuilder, StatusCode};
use flatserve::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
}

#[test]
fn test_every_response_closes_connection() {
    for response in [
        Response::ok(),
        Response::ok_with_body(b"x".to_vec(), ContentType::Plain),
        Response::bad_request("nope"),
        Response::not_found(),
        Response::not_implemented(),
    ] {
        assert_eq!(response.header("Connection"), Some("close"));
    }
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    assert_eq!(
        response.header("Content-Length").unwrap(),
        body.len().to_string()
    );
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.header("Content-Length").unwrap(), "999");
}

#[test]
fn test_response_ok_without_body() {
    let response = Response::ok();

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
    assert_eq!(response.header("Content-Type"), None);
}

#[test]
fn test_response_ok_with_body_sets_content_type() {
    let response = Response::ok_with_body(b"p { color: red }".to_vec(), ContentType::Css);

    assert_eq!(response.header("Content-Type"), Some("text/css"));
    assert_eq!(response.header("Content-Length"), Some("16"));
}

#[test]
fn test_response_bad_request_carries_message() {
    let response = Response::bad_request("invalid URL: a/b.txt");

    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.body, b"invalid URL: a/b.txt".to_vec());
    assert_eq!(response.header("Content-Length"), Some("20"));
}

#[test]
fn test_response_not_found_has_no_body() {
    let response = Response::not_found();

    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.body.is_empty());
}

#[test]
fn test_response_not_implemented_has_no_body() {
    let response = Response::not_implemented();

    assert_eq!(response.status, StatusCode::NotImplemented);
    assert!(response.body.is_empty());
}

#[test]
fn test_serialize_always_http11() {
    let wire = serialize_response(&Response::bad_request("bad"));
    let text = String::from_utf8(wire).unwrap();

    assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(text.contains("Connection: close\r\n"));
    assert!(text.contains("Content-Type: text/plain\r\n"));
    assert!(text.ends_with("\r\n\r\nbad"));
}
