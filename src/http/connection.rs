use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::files::{FileError, FileStore};
use crate::http::mime::ContentType;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 4096;

const SUPPORTED_VERSIONS: [&str; 2] = ["HTTP/1.0", "HTTP/1.1"];

/// One client connection: a single request, a single response, then close.
pub struct Connection<S = TcpStream> {
    stream: S,
    buffer: BytesMut,
    store: Arc<FileStore>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, store: Arc<FileStore>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            store,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            // An error below leaves the connection Closed.
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    Ok(req) => ConnectionState::Processing(req),
                    Err(e) => {
                        tracing::warn!(error = %e, "Malformed request");
                        let response =
                            Response::bad_request(format!("Error parsing HTTP request: {e}"));
                        ConnectionState::Writing(ResponseWriter::new(&response))
                    }
                },

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(&req).await?;

                    tracing::info!(
                        method = req.method.as_str(),
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(error = %e, "Shutdown after response failed");
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Reads until a full request head is buffered.
    ///
    /// The inner error is a protocol failure that still deserves a 400;
    /// the outer one is a socket failure.
    pub async fn read_request(&mut self) -> anyhow::Result<Result<Request, ParseError>> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    // Whatever follows the head is the start of the body
                    let _ = self.buffer.split_to(consumed);
                    return Ok(Ok(request));
                }

                Err(ParseError::Incomplete) => {}

                Err(e) => return Ok(Err(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Peer closed before the head was complete
                return Ok(Err(ParseError::Incomplete));
            }
        }
    }

    async fn handle_request(&mut self, req: &Request) -> anyhow::Result<Response> {
        let length = req.body_length().unwrap_or(0);
        let store = Arc::clone(&self.store);

        let mut body = (&self.buffer[..]).chain(&mut self.stream).take(length);
        let response = dispatch(&store, req, &mut body).await;

        // Leave nothing unread on the socket so the client sees the response
        tokio::io::copy(&mut body, &mut tokio::io::sink()).await?;

        Ok(response)
    }
}

/// Picks the response for one request.
///
/// The version is checked before the method; every file error is mapped in
/// one place.
pub async fn dispatch<R>(store: &FileStore, req: &Request, body: &mut R) -> Response
where
    R: AsyncRead + Unpin + ?Sized,
{
    if !SUPPORTED_VERSIONS.contains(&req.version.as_str()) {
        return Response::bad_request("Invalid HTTP version");
    }

    let result = match &req.method {
        Method::GET => get(store, req)
            .await
            .map(|(body, content_type)| Response::ok_with_body(body, content_type)),
        Method::POST => store.post(req, body).await.map(|_| Response::ok()),
        Method::PUT | Method::DELETE | Method::PATCH => return Response::not_implemented(),
        Method::Other(_) => return Response::bad_request("Invalid HTTP method"),
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                method = req.method.as_str(),
                path = %req.path,
                reason = %e,
                "Request rejected"
            );
            error_response(&e)
        }
    }
}

async fn get(store: &FileStore, req: &Request) -> Result<(Vec<u8>, ContentType), FileError> {
    let path = req.url_path()?;
    store.get(&path).await
}

pub fn error_response(err: &FileError) -> Response {
    match err {
        FileError::NotFound(_) => Response::not_found(),
        other => Response::bad_request(other.to_string()),
    }
}
