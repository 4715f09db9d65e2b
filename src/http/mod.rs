//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.0 and HTTP/1.1 server: one request per
//! connection, and every response closes the connection.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine and the dispatcher
//! - **`parser`**: parses the request line and headers from a byte buffer
//! - **`request`**: request representation, method enum, header helpers
//! - **`response`**: the fixed set of response shapes
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: the whitelist of content types and their extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request head
//!        └──────┬──────┘
//!               │ Head parsed (or malformed → 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Dispatch, read/write the file, drain body
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, shut down write half
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flatserve::files::FileStore;
//! use flatserve::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let store = Arc::new(FileStore::new(".", 10 * 1024 * 1024));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let store = store.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, store);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
