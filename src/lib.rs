//! flatserve - minimal HTTP file server
//!
//! Serves GET downloads and POST uploads for a flat, extension-restricted
//! set of files under one directory.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
