//! Connection acceptance

pub mod listener;

pub use listener::Server;
