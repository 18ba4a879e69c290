//! Concurrency-bounded HTTP POSTing with retries and backoff.

mod client;
mod config;

pub use client::Client;
pub use config::ClientConfig;
