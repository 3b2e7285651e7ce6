//! HTTP client shared by the channel integrations

mod client;

pub use client::{HttpClient, HttpClientBuilder};
