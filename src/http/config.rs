use std::collections::HashMap;

use url::Url;

/// Connection and retry policy for the [`super::Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: Url,
    pub headers: HashMap<String, String>,
    pub max_retries: u32,
    pub concurrent_requests: usize,
    pub proxy: Option<Url>,
    /// Exponential backoff base; `None` disables the inter-retry sleep
    /// entirely (the client still retries, just without delay).
    pub backoff: Option<u32>,
    pub disable_ssl_verify: bool,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        ClientConfig {
            url,
            headers: HashMap::new(),
            max_retries: 3,
            concurrent_requests: 50,
            proxy: None,
            backoff: None,
            disable_ssl_verify: false,
        }
    }

    /// Applies the `slow` CLI profile: one request at a time, a generous
    /// retry budget, and a backoff base of 2.
    pub fn slow_profile(mut self) -> Self {
        self.concurrent_requests = 1;
        self.max_retries = 50;
        self.backoff = Some(2);
        self
    }
}
