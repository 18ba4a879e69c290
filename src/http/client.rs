use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde_json::Value;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::sync::Semaphore;

use crate::error::OracleError;
use crate::error::Result;

use super::config::ClientConfig;

/// A concurrency-bounded GraphQL POSTer.
///
/// Every attempt, including retries, goes through `semaphore`. The backoff
/// sleep happens after the permit is released and is itself serialized
/// through `backoff_lock` so a burst of failing callers doesn't wake up and
/// stampede the endpoint together.
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    semaphore: Semaphore,
    backoff_lock: Mutex<()>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| OracleError::ArgumentParse(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| OracleError::ArgumentParse(format!("invalid header value '{value}': {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.disable_ssl_verify);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.clone())?);
        }

        let http = builder.build()?;

        Ok(Client {
            http,
            semaphore: Semaphore::new(config.concurrent_requests),
            backoff_lock: Mutex::new(()),
            config,
        })
    }

    /// Posts `document` as a GraphQL query (or no body, if `None`) and
    /// returns the parsed JSON response. Retries on transport errors, 5xx
    /// responses, and malformed JSON up to `max_retries` times, returning an
    /// empty object once exhausted.
    pub async fn post(&self, document: Option<&str>) -> Value {
        let body = document.map(|d| json!({ "query": d }));

        for retries in 0..self.config.max_retries {
            let permit = self
                .semaphore
                .acquire()
                .await
                .expect("semaphore is never closed");

            let mut request = self.http.post(self.config.url.clone());
            if let Some(body) = &body {
                request = request.json(body);
            }
            let outcome = request.send().await;
            drop(permit);

            match outcome {
                Ok(response) if response.status().as_u16() < 500 => {
                    match response.json::<Value>().await {
                        Ok(value) => return value,
                        Err(error) => {
                            tracing::warn!(url = %self.config.url, %error, "malformed JSON response");
                        }
                    }
                }
                Ok(response) => {
                    tracing::warn!(url = %self.config.url, status = %response.status(), "server error posting to endpoint");
                }
                Err(error) => {
                    tracing::warn!(url = %self.config.url, %error, "error posting to endpoint");
                }
            }

            self.sleep_backoff(retries).await;
        }

        json!({})
    }

    async fn sleep_backoff(&self, retries: u32) {
        let Some(base) = self.config.backoff else { return };
        let delay = Duration::from_secs_f64(0.5 * (base as f64).powi(retries as i32));
        let _guard = self.backoff_lock.lock().await;
        tokio::time::sleep(delay).await;
    }

    /// No persistent connection pool handle to release explicitly; kept for
    /// symmetry with the process-wide context's teardown sequence.
    pub async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    use super::*;

    fn config_for(url: &Url) -> ClientConfig {
        let mut config = ClientConfig::new(url.clone());
        config.max_retries = 5;
        config
    }

    #[tokio::test]
    async fn retries_until_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
        let client = Client::new(config_for(&url)).unwrap();

        let body = client.post(Some("query { FUZZ }")).await;
        assert_eq!(body, json!({"data": {}}));
    }

    #[tokio::test]
    async fn exhausts_retries_and_returns_empty_object() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
        let mut config = config_for(&url);
        config.max_retries = 2;
        let client = Client::new(config).unwrap();

        let body = client.post(Some("query { FUZZ }")).await;
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn posts_null_body_when_document_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
        let client = Client::new(config_for(&url)).unwrap();

        let body = client.post(None).await;
        assert_eq!(body, json!({"data": {}}));
    }

    #[tokio::test]
    async fn backoff_sleeps_between_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
        let mut config = config_for(&url);
        config.max_retries = 2;
        config.backoff = Some(2);
        let client = Client::new(config).unwrap();

        let started = tokio::time::Instant::now();
        client.post(Some("query { FUZZ }")).await;
        assert!(started.elapsed() >= Duration::from_millis(450));
    }
}
