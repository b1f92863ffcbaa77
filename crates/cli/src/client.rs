//! HTTP client for the benchmark service

use crate::error::{Error, Result};
use greenbench_core::SubmissionRequest;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Local benchmark service endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1234/upload_data";

/// Benchmark service client
pub struct BenchmarkClient {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl BenchmarkClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("greenbench"));

        // Runs can take minutes; the service enforces its own container timeout
        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(None::<Duration>)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST a submission and return the raw response document
    pub fn submit(&self, request: &SubmissionRequest) -> Result<Value> {
        debug!("POST {} ({})", self.endpoint, request.data.repo_url);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let document: Value = response.json()?;
        debug!("Benchmark service answered with status {}", status);
        Ok(document)
    }
}

/// Only http(s) endpoints are accepted
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Validation(format!(
            "Endpoint must use http or https, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        let url = parse_endpoint(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(url.port(), Some(1234));
        assert_eq!(url.path(), "/upload_data");

        assert!(parse_endpoint("  https://bench.example.com/upload_data ").is_ok());
        assert!(matches!(
            parse_endpoint("ftp://bench.example.com"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(parse_endpoint("not a url"), Err(Error::Url(_))));
    }

    #[test]
    fn test_client_keeps_endpoint() {
        let client = BenchmarkClient::new(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(client.endpoint().as_str(), DEFAULT_ENDPOINT);
    }
}
