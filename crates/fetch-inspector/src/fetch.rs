// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generic asynchronous fetch capability.
//!
//! Call sites depend on the [`Fetch`] trait rather than on a concrete HTTP
//! client, so the instrumented wrapper can be injected in place of the real
//! fetcher without the caller noticing.

use std::fmt;
use std::future::Future;

use thiserror::Error;

/// Method used when the caller does not supply one.
pub const DEFAULT_METHOD: &str = "GET";

/// Optional part of a fetch call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// A fetch call: URL plus optional options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: String,
    options: Option<RequestOptions>,
}

impl FetchRequest {
    /// Plain `GET` of `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: None,
        }
    }

    pub fn with_options(url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            url: url.into(),
            options: Some(options),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn options(&self) -> Option<&RequestOptions> {
        self.options.as_ref()
    }

    /// Request method, falling back to [`DEFAULT_METHOD`].
    #[must_use]
    pub fn method(&self) -> &str {
        self.options
            .as_ref()
            .and_then(|o| o.method.as_deref())
            .unwrap_or(DEFAULT_METHOD)
    }
}

/// A completed response with its body fully received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Independent copy of the body that can be consumed without touching
    /// this response.
    #[must_use]
    pub fn tee_body(&self) -> Vec<u8> {
        self.body.clone()
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Asynchronous network fetch.
///
/// Errors are surfaced through an associated type so wrappers can forward
/// them without conversion.
pub trait Fetch: Send + Sync {
    type Error: fmt::Display + Send;

    fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse, Self::Error>> + Send;
}

/// [`Fetch`] implementation backed by a closure.
#[derive(Clone)]
pub struct FetchFn<F>(F);

impl<F> fmt::Debug for FetchFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchFn").finish_non_exhaustive()
    }
}

/// Wrap a closure returning a future as a [`Fetch`] implementation.
pub fn fetch_fn<F, Fut, E>(f: F) -> FetchFn<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse, E>> + Send,
    E: fmt::Display + Send,
{
    FetchFn(f)
}

impl<F, Fut, E> Fetch for FetchFn<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse, E>> + Send,
    E: fmt::Display + Send,
{
    type Error = E;

    fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse, Self::Error>> + Send {
        (self.0)(request)
    }
}

/// Errors raised by [`ReqwestFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Real HTTP fetcher built on reqwest.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for ReqwestFetcher {
    type Error = FetchError;

    fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse, Self::Error>> + Send {
        async move {
            let method = reqwest::Method::from_bytes(request.method().as_bytes())
                .map_err(|e| FetchError::InvalidMethod(format!("{} ({e})", request.method())))?;

            let mut builder = self.client.request(method, request.url());
            if let Some(options) = request.options() {
                for (name, value) in &options.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                if let Some(body) = &options.body {
                    builder = builder.body(body.clone());
                }
            }

            let response = builder.send().await?;
            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(FetchResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_defaults_to_get() {
        assert_eq!(FetchRequest::new("/api/ping").method(), "GET");

        let options = RequestOptions {
            method: Some("POST".to_string()),
            ..Default::default()
        };
        assert_eq!(FetchRequest::with_options("/api/vote", options).method(), "POST");
        assert_eq!(
            FetchRequest::with_options("/api/ping", RequestOptions::default()).method(),
            "GET"
        );
    }

    #[test]
    fn test_tee_leaves_body_intact() {
        let response = FetchResponse::new(200, b"{\"ok\":true}".to_vec());
        let copy = response.tee_body();
        drop(copy);
        assert_eq!(response.body(), b"{\"ok\":true}");
        assert_eq!(response.text(), "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_fetch_fn_forwards_request() {
        let fetcher = fetch_fn(|request: FetchRequest| async move {
            Ok::<_, String>(FetchResponse::new(201, request.url().as_bytes().to_vec()))
        });

        let response = fetcher.fetch(FetchRequest::new("/api/echo")).await.unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.text(), "/api/echo");
    }
}
