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

use std::sync::{Arc, Mutex};

use eframe::egui;
use fetch_inspector::{Fetch, FetchRequest, FetchResponse, SharedAppState};
use log::warn;
use serde::Deserialize;

/// Fields of a match payload the client tracks in its state.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchPayload {
    match_id: Option<String>,
    is_live: Option<bool>,
}

/// API client used by the UI.
///
/// The fetcher is injected, so the UI never knows whether calls go through
/// the inspector or straight to the network.
pub struct ApiClient<F> {
    fetcher: Arc<F>,
    base_url: String,
    state: SharedAppState,
    last_result: Arc<Mutex<Option<String>>>,
}

impl<F> std::fmt::Debug for ApiClient<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<F> Clone for ApiClient<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            base_url: self.base_url.clone(),
            state: self.state.clone(),
            last_result: Arc::clone(&self.last_result),
        }
    }
}

impl<F: Fetch + 'static> ApiClient<F> {
    pub fn new(fetcher: F, base_url: String, state: SharedAppState) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            base_url,
            state,
            last_result: Arc::new(Mutex::new(None)),
        }
    }

    /// Absolute URL for an API path
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// One-line description of the most recent call, for the status bar
    pub fn last_result(&self) -> Option<String> {
        self.last_result.lock().ok().and_then(|r| r.clone())
    }

    /// GET `path`, keeping the shared application state in step.
    pub async fn get(&self, path: &str) -> Result<FetchResponse, F::Error> {
        self.state.update(|s| s.is_loading = Some(true));

        let url = self.endpoint_url(path);
        let result = self.fetcher.fetch(FetchRequest::new(url.clone())).await;

        let summary = match &result {
            Ok(response) => {
                let payload: MatchPayload = response.json().unwrap_or_default();
                let has_data = response.is_success();
                self.state.update(|s| {
                    s.has_data = Some(has_data);
                    if payload.match_id.is_some() {
                        s.match_id = payload.match_id;
                    }
                    if payload.is_live.is_some() {
                        s.is_live = payload.is_live;
                    }
                });
                format!("{} {} {}", response.status(), response.status_text(), url)
            }
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                format!("Failed: {url} ({e})")
            }
        };

        self.state.update(|s| s.is_loading = Some(false));
        if let Ok(mut last) = self.last_result.lock() {
            *last = Some(summary);
        }

        result
    }

    /// Issue `get` on the runtime and repaint the UI once it completes.
    pub fn spawn_get(&self, path: String, ctx: egui::Context)
    where
        F::Error: 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let _ = client.get(&path).await;
            ctx.request_repaint();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetch_inspector::{fetch_fn, AppStateSource};

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let client = ApiClient::new(
            fetch_fn(|_r: FetchRequest| async { Ok::<_, String>(FetchResponse::new(200, "{}")) }),
            "http://localhost:8080/".to_string(),
            SharedAppState::new(),
        );
        assert_eq!(client.endpoint_url("/api/standings"), "http://localhost:8080/api/standings");
        assert_eq!(client.endpoint_url("api/standings"), "http://localhost:8080/api/standings");
    }

    #[tokio::test]
    async fn test_get_updates_state() {
        let state = SharedAppState::new();
        let client = ApiClient::new(
            fetch_fn(|_r: FetchRequest| async {
                Ok::<_, String>(
                    FetchResponse::new(200, r#"{"matchId":"m-31","isLive":true}"#).with_status_text("OK"),
                )
            }),
            "http://localhost:8080".to_string(),
            state.clone(),
        );

        client.get("/api/matches/31").await.unwrap();

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.match_id.as_deref(), Some("m-31"));
        assert_eq!(snapshot.is_live, Some(true));
        assert_eq!(snapshot.has_data, Some(true));
        assert_eq!(snapshot.is_loading, Some(false));
        assert_eq!(
            client.last_result().as_deref(),
            Some("200 OK http://localhost:8080/api/matches/31")
        );
    }

    #[tokio::test]
    async fn test_get_failure_clears_loading() {
        let state = SharedAppState::new();
        let client = ApiClient::new(
            fetch_fn(|_r: FetchRequest| async { Err::<FetchResponse, _>("connection refused".to_string()) }),
            "http://localhost:8080".to_string(),
            state.clone(),
        );

        let err = client.get("/api/standings").await.unwrap_err();
        assert_eq!(err, "connection refused");
        assert_eq!(state.snapshot().unwrap().is_loading, Some(false));
        assert!(client.last_result().unwrap().starts_with("Failed:"));
    }
}
