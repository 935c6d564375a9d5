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

//! Fetch decorator that records completed calls into a [`RequestLog`].
//!
//! The wrapper forwards the request untouched, reads a copy of the response
//! body, and hands the original response back to the caller. Failures of the
//! underlying fetch are logged and returned as-is.

use std::fmt;
use std::future::Future;

use log::{debug, error, info};
use serde_json::Value;
use tokio::time::Instant;

use crate::fetch::{Fetch, FetchRequest, FetchResponse};
use crate::request_log::{RequestLog, RequestLogEntry};

/// Wrap `inner` so every call it completes is recorded in `log`.
pub fn instrument<F: Fetch>(inner: F, log: RequestLog) -> Instrumented<F> {
    Instrumented { inner, log }
}

/// Instrumented fetcher returned by [`instrument`].
pub struct Instrumented<F> {
    inner: F,
    log: RequestLog,
}

impl<F> fmt::Debug for Instrumented<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl<F> Instrumented<F> {
    #[must_use]
    pub fn request_log(&self) -> &RequestLog {
        &self.log
    }

    #[must_use]
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Fetch> Fetch for Instrumented<F> {
    type Error = F::Error;

    fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse, Self::Error>> + Send {
        let url = request.url().to_string();
        let method = request.method().to_string();

        async move {
            let started = Instant::now();

            let response = match self.inner.fetch(request).await {
                Ok(response) => response,
                Err(e) => {
                    error!("[fetch] {} {} failed: {}", method, url, e);
                    return Err(e);
                }
            };

            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            info!(
                "[fetch] {} {} -> {} {} ({}ms)",
                method,
                url,
                response.status(),
                response.status_text(),
                elapsed_ms
            );

            let copy = response.tee_body();
            match serde_json::from_slice::<Value>(&copy) {
                Ok(body) => {
                    self.log.push(RequestLogEntry::new(
                        url,
                        method,
                        response.status(),
                        elapsed_ms,
                        body,
                    ));
                }
                Err(e) => {
                    debug!("[fetch] {} {} body is not JSON, not recorded: {}", method, url, e);
                }
            }

            Ok(response)
        }
    }
}

/// Fetcher handed to call sites: instrumented when the inspector is active,
/// the untouched inner fetcher otherwise.
#[derive(Debug)]
pub enum DebugFetch<F> {
    Plain(F),
    Instrumented(Instrumented<F>),
}

impl<F> DebugFetch<F> {
    #[must_use]
    pub fn is_instrumented(&self) -> bool {
        matches!(self, Self::Instrumented(_))
    }
}

impl<F: Fetch> Fetch for DebugFetch<F> {
    type Error = F::Error;

    fn fetch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse, Self::Error>> + Send {
        async move {
            match self {
                Self::Plain(inner) => inner.fetch(request).await,
                Self::Instrumented(inner) => inner.fetch(request).await,
            }
        }
    }
}
