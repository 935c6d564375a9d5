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

//! Development-mode network call inspector.
//!
//! This library observes every fetch an application issues, keeps the most
//! recent completed calls in a bounded log, and provides the models behind a
//! status panel and a log viewer modal. It is organized in layers:
//!
//! - **Gate**: decides once at startup whether the inspector runs at all
//! - **Fetch**: the [`Fetch`] abstraction call sites depend on, with a
//!   reqwest-backed implementation
//! - **Interceptor**: the [`instrument`] decorator recording into a [`RequestLog`]
//! - **Panel / Viewer**: UI-agnostic state for the overlay and the modal
//! - **Perf**: load time and memory usage logging
//!
//! # Quick Start
//!
//! ```
//! use fetch_inspector::{
//!     fetch_fn, EnablementFlag, Fetch, FetchRequest, FetchResponse, InspectorConfig,
//!     InspectorContext,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ctx = InspectorContext::new(
//!     EnablementFlag::from_url_str("http://localhost:8080/?debug=true"),
//!     InspectorConfig::default(),
//! );
//!
//! let fetcher = ctx.wrap(fetch_fn(|_request: FetchRequest| async {
//!     Ok::<_, String>(FetchResponse::new(200, r#"{"ok":true}"#))
//! }));
//!
//! let response = fetcher.fetch(FetchRequest::new("/api/ping")).await.unwrap();
//! assert_eq!(response.status(), 200);
//! assert_eq!(ctx.request_log().len(), 1);
//! # }
//! ```

pub mod fetch;
pub mod gate;
pub mod interceptor;
pub mod panel;
pub mod perf;
pub mod request_log;
pub mod snapshot;
pub mod viewer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub use fetch::{fetch_fn, Fetch, FetchError, FetchFn, FetchRequest, FetchResponse, ReqwestFetcher, RequestOptions};
pub use gate::{is_enabled, EnablementFlag};
pub use interceptor::{instrument, DebugFetch, Instrumented};
pub use panel::{PanelSummary, StatusPanel};
pub use perf::{MemoryProbe, MemoryUsage, NavigationTiming, PerfLogger, ProcMemoryProbe};
pub use request_log::{RequestLog, RequestLogEntry, DEFAULT_MAX_ENTRIES};
pub use snapshot::{AppStateSnapshot, AppStateSource, NoAppState, SharedAppState};
pub use viewer::{EntryBlock, EntryStyle, LogViewer, ViewerContent};

/// Configuration for the inspector context.
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Number of log entries retained.
    pub max_entries: usize,
    /// Status panel refresh period.
    pub panel_refresh: Duration,
    /// Memory sampling period.
    pub memory_sample: Duration,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            panel_refresh: Duration::from_secs(2),
            memory_sample: Duration::from_secs(30),
        }
    }
}

/// Owner of all inspector state for one session.
///
/// A disabled context never wraps a fetcher, never shows a panel, and never
/// schedules a task. Scheduled tasks stop on [`InspectorContext::shutdown`]
/// or when the context is dropped.
pub struct InspectorContext {
    flag: EnablementFlag,
    config: InspectorConfig,
    log: RequestLog,
    panel: StatusPanel,
    perf: PerfLogger,
    perf_started: AtomicBool,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for InspectorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectorContext")
            .field("flag", &self.flag)
            .field("config", &self.config)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl InspectorContext {
    #[must_use]
    pub fn new(flag: EnablementFlag, config: InspectorConfig) -> Self {
        if flag.is_enabled() {
            info!("Network inspector enabled");
        }

        Self {
            flag,
            log: RequestLog::with_capacity(config.max_entries),
            config,
            panel: StatusPanel::new(),
            perf: PerfLogger::new(),
            perf_started: AtomicBool::new(false),
            cancel_token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flag.is_enabled()
    }

    /// Shared request log. Stays empty while the inspector is disabled.
    #[must_use]
    pub fn request_log(&self) -> &RequestLog {
        &self.log
    }

    /// Compose the fetcher call sites should use.
    pub fn wrap<F: Fetch>(&self, fetch: F) -> DebugFetch<F> {
        if self.is_enabled() {
            DebugFetch::Instrumented(instrument(fetch, self.log.clone()))
        } else {
            DebugFetch::Plain(fetch)
        }
    }

    /// Status panel, once activated.
    #[must_use]
    pub fn status_panel(&self) -> Option<&StatusPanel> {
        self.panel.is_active().then_some(&self.panel)
    }

    /// Show the status panel and start its periodic refresh.
    ///
    /// Must be called from within a tokio runtime. Returns `false` when the
    /// inspector is disabled or already active.
    pub fn activate(&self, source: Arc<dyn AppStateSource>) -> bool {
        if !self.is_enabled() || !self.panel.activate() {
            return false;
        }

        self.panel.refresh(source.snapshot().as_ref(), self.log.len());
        self.spawn_panel_refresh(source);
        true
    }

    /// Start periodic memory logging, independent of the status panel.
    ///
    /// Must be called from within a tokio runtime. Returns `false` when the
    /// inspector is disabled, sampling was already started, or the probe
    /// yields nothing at startup.
    pub fn start_perf(&self, probe: Option<Arc<dyn MemoryProbe>>) -> bool {
        if !self.is_enabled() || self.perf_started.swap(true, Ordering::SeqCst) {
            return false;
        }

        match probe {
            Some(probe) if probe.sample().is_some() => {
                self.spawn_memory_sampler(probe);
                true
            }
            _ => {
                debug!("Memory introspection unavailable, sampling skipped");
                false
            }
        }
    }

    fn spawn_panel_refresh(&self, source: Arc<dyn AppStateSource>) {
        let panel = self.panel.clone();
        let log = self.log.clone();
        let cancel_token = self.cancel_token.clone();
        let period = self.config.panel_refresh;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        panel.refresh(source.snapshot().as_ref(), log.len());
                    }
                    () = cancel_token.cancelled() => {
                        debug!("Status panel refresh stopped");
                        return;
                    }
                }
            }
        });
    }

    fn spawn_memory_sampler(&self, probe: Arc<dyn MemoryProbe>) {
        let cancel_token = self.cancel_token.clone();
        let period = self.config.memory_sample;

        tokio::spawn(async move {
            // First sample one full period after start
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Some(usage) = probe.sample() {
                            perf::log_memory(usage);
                        }
                    }
                    () = cancel_token.cancelled() => {
                        debug!("Memory sampler stopped");
                        return;
                    }
                }
            }
        });
    }

    /// Log the session's load time once. No-op while disabled.
    pub fn log_load_time(&self, timing: &NavigationTiming) -> Option<Duration> {
        if !self.is_enabled() {
            return None;
        }
        self.perf.log_load_time(timing)
    }

    /// Stop all scheduled tasks.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for InspectorContext {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    fn enabled() -> InspectorContext {
        InspectorContext::new(EnablementFlag::forced(true), InspectorConfig::default())
    }

    fn json_fetcher() -> impl Fetch<Error = String> {
        fetch_fn(|_request: FetchRequest| async { Ok::<_, String>(FetchResponse::new(200, "{}")) })
    }

    struct CountingProbe {
        samples: AtomicUsize,
        available: bool,
    }

    impl MemoryProbe for CountingProbe {
        fn sample(&self) -> Option<MemoryUsage> {
            self.samples.fetch_add(1, Ordering::SeqCst);
            self.available.then_some(MemoryUsage {
                used_bytes: 64 * 1024 * 1024,
                total_bytes: 512 * 1024 * 1024,
            })
        }
    }

    #[tokio::test]
    async fn test_disabled_context_is_inert() {
        let ctx = InspectorContext::new(
            EnablementFlag::from_url_str("https://scores.example.com/"),
            InspectorConfig::default(),
        );

        let fetcher = ctx.wrap(json_fetcher());
        assert!(!fetcher.is_instrumented());
        fetcher.fetch(FetchRequest::new("/api/ping")).await.unwrap();

        assert!(!ctx.activate(Arc::new(NoAppState)));
        assert!(!ctx.start_perf(Some(Arc::new(ProcMemoryProbe))));
        assert!(ctx.status_panel().is_none());
        assert!(ctx.request_log().is_empty());

        let start = Instant::now();
        let timing = NavigationTiming { navigation_start: start, load_end: start };
        assert_eq!(ctx.log_load_time(&timing), None);
    }

    #[tokio::test]
    async fn test_enabled_context_records() {
        let ctx = enabled();
        let fetcher = ctx.wrap(json_fetcher());
        assert!(fetcher.is_instrumented());

        for _ in 0..3 {
            fetcher.fetch(FetchRequest::new("/api/standings")).await.unwrap();
        }
        assert_eq!(ctx.request_log().len(), 3);
    }

    #[tokio::test]
    async fn test_activate_is_idempotent() {
        let ctx = enabled();
        assert!(ctx.status_panel().is_none());
        assert!(ctx.activate(Arc::new(NoAppState)));
        assert!(!ctx.activate(Arc::new(NoAppState)));
        assert!(ctx.status_panel().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_refreshes_until_shutdown() {
        let ctx = enabled();
        let state = SharedAppState::new();
        ctx.activate(Arc::new(state.clone()));

        tokio::time::sleep(Duration::from_millis(10)).await;
        let panel = ctx.status_panel().unwrap().clone();
        assert_eq!(panel.summary().match_id, "N/A");

        state.update(|s| s.match_id = Some("m-88".to_string()));
        ctx.request_log().push(RequestLogEntry::new(
            "/api/match/88".to_string(),
            "GET".to_string(),
            200,
            5,
            serde_json::json!({}),
        ));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(panel.summary().match_id, "m-88");
        assert_eq!(panel.summary().request_count, 1);

        ctx.shutdown();
        assert!(ctx.is_shut_down());
        state.update(|s| s.match_id = Some("m-99".to_string()));
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(panel.summary().match_id, "m-88");
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_sampler_runs_when_available() {
        let ctx = enabled();
        let probe = Arc::new(CountingProbe {
            samples: AtomicUsize::new(0),
            available: true,
        });
        assert!(ctx.start_perf(Some(probe.clone())));

        // only the startup availability check so far
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(probe.samples.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(probe.samples.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(probe.samples.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_sampler_runs_without_panel() {
        let ctx = enabled();
        let probe = Arc::new(CountingProbe {
            samples: AtomicUsize::new(0),
            available: true,
        });
        assert!(ctx.start_perf(Some(probe.clone())));
        assert!(!ctx.start_perf(Some(probe.clone())));
        assert!(ctx.status_panel().is_none());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(probe.samples.load(Ordering::SeqCst), 3);
        assert!(ctx.status_panel().is_none());

        ctx.shutdown();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(probe.samples.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_sampler_skipped_when_unavailable() {
        let ctx = enabled();
        let probe = Arc::new(CountingProbe {
            samples: AtomicUsize::new(0),
            available: false,
        });
        assert!(!ctx.start_perf(Some(probe.clone())));

        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(probe.samples.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_time_logged_once_when_enabled() {
        let ctx = enabled();
        let start = Instant::now();
        let timing = NavigationTiming {
            navigation_start: start,
            load_end: start + Duration::from_millis(120),
        };

        assert_eq!(ctx.log_load_time(&timing), Some(Duration::from_millis(120)));
        assert_eq!(ctx.log_load_time(&timing), None);
    }
}
