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

//! Status panel model: activation state and the periodically refreshed summary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::snapshot::{AppStateSnapshot, PLACEHOLDER};

/// Text shown by the status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSummary {
    pub match_id: String,
    pub active_tab: String,
    pub loading: String,
    pub live: String,
    pub has_data: String,
    pub request_count: usize,
}

impl Default for PanelSummary {
    fn default() -> Self {
        Self::from_snapshot(None, 0)
    }
}

fn flag(value: Option<bool>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

impl PanelSummary {
    /// Build the summary from an optional snapshot and the current log length.
    #[must_use]
    pub fn from_snapshot(snapshot: Option<&AppStateSnapshot>, request_count: usize) -> Self {
        let text = |value: Option<&String>| value.map_or_else(|| PLACEHOLDER.to_string(), Clone::clone);

        Self {
            match_id: text(snapshot.and_then(|s| s.match_id.as_ref())),
            active_tab: text(snapshot.and_then(|s| s.active_tab.as_ref())),
            loading: flag(snapshot.and_then(|s| s.is_loading)),
            live: flag(snapshot.and_then(|s| s.is_live)),
            has_data: flag(snapshot.and_then(|s| s.has_data)),
            request_count,
        }
    }

    /// Label/value rows in display order.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Match ID", self.match_id.clone()),
            ("Tab", self.active_tab.clone()),
            ("Loading", self.loading.clone()),
            ("Live", self.live.clone()),
            ("Has data", self.has_data.clone()),
            ("Requests", self.request_count.to_string()),
        ]
    }
}

struct PanelInner {
    active: AtomicBool,
    summary: RwLock<PanelSummary>,
}

/// Shared status panel handle.
///
/// The refresh task and the UI hold clones of the same panel.
#[derive(Clone)]
pub struct StatusPanel {
    inner: Arc<PanelInner>,
}

impl std::fmt::Debug for StatusPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPanel")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PanelInner {
                active: AtomicBool::new(false),
                summary: RwLock::new(PanelSummary::default()),
            }),
        }
    }

    /// Mark the panel as shown. Returns `true` only for the call that
    /// actually created it.
    pub fn activate(&self) -> bool {
        !self.inner.active.swap(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Re-render the summary.
    pub fn refresh(&self, snapshot: Option<&AppStateSnapshot>, request_count: usize) {
        let summary = PanelSummary::from_snapshot(snapshot, request_count);
        if let Ok(mut current) = self.inner.summary.write() {
            *current = summary;
        }
    }

    /// Last rendered summary.
    #[must_use]
    pub fn summary(&self) -> PanelSummary {
        self.inner
            .summary
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_is_idempotent() {
        let panel = StatusPanel::new();
        assert!(!panel.is_active());
        assert!(panel.activate());
        assert!(!panel.activate());
        assert!(panel.clone().is_active());
    }

    #[test]
    fn test_missing_state_renders_placeholders() {
        let summary = PanelSummary::from_snapshot(None, 3);
        assert_eq!(summary.match_id, "N/A");
        assert_eq!(summary.active_tab, "N/A");
        assert_eq!(summary.loading, "N/A");
        assert_eq!(summary.live, "N/A");
        assert_eq!(summary.has_data, "N/A");
        assert_eq!(summary.request_count, 3);
    }

    #[test]
    fn test_partial_snapshot() {
        let snapshot = AppStateSnapshot {
            match_id: Some("m-7".to_string()),
            is_live: Some(false),
            ..Default::default()
        };

        let panel = StatusPanel::new();
        panel.refresh(Some(&snapshot), 12);

        let rows = panel.summary().rows();
        assert_eq!(rows[0], ("Match ID", "m-7".to_string()));
        assert_eq!(rows[1], ("Tab", "N/A".to_string()));
        assert_eq!(rows[3], ("Live", "false".to_string()));
        assert_eq!(rows[5], ("Requests", "12".to_string()));
    }
}
