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

//! Read-only view of the host application's state, as shown by the status panel.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Placeholder rendered for any field the application has not provided.
pub const PLACEHOLDER: &str = "N/A";

/// Application state fields the status panel displays.
///
/// Every field is optional; `None` renders as [`PLACEHOLDER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStateSnapshot {
    /// Identifier of the match currently shown.
    pub match_id: Option<String>,
    /// Name of the active tab (standings, match, video, ...).
    pub active_tab: Option<String>,
    /// A data load is in flight.
    pub is_loading: Option<bool>,
    /// The current match is live.
    pub is_live: Option<bool>,
    /// Match data has been received.
    pub has_data: Option<bool>,
}

/// Provider of the optional application state snapshot.
pub trait AppStateSource: Send + Sync {
    /// Current snapshot, or `None` when the application exposes no state.
    fn snapshot(&self) -> Option<AppStateSnapshot>;
}

/// Source for applications that expose no state at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAppState;

impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Option<AppStateSnapshot> {
        None
    }
}

/// Shared, application-owned state cell.
///
/// The application writes through [`SharedAppState::update`]; the inspector
/// only reads copies.
#[derive(Debug, Clone, Default)]
pub struct SharedAppState {
    inner: Arc<RwLock<Option<AppStateSnapshot>>>,
}

impl SharedAppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot.
    pub fn set(&self, snapshot: AppStateSnapshot) {
        if let Ok(mut state) = self.inner.write() {
            *state = Some(snapshot);
        }
    }

    /// Drop the snapshot; the panel falls back to placeholders.
    pub fn clear(&self) {
        if let Ok(mut state) = self.inner.write() {
            *state = None;
        }
    }

    /// Modify the snapshot in place, creating an empty one first if needed.
    pub fn update(&self, f: impl FnOnce(&mut AppStateSnapshot)) {
        if let Ok(mut state) = self.inner.write() {
            f(state.get_or_insert_with(AppStateSnapshot::default));
        }
    }
}

impl AppStateSource for SharedAppState {
    fn snapshot(&self) -> Option<AppStateSnapshot> {
        self.inner.read().ok().and_then(|state| state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_starts_absent() {
        let state = SharedAppState::new();
        assert!(state.snapshot().is_none());
        assert!(NoAppState.snapshot().is_none());
    }

    #[test]
    fn test_update_creates_and_modifies() {
        let state = SharedAppState::new();
        state.update(|s| s.match_id = Some("m-1042".to_string()));
        state.update(|s| s.is_live = Some(true));

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.match_id.as_deref(), Some("m-1042"));
        assert_eq!(snapshot.is_live, Some(true));
        assert_eq!(snapshot.active_tab, None);

        state.clear();
        assert!(state.snapshot().is_none());
    }
}
