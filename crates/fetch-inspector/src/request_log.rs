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

//! Bounded, append-only log of captured requests.
//!
//! The log keeps the most recently completed entries in completion order and
//! evicts the oldest entry as soon as an insertion exceeds the capacity.
//! Entries are never edited after they are pushed.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Default number of entries retained by a [`RequestLog`].
pub const DEFAULT_MAX_ENTRIES: usize = 20;

/// One successfully completed request with a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogEntry {
    /// Request URL exactly as passed to the fetcher.
    pub url: String,
    /// HTTP method (`GET` when the caller gave none).
    pub method: String,
    /// Response status code.
    pub status: u16,
    /// Wall time from issuing the call to receiving the response.
    pub elapsed_ms: u64,
    /// Parsed response body.
    pub body: Value,
    /// When the entry was captured.
    #[serde(serialize_with = "serialize_iso")]
    pub captured_at: DateTime<Utc>,
}

fn serialize_iso<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl RequestLogEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(url: String, method: String, status: u16, elapsed_ms: u64, body: Value) -> Self {
        Self {
            url,
            method,
            status,
            elapsed_ms,
            body,
            captured_at: Utc::now(),
        }
    }

    /// Capture time as an ISO-8601 string with millisecond precision.
    #[must_use]
    pub fn captured_at_iso(&self) -> String {
        self.captured_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Shared handle to the request log.
///
/// Cloning the handle is cheap; every clone observes the same entries.
#[derive(Debug, Clone)]
pub struct RequestLog {
    entries: Arc<RwLock<VecDeque<RequestLogEntry>>>,
    capacity: usize,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLog {
    /// Create a log holding at most [`DEFAULT_MAX_ENTRIES`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a log holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest ones beyond capacity.
    pub fn push(&self, entry: RequestLogEntry) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of all entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RequestLogEntry> {
        self.entries
            .read()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pretty-printed JSON array of all entries, oldest first.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(n: usize) -> RequestLogEntry {
        RequestLogEntry::new(format!("/api/{n}"), "GET".to_string(), 200, 1, json!({ "n": n }))
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let log = RequestLog::new();
        log.push(entry(1));
        log.push(entry(2));

        let urls: Vec<String> = log.snapshot().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/api/1", "/api/2"]);
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let log = RequestLog::new();
        for n in 1..=25 {
            log.push(entry(n));
            assert!(log.len() <= DEFAULT_MAX_ENTRIES);
        }

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 20);
        assert_eq!(snapshot[0].url, "/api/6");
        assert_eq!(snapshot[19].url, "/api/25");
    }

    #[test]
    fn test_clones_share_entries() {
        let log = RequestLog::with_capacity(3);
        let reader = log.clone();
        log.push(entry(1));
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.capacity(), 3);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let log = RequestLog::new();
        log.push(entry(7));

        let value: Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
        let first = &value[0];
        assert_eq!(first["elapsedMs"], json!(1));
        assert_eq!(first["body"], json!({ "n": 7 }));
        assert!(first["capturedAt"].as_str().unwrap().ends_with('Z'));
    }
}
