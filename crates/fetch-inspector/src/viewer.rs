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

//! Log viewer modal model.
//!
//! The viewer copies the request log when opened and does not follow later
//! insertions. Payload visibility is tracked per entry position and thrown
//! away on close.

use crate::request_log::{RequestLog, RequestLogEntry};

/// Message shown when the log has no entries.
pub const EMPTY_MESSAGE: &str = "No requests recorded";

/// Status code rendered with success styling.
pub const SUCCESS_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStyle {
    Success,
    Error,
}

impl EntryStyle {
    #[must_use]
    pub fn for_status(status: u16) -> Self {
        if status == SUCCESS_STATUS {
            Self::Success
        } else {
            Self::Error
        }
    }
}

/// One rendered entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBlock<'a> {
    pub index: usize,
    pub method: &'a str,
    pub url: &'a str,
    pub status: u16,
    pub elapsed_ms: u64,
    pub style: EntryStyle,
    /// Pretty-printed payload, present only while expanded.
    pub payload: Option<String>,
}

/// What the modal shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerContent<'a> {
    Closed,
    Empty(&'static str),
    Entries(Vec<EntryBlock<'a>>),
}

#[derive(Debug, Default)]
pub struct LogViewer {
    open: bool,
    entries: Vec<RequestLogEntry>,
    expanded: Vec<bool>,
}

impl LogViewer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the modal on a copy of `log`, all payloads collapsed.
    pub fn open(&mut self, log: &RequestLog) {
        self.entries = log.snapshot();
        self.expanded = vec![false; self.entries.len()];
        self.open = true;
    }

    /// Close the modal and discard its state.
    pub fn close(&mut self) {
        self.open = false;
        self.entries.clear();
        self.expanded.clear();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip payload visibility of entry `index`. Returns the new state, or
    /// `None` when no such entry exists.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.expanded.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Render the current modal content, oldest entry first.
    #[must_use]
    pub fn content(&self) -> ViewerContent<'_> {
        if !self.open {
            return ViewerContent::Closed;
        }
        if self.entries.is_empty() {
            return ViewerContent::Empty(EMPTY_MESSAGE);
        }

        let blocks = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| EntryBlock {
                index,
                method: &entry.method,
                url: &entry.url,
                status: entry.status,
                elapsed_ms: entry.elapsed_ms,
                style: EntryStyle::for_status(entry.status),
                payload: self
                    .is_expanded(index)
                    .then(|| serde_json::to_string_pretty(&entry.body).unwrap_or_default()),
            })
            .collect();

        ViewerContent::Entries(blocks)
    }

    /// Entries captured at open time as a pretty JSON array.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
