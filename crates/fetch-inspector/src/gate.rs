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

//! Enablement gate for the inspector.

use reqwest::Url;

/// Canonical loopback host name.
pub const LOOPBACK_HOST: &str = "localhost";
/// Numeric loopback address.
pub const LOOPBACK_ADDR: &str = "127.0.0.1";
/// Query parameter that turns the inspector on for any host.
pub const DEBUG_QUERY_KEY: &str = "debug";
pub const DEBUG_QUERY_VALUE: &str = "true";

/// Whether the inspector should run for a page served from `url`.
#[must_use]
pub fn is_enabled(url: &Url) -> bool {
    let loopback = matches!(url.host_str(), Some(LOOPBACK_HOST | LOOPBACK_ADDR));
    let marker = url
        .query_pairs()
        .any(|(key, value)| key == DEBUG_QUERY_KEY && value == DEBUG_QUERY_VALUE);

    loopback || marker
}

/// Enablement decision, computed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnablementFlag(bool);

impl EnablementFlag {
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self(is_enabled(url))
    }

    /// Parse `page_url` and evaluate the gate. Unparseable URLs stay disabled.
    #[must_use]
    pub fn from_url_str(page_url: &str) -> Self {
        Url::parse(page_url).map_or(Self(false), |url| Self::from_url(&url))
    }

    #[must_use]
    pub const fn forced(enabled: bool) -> Self {
        Self(enabled)
    }

    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_hosts_enable() {
        assert!(EnablementFlag::from_url_str("http://localhost:8080/match/12").is_enabled());
        assert!(EnablementFlag::from_url_str("http://127.0.0.1/").is_enabled());
    }

    #[test]
    fn test_query_marker_enables_remote_host() {
        assert!(EnablementFlag::from_url_str("https://scores.example.com/?tab=live&debug=true").is_enabled());
        assert!(!EnablementFlag::from_url_str("https://scores.example.com/?debug=false").is_enabled());
        assert!(!EnablementFlag::from_url_str("https://scores.example.com/?verbose=true").is_enabled());
    }

    #[test]
    fn test_remote_host_without_marker_disabled() {
        assert!(!EnablementFlag::from_url_str("https://scores.example.com/standings").is_enabled());
    }

    #[test]
    fn test_unparseable_url_disabled() {
        assert!(!EnablementFlag::from_url_str("not a url").is_enabled());
    }
}
