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

//! Application configuration management.
//!
//! Configuration is stored as TOML through confy. Command line flags can
//! override the page and API URLs for a single run without touching the file.

use std::time::Duration;

use fetch_inspector::gate::{DEBUG_QUERY_KEY, DEBUG_QUERY_VALUE};
use fetch_inspector::{InspectorConfig, DEFAULT_MAX_ENTRIES};
use log::info;
use reqwest::Url;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "matchday-desktop";
const CONFIG_NAME: &str = "config";

/// Default page URL; loopback, so the inspector is on in development.
pub const DEFAULT_PAGE_URL: &str = "http://localhost:8080/";

/// Default API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Network inspector settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct InspectorSettings {
    /// Status panel refresh period in seconds
    #[serde(default = "default_panel_refresh_secs")]
    pub panel_refresh_secs: u64,

    /// Memory sampling period in seconds
    #[serde(default = "default_memory_sample_secs")]
    pub memory_sample_secs: u64,

    /// Number of captured requests kept in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_panel_refresh_secs() -> u64 {
    2
}

fn default_memory_sample_secs() -> u64 {
    30
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            panel_refresh_secs: default_panel_refresh_secs(),
            memory_sample_secs: default_memory_sample_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl InspectorSettings {
    pub fn to_inspector_config(&self) -> InspectorConfig {
        InspectorConfig {
            max_entries: self.max_entries,
            panel_refresh: Duration::from_secs(self.panel_refresh_secs.max(1)),
            memory_sample: Duration::from_secs(self.memory_sample_secs.max(1)),
        }
    }
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// URL the client identifies as its page (drives the inspector gate)
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// Base URL for API calls
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Show the debug status panel when the inspector is enabled
    #[serde(default = "default_true")]
    pub show_debug_panel: bool,

    #[serde(default)]
    pub inspector: InspectorSettings,
}

fn default_config_version() -> u32 {
    1
}

fn default_page_url() -> String {
    DEFAULT_PAGE_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            page_url: default_page_url(),
            api_base_url: default_api_base_url(),
            show_debug_panel: true,
            inspector: InspectorSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        let config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        if let Ok(path) = Self::get_config_path() {
            info!("Loaded configuration from {}", path.display());
        }
        Ok(config)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Apply command line overrides for this run.
    ///
    /// `debug` appends the inspector's query marker to the page URL. A page
    /// URL that does not parse is left untouched.
    pub fn apply_overrides(&mut self, page_url: Option<String>, api_base_url: Option<String>, debug: bool) {
        if let Some(page_url) = page_url {
            self.page_url = page_url;
        }
        if let Some(api_base_url) = api_base_url {
            self.api_base_url = api_base_url;
        }
        if debug {
            if let Ok(mut url) = Url::parse(&self.page_url) {
                let has_marker = url
                    .query_pairs()
                    .any(|(k, v)| k == DEBUG_QUERY_KEY && v == DEBUG_QUERY_VALUE);
                if !has_marker {
                    url.query_pairs_mut().append_pair(DEBUG_QUERY_KEY, DEBUG_QUERY_VALUE);
                }
                self.page_url = url.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_inspector() {
        let config = AppConfig::default().inspector.to_inspector_config();
        assert_eq!(config.max_entries, 20);
        assert_eq!(config.panel_refresh, Duration::from_secs(2));
        assert_eq!(config.memory_sample, Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("page_url = \"https://scores.example.com/\"\n").unwrap();
        assert_eq!(config.page_url, "https://scores.example.com/");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.show_debug_panel);
        assert_eq!(config.inspector, InspectorSettings::default());
    }

    #[test]
    fn test_debug_override_appends_marker_once() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("https://scores.example.com/match?id=7".to_string()), None, true);
        assert_eq!(config.page_url, "https://scores.example.com/match?id=7&debug=true");

        config.apply_overrides(None, None, true);
        assert_eq!(config.page_url, "https://scores.example.com/match?id=7&debug=true");
    }

    #[test]
    fn test_overrides_replace_urls() {
        let mut config = AppConfig::default();
        config.apply_overrides(None, Some("https://api.example.com".to_string()), false);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
    }
}
