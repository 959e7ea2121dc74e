// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use crate::extract::{SourcePriority, BLENDED_SOURCE};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.stormglass.io/v2/weather/point";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Settings for talking to the point-query API.
///
/// Built once by the caller and handed to the client and fetcher; nothing in
/// this crate reads the process environment.
#[derive(Clone)]
pub struct FetchConfig {
    pub api_key: Option<String>,
    pub preferred_source: String,
    pub timeout: Duration,
    /// Log each request URL (without the credential) at info level.
    pub debug: bool,
    pub base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            preferred_source: BLENDED_SOURCE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debug: false,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    pub fn with_preferred_source(mut self, source: &str) -> Self {
        let source = source.trim();
        self.preferred_source = if source.is_empty() {
            BLENDED_SOURCE.to_string()
        } else {
            source.to_string()
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn source_priority(&self) -> SourcePriority {
        SourcePriority::with_preferred(&self.preferred_source)
    }
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("preferred_source", &self.preferred_source)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.preferred_source, "sg");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.source_priority().sources(), ["sg"]);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = FetchConfig::default()
            .with_api_key(Some("   ".into()))
            .with_preferred_source("");
        assert_eq!(config.api_key, None);
        assert_eq!(config.preferred_source, "sg");
    }

    #[test]
    fn test_preferred_source_priority() {
        let config = FetchConfig::default().with_preferred_source("noaa");
        assert_eq!(config.source_priority().sources(), ["sg", "noaa"]);
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = FetchConfig::default()
            .with_api_key(Some("secret-key".into()));
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }
}
