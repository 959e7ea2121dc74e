// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use crate::config::FetchConfig;
use crate::sample::Variable;
use crate::time::{to_iso, TimeWindow};
use crate::units::SpeedUnit;
use log::{debug, info};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const ERROR_BODY_LIMIT: usize = 200;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    Url(String),
}

/// Units the upstream reports speeds in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpstreamUnits {
    pub wind: SpeedUnit,
    pub current: SpeedUnit,
}

/// Anything able to answer a point query with a raw JSON body.
pub trait PointSource {
    fn fetch(&self, lat: f64, lon: f64, window: &TimeWindow) -> Result<Value, FetchError>;

    fn units(&self) -> UpstreamUnits {
        UpstreamUnits::default()
    }
}

impl<S: PointSource + ?Sized> PointSource for &S {
    fn fetch(&self, lat: f64, lon: f64, window: &TimeWindow) -> Result<Value, FetchError> {
        (**self).fetch(lat, lon, window)
    }

    fn units(&self) -> UpstreamUnits {
        (**self).units()
    }
}

/// Blocking client for the Stormglass weather point endpoint.
///
/// Stormglass reports wind and current speeds in m/s.
pub struct StormglassClient {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl StormglassClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Request URL for a point and window. The credential travels in a header,
    /// so the URL is safe to log.
    pub fn request_url(
        &self,
        lat: f64,
        lon: f64,
        window: &TimeWindow,
    ) -> Result<reqwest::Url, FetchError> {
        let params = [
            ("lat", lat.to_string()),
            ("lng", lon.to_string()),
            ("params", Variable::params_list()),
            ("start", to_iso(&window.start)),
            ("end", to_iso(&window.end)),
        ];
        reqwest::Url::parse_with_params(&self.config.base_url, &params)
            .map_err(|e| FetchError::Url(e.to_string()))
    }
}

impl PointSource for StormglassClient {
    fn fetch(&self, lat: f64, lon: f64, window: &TimeWindow) -> Result<Value, FetchError> {
        let url = self.request_url(lat, lon, window)?;
        if self.config.debug {
            info!("GET {}", url);
        } else {
            debug!(
                "Fetching point — lat={} lon={} start={}",
                lat,
                lon,
                to_iso(&window.start)
            );
        }

        let mut request = self.client.get(url);
        match &self.config.api_key {
            Some(key) => request = request.header(reqwest::header::AUTHORIZATION, key),
            None => debug!("No API key configured; sending unauthenticated request"),
        }

        let response = request.send().map_err(|e| self.classify(e))?;
        let status = response.status();
        let text = response.text().map_err(|e| self.classify(e))?;
        debug!(
            "Received point data — status={} bytes={}",
            status,
            text.len()
        );
        decode(status, &text)
    }

    fn units(&self) -> UpstreamUnits {
        UpstreamUnits {
            wind: SpeedUnit::MetersPerSecond,
            current: SpeedUnit::MetersPerSecond,
        }
    }
}

/// Turns a response status and body into JSON, keeping at most
/// `ERROR_BODY_LIMIT` characters of the body on a non-success status.
fn decode(status: StatusCode, text: &str) -> Result<Value, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: text.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }
    Ok(serde_json::from_str(text)?)
}

impl StormglassClient {
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else {
            FetchError::Request(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::around(Utc.with_ymd_and_hms(2025, 9, 20, 6, 30, 0).unwrap())
    }

    #[test]
    fn test_request_url() {
        let config = FetchConfig::default().with_api_key(Some("secret".into()));
        let client = StormglassClient::new(config).unwrap();
        let url = client.request_url(40.0, -40.5, &window()).unwrap();

        assert_eq!(url.host_str(), Some("api.stormglass.io"));
        assert_eq!(url.path(), "/v2/weather/point");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("lat".into(), "40".into())));
        assert!(pairs.contains(&("lng".into(), "-40.5".into())));
        assert!(pairs.contains(&("start".into(), "2025-09-20T05:00:00+00:00".into())));
        assert!(pairs.contains(&("end".into(), "2025-09-20T07:00:00+00:00".into())));
        assert!(pairs.contains(&("params".into(), Variable::params_list())));
        assert!(!url.as_str().contains("secret"));
    }

    #[test]
    fn test_bad_base_url() {
        let config = FetchConfig {
            base_url: "not a url".into(),
            ..FetchConfig::default()
        };
        let client = StormglassClient::new(config).unwrap();
        assert!(matches!(
            client.request_url(0.0, 0.0, &window()),
            Err(FetchError::Url(_))
        ));
    }

    #[test]
    fn test_decode_error_status_truncates_body() {
        let body = "x".repeat(500);
        match decode(StatusCode::PAYMENT_REQUIRED, &body) {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status, 402);
                assert_eq!(body.len(), ERROR_BODY_LIMIT);
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_status_ignores_valid_json() {
        let body = r#"{"hours": []}"#;
        let err = decode(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
        assert!(err.to_string().starts_with("malformed response body"));
    }

    #[test]
    fn test_decode_valid_body() {
        let body = r#"{"hours": [{"time": "2025-09-20T06:00Z", "windSpeed": {"sg": 5.0}}]}"#;
        let value = decode(StatusCode::OK, body).unwrap();
        assert_eq!(value["hours"][0]["windSpeed"]["sg"], 5.0);
    }

    #[test]
    fn test_stormglass_units() {
        let client = StormglassClient::new(FetchConfig::default()).unwrap();
        let units = client.units();
        assert_eq!(units.wind, SpeedUnit::MetersPerSecond);
        assert_eq!(units.current, SpeedUnit::MetersPerSecond);
    }
}
