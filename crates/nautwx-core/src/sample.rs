// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

//! Model of the hourly records returned by the point-query API.
//!
//! Each variable in a record is either a plain number (single-source
//! responses) or an object keyed by provider name, e.g.
//! `{"noaa": 3.4, "sg": 3.5}`. Anything else is treated as missing.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Variables requested for every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    WindSpeed,
    WindDirection,
    WaveHeight,
    WaveDirection,
    SwellHeight,
    SwellDirection,
    WindWaveHeight,
    WindWaveDirection,
    CurrentSpeed,
    CurrentDirection,
    WaterTemperature,
}

impl Variable {
    pub const ALL: [Variable; 11] = [
        Variable::WindSpeed,
        Variable::WindDirection,
        Variable::WaveHeight,
        Variable::WaveDirection,
        Variable::SwellHeight,
        Variable::SwellDirection,
        Variable::WindWaveHeight,
        Variable::WindWaveDirection,
        Variable::CurrentSpeed,
        Variable::CurrentDirection,
        Variable::WaterTemperature,
    ];

    /// Field name used by the API, both in `params` and in the response.
    pub fn api_name(self) -> &'static str {
        match self {
            Variable::WindSpeed => "windSpeed",
            Variable::WindDirection => "windDirection",
            Variable::WaveHeight => "waveHeight",
            Variable::WaveDirection => "waveDirection",
            Variable::SwellHeight => "swellHeight",
            Variable::SwellDirection => "swellDirection",
            Variable::WindWaveHeight => "windWaveHeight",
            Variable::WindWaveDirection => "windWaveDirection",
            Variable::CurrentSpeed => "currentSpeed",
            Variable::CurrentDirection => "currentDirection",
            Variable::WaterTemperature => "waterTemperature",
        }
    }

    pub fn is_speed(self) -> bool {
        matches!(self, Variable::WindSpeed | Variable::CurrentSpeed)
    }

    /// Comma-separated list for the request's `params` field.
    pub fn params_list() -> String {
        Self::ALL
            .iter()
            .map(|v| v.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A variable's value as it appears in one hourly record.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Numeric(f64),
    /// Provider name to value, in the order the providers appear in the body.
    SourceMap(Vec<(String, Option<f64>)>),
}

impl VariableValue {
    /// Classifies a JSON field. Returns `None` for shapes that carry no value.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(VariableValue::SourceMap(
                map.iter()
                    .map(|(source, v)| (source.clone(), numeric(v)))
                    .collect(),
            )),
            other => numeric(other).map(VariableValue::Numeric),
        }
    }
}

/// Reads a finite number from a JSON number or a numeric string.
pub fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// One hourly entry of a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSample {
    /// `None` when the record has no usable `time` field.
    pub time: Option<DateTime<Utc>>,
    pub fields: Map<String, Value>,
}

impl RawSample {
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let time = obj
            .get("time")
            .and_then(Value::as_str)
            .and_then(crate::time::parse_instant);
        let fields = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "time")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { time, fields }
    }

    pub fn value(&self, variable: Variable) -> Option<VariableValue> {
        self.fields
            .get(variable.api_name())
            .and_then(VariableValue::from_json)
    }
}

/// Hourly samples from a response body.
///
/// Reads the `hours` array, falling back to the legacy `data` array when
/// `hours` is missing or empty. Bodies of any other shape give no samples.
pub fn samples_from_body(body: &Value) -> Vec<RawSample> {
    let array = |key: &str| {
        body.get(key)
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
    };
    array("hours")
        .or_else(|| array("data"))
        .map(|entries| entries.iter().map(RawSample::from_json).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_list_covers_all_variables() {
        let params = Variable::params_list();
        assert_eq!(params.split(',').count(), Variable::ALL.len());
        assert!(params.starts_with("windSpeed,windDirection,"));
        assert!(params.ends_with(",waterTemperature"));
    }

    #[test]
    fn test_variable_value_shapes() {
        assert_eq!(
            VariableValue::from_json(&json!(5.0)),
            Some(VariableValue::Numeric(5.0))
        );
        assert_eq!(
            VariableValue::from_json(&json!("2.5")),
            Some(VariableValue::Numeric(2.5))
        );
        assert_eq!(VariableValue::from_json(&json!(null)), None);
        assert_eq!(VariableValue::from_json(&json!("n/a")), None);
        assert_eq!(VariableValue::from_json(&json!([1.0])), None);
    }

    #[test]
    fn test_source_map_keeps_body_order() {
        let value: Value =
            serde_json::from_str(r#"{"noaa": 3.4, "icon": "x", "meteo": 3.1}"#).unwrap();
        let Some(VariableValue::SourceMap(entries)) = VariableValue::from_json(&value) else {
            panic!("expected a source map");
        };
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["noaa", "icon", "meteo"]);
        assert_eq!(entries[1].1, None);
    }

    #[test]
    fn test_raw_sample_time() {
        let sample = RawSample::from_json(&json!({
            "time": "2025-09-20T06:00:00+00:00",
            "windSpeed": {"sg": 5.0}
        }));
        assert!(sample.time.is_some());
        assert!(!sample.fields.contains_key("time"));
        assert!(sample.value(Variable::WindSpeed).is_some());
        assert!(sample.value(Variable::SwellHeight).is_none());

        let untimed = RawSample::from_json(&json!({"time": 12, "windSpeed": 1.0}));
        assert_eq!(untimed.time, None);

        assert_eq!(RawSample::from_json(&json!("junk")), RawSample::default());
    }

    #[test]
    fn test_samples_from_body_falls_back_to_data() {
        let hours = json!({"hours": [{"time": "2025-09-20T06:00:00Z"}]});
        assert_eq!(samples_from_body(&hours).len(), 1);

        let legacy = json!({"hours": [], "data": [{}, {}]});
        assert_eq!(samples_from_body(&legacy).len(), 2);

        assert!(samples_from_body(&json!({})).is_empty());
        assert!(samples_from_body(&json!([1, 2])).is_empty());
    }
}
