// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use crate::sample::{RawSample, Variable, VariableValue};

/// Blended multi-model source, always tried first.
pub const BLENDED_SOURCE: &str = "sg";

/// Order in which provider values are preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePriority(Vec<String>);

impl SourcePriority {
    /// `["sg", preferred]`, without repeating `sg`.
    pub fn with_preferred(preferred: &str) -> Self {
        let mut order = vec![BLENDED_SOURCE.to_string()];
        let preferred = preferred.trim();
        if !preferred.is_empty() && preferred != BLENDED_SOURCE {
            order.push(preferred.to_string());
        }
        Self(order)
    }

    pub fn sources(&self) -> &[String] {
        &self.0
    }
}

impl Default for SourcePriority {
    fn default() -> Self {
        Self::with_preferred(BLENDED_SOURCE)
    }
}

impl<S: Into<String>> FromIterator<S> for SourcePriority {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Settles a single value for a variable.
///
/// A plain number is returned as is. For a provider map, the first priority
/// source holding a number wins, then the first number in map order.
/// Missing or non-numeric data gives `None`.
pub fn resolve(value: &VariableValue, priority: &SourcePriority) -> Option<f64> {
    match value {
        VariableValue::Numeric(v) => Some(*v),
        VariableValue::SourceMap(entries) => priority
            .sources()
            .iter()
            .find_map(|wanted| {
                entries
                    .iter()
                    .find(|(source, _)| source == wanted)
                    .and_then(|(_, v)| *v)
            })
            .or_else(|| entries.iter().find_map(|(_, v)| *v)),
    }
}

/// Extracts `variable` from one hourly sample.
pub fn extract(sample: &RawSample, variable: Variable, priority: &SourcePriority) -> Option<f64> {
    sample
        .value(variable)
        .and_then(|value| resolve(&value, priority))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(body: serde_json::Value) -> RawSample {
        RawSample::from_json(&body)
    }

    fn priority() -> SourcePriority {
        ["sg", "noaa"].into_iter().collect()
    }

    #[test]
    fn test_prefers_blended_source() {
        let s = sample(json!({"waveHeight": {"sg": 3.5, "noaa": 3.4}}));
        assert_eq!(extract(&s, Variable::WaveHeight, &priority()), Some(3.5));
    }

    #[test]
    fn test_falls_back_to_first_available() {
        let s = sample(json!({"waveHeight": {"noaa": 3.4}}));
        assert_eq!(extract(&s, Variable::WaveHeight, &priority()), Some(3.4));

        let s = sample(json!({"waveHeight": {"icon": 2.9, "meteo": 3.1}}));
        assert_eq!(extract(&s, Variable::WaveHeight, &priority()), Some(2.9));
    }

    #[test]
    fn test_skips_non_numeric_priority_values() {
        let s = sample(json!({
            "waveHeight": {"sg": null, "icon": "bad", "noaa": "3.0", "meteo": 1.0}
        }));
        assert_eq!(extract(&s, Variable::WaveHeight, &priority()), Some(3.0));

        let s = sample(json!({"waveHeight": {"sg": "x", "icon": 1.2}}));
        assert_eq!(extract(&s, Variable::WaveHeight, &priority()), Some(1.2));
    }

    #[test]
    fn test_preferred_source_beats_map_order() {
        let s = sample(json!({"swellHeight": {"icon": 1.0, "meteo": 2.0}}));
        let priority = SourcePriority::with_preferred("meteo");
        assert_eq!(extract(&s, Variable::SwellHeight, &priority), Some(2.0));
    }

    #[test]
    fn test_empty_and_missing() {
        let s = sample(json!({"waveHeight": {}, "swellHeight": {"sg": null}}));
        assert_eq!(extract(&s, Variable::WaveHeight, &priority()), None);
        assert_eq!(extract(&s, Variable::SwellHeight, &priority()), None);
        assert_eq!(extract(&s, Variable::CurrentSpeed, &priority()), None);
    }

    #[test]
    fn test_bare_number() {
        let s = sample(json!({"windSpeed": 5.0, "windDirection": "270"}));
        assert_eq!(extract(&s, Variable::WindSpeed, &priority()), Some(5.0));
        assert_eq!(extract(&s, Variable::WindDirection, &priority()), Some(270.0));
    }

    #[test]
    fn test_priority_construction() {
        assert_eq!(SourcePriority::default().sources(), ["sg"]);
        assert_eq!(SourcePriority::with_preferred("noaa").sources(), ["sg", "noaa"]);
        assert_eq!(SourcePriority::with_preferred("  ").sources(), ["sg"]);
    }
}
