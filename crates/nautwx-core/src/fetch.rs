// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use crate::client::PointSource;
use crate::config::FetchConfig;
use crate::extract::{extract, SourcePriority};
use crate::input::NormalizedTable;
use crate::sample::{samples_from_body, Variable};
use crate::selector::pick_nearest;
use crate::time::{to_iso, TimeWindow};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

/// One output row: values resolved for a single request point.
///
/// Speeds are always in knots. Directions are degrees, wind and waves
/// "coming from", current "heading to". When `error` is set the fetch failed
/// and every value is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedRecord {
    pub requested_iso: String,
    /// Time of the hourly sample the values came from.
    pub iso_time: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "windSpeed_kt")]
    pub wind_speed_kt: Option<f64>,
    #[serde(rename = "windDir_deg_from")]
    pub wind_dir_deg_from: Option<f64>,
    #[serde(rename = "sigWaveHeight_m")]
    pub sig_wave_height_m: Option<f64>,
    #[serde(rename = "sigWaveDir_deg_from")]
    pub sig_wave_dir_deg_from: Option<f64>,
    #[serde(rename = "windWaveHeight_m")]
    pub wind_wave_height_m: Option<f64>,
    #[serde(rename = "windWaveDir_deg_from")]
    pub wind_wave_dir_deg_from: Option<f64>,
    #[serde(rename = "swellHeight_m")]
    pub swell_height_m: Option<f64>,
    #[serde(rename = "swellDir_deg_from")]
    pub swell_dir_deg_from: Option<f64>,
    #[serde(rename = "currentSpeed_kt")]
    pub current_speed_kt: Option<f64>,
    #[serde(rename = "currentDir_deg_to")]
    pub current_dir_deg_to: Option<f64>,
    #[serde(rename = "waterTemperature_c")]
    pub water_temperature_c: Option<f64>,
    pub error: Option<String>,
}

impl ResolvedRecord {
    fn blank(lat: f64, lon: f64, requested: &DateTime<Utc>) -> Self {
        Self {
            requested_iso: to_iso(requested),
            lat,
            lon,
            ..Self::default()
        }
    }

    /// Record for a point whose fetch failed.
    pub fn failed(lat: f64, lon: f64, requested: &DateTime<Utc>, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::blank(lat, lon, requested)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn set(&mut self, variable: Variable, value: Option<f64>) {
        let slot = match variable {
            Variable::WindSpeed => &mut self.wind_speed_kt,
            Variable::WindDirection => &mut self.wind_dir_deg_from,
            Variable::WaveHeight => &mut self.sig_wave_height_m,
            Variable::WaveDirection => &mut self.sig_wave_dir_deg_from,
            Variable::SwellHeight => &mut self.swell_height_m,
            Variable::SwellDirection => &mut self.swell_dir_deg_from,
            Variable::WindWaveHeight => &mut self.wind_wave_height_m,
            Variable::WindWaveDirection => &mut self.wind_wave_dir_deg_from,
            Variable::CurrentSpeed => &mut self.current_speed_kt,
            Variable::CurrentDirection => &mut self.current_dir_deg_to,
            Variable::WaterTemperature => &mut self.water_temperature_c,
        };
        *slot = value;
    }
}

/// Turns request points into resolved records, one upstream call per point.
pub struct MarineFetcher<S: PointSource> {
    source: S,
    priority: SourcePriority,
}

impl<S: PointSource> MarineFetcher<S> {
    pub fn new(source: S, config: &FetchConfig) -> Self {
        Self {
            source,
            priority: config.source_priority(),
        }
    }

    /// Fetches and resolves a single point. Never fails: transport and
    /// decoding problems land in the record's `error` field.
    pub fn fetch_and_resolve(
        &self,
        lat: f64,
        lon: f64,
        requested: DateTime<Utc>,
    ) -> ResolvedRecord {
        let window = TimeWindow::around(requested);
        let body = match self.source.fetch(lat, lon, &window) {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "Point fetch failed — lat={} lon={} requested={} error={}",
                    lat,
                    lon,
                    to_iso(&requested),
                    e
                );
                return ResolvedRecord::failed(lat, lon, &requested, e);
            }
        };

        let mut record = ResolvedRecord::blank(lat, lon, &requested);
        let samples = samples_from_body(&body);
        let nearest = pick_nearest(&samples, Some(requested), |s| s.time);
        let Some(sample) = samples.get(nearest) else {
            debug!("No samples returned — lat={} lon={}", lat, lon);
            return record;
        };

        record.iso_time = sample.time.as_ref().map(to_iso);
        let units = self.source.units();
        for variable in Variable::ALL {
            let value = extract(sample, variable, &self.priority);
            let value = match variable {
                Variable::WindSpeed => units.wind.knots(value),
                Variable::CurrentSpeed => units.current.knots(value),
                _ => value,
            };
            record.set(variable, value);
        }
        debug!(
            "Resolved point — lat={} lon={} sample={:?} candidates={}",
            lat,
            lon,
            record.iso_time,
            samples.len()
        );
        record
    }

    /// Resolves every row of a normalized table, in order.
    pub fn enrich(&self, table: &NormalizedTable) -> Vec<ResolvedRecord> {
        let total = table.rows.len();
        let records: Vec<ResolvedRecord> = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                debug!("Fetching point {}/{}", i + 1, total);
                self.fetch_and_resolve(row.point.lat, row.point.lon, row.parsed_ts())
            })
            .collect();
        let failed = records.iter().filter(|r| r.is_error()).count();
        info!("Batch complete — points={} failed={}", total, failed);
        records
    }
}
