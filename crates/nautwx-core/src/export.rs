// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use crate::fetch::ResolvedRecord;
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes records as comma-delimited UTF-8 CSV with a header row.
pub fn write_csv<W: Write>(records: &[ResolvedRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_csv<P: AsRef<Path>>(path: P, records: &[ResolvedRecord]) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
    write_csv(records, file)
}

/// Marker color bands for wind speed in knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindBand {
    /// Below 16 kt
    Light,
    /// 16 to 24 kt inclusive
    Fresh,
    /// Above 24 kt
    Strong,
    Unknown,
}

impl WindBand {
    pub fn classify(wind_kt: Option<f64>) -> Self {
        match wind_kt {
            Some(kt) if kt.is_nan() => WindBand::Unknown,
            Some(kt) if kt < 16.0 => WindBand::Light,
            Some(kt) if kt <= 24.0 => WindBand::Fresh,
            Some(_) => WindBand::Strong,
            None => WindBand::Unknown,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            WindBand::Light => "green",
            WindBand::Fresh => "orange",
            WindBand::Strong => "red",
            WindBand::Unknown => "gray",
        }
    }
}

fn fmt_value(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_default()
}

/// Short human-readable summary used as the map popup.
pub fn describe(record: &ResolvedRecord) -> String {
    if let Some(err) = &record.error {
        return format!(
            "Time (UTC): {}\nLat/Lon: {:.4}, {:.4}\nError: {}",
            record.requested_iso,
            record.lat,
            record.lon,
            err
        );
    }
    let height_line = |label: &str, h: Option<f64>, d: Option<f64>| {
        format!(
            "{}: {} m @ {}° (from)",
            label,
            fmt_value(h, 1),
            fmt_value(d, 0)
        )
    };
    [
        format!(
            "Time (UTC): {}",
            record.iso_time.as_deref().unwrap_or(&record.requested_iso)
        ),
        format!("Lat/Lon: {:.4}, {:.4}", record.lat, record.lon),
        format!(
            "Wind: {} kt @ {}° (from)",
            fmt_value(record.wind_speed_kt, 1),
            fmt_value(record.wind_dir_deg_from, 0)
        ),
        height_line(
            "Significant wave (Hs)",
            record.sig_wave_height_m,
            record.sig_wave_dir_deg_from,
        ),
        height_line(
            "Wind wave",
            record.wind_wave_height_m,
            record.wind_wave_dir_deg_from,
        ),
        height_line("Swell", record.swell_height_m, record.swell_dir_deg_from),
        format!(
            "Current: {} kt @ {}° (to)",
            fmt_value(record.current_speed_kt, 1),
            fmt_value(record.current_dir_deg_to, 0)
        ),
    ]
    .join("\n")
}

/// GeoJSON FeatureCollection with one colored point per record.
pub fn to_geojson(records: &[ResolvedRecord]) -> Result<Value> {
    let mut features = Vec::with_capacity(records.len());
    for record in records {
        let mut properties = match serde_json::to_value(record)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let band = WindBand::classify(record.wind_speed_kt);
        properties.insert("marker-color".into(), json!(band.color()));
        properties.insert("description".into(), json!(describe(record)));
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [record.lon, record.lat],
            },
            "properties": properties,
        }));
    }
    Ok(json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

pub fn save_geojson<P: AsRef<Path>>(path: P, records: &[ResolvedRecord]) -> Result<()> {
    let content = serde_json::to_string_pretty(&to_geojson(records)?)?;
    std::fs::write(path.as_ref(), content)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
    Ok(())
}
