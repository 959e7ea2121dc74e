// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use crate::time::parse_instant;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "lat", "lon"];

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded table, cells kept as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InputTable {
    pub fn new<H: Into<String>>(headers: impl IntoIterator<Item = H>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<C: Into<String>>(&mut self, cells: impl IntoIterator<Item = C>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

/// Reads a CSV upload. The first record is the header row.
pub fn load_csv_file<P: AsRef<Path>>(path: P) -> Result<InputTable, InputError> {
    let file = File::open(path)?;
    load_csv(file)
}

pub fn load_csv<R: Read>(reader: R) -> Result<InputTable, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(InputTable { headers, rows })
}

/// A validated request point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestPoint {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
}

impl RequestPoint {
    /// Builds a point, rejecting coordinates outside [-90, 90] / [-180, 180].
    pub fn new(timestamp: DateTime<Utc>, lat: f64, lon: f64) -> Option<Self> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
        (lat_ok && lon_ok).then_some(Self { timestamp, lat, lon })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// Timestamp cell as written in the upload.
    pub timestamp: String,
    pub point: RequestPoint,
    /// Every original cell, in upload column order.
    pub cells: Vec<String>,
}

impl NormalizedRow {
    pub fn parsed_ts(&self) -> DateTime<Utc> {
        self.point.timestamp
    }
}

/// A row left out of the normalized table, with why.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based position among the data rows.
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// Original headers, with the three matched columns renamed to
    /// `timestamp`, `lat` and `lon`. Unmatched columns with one of those
    /// names become `timestamp.1`, `timestamp.2` and so on.
    pub headers: Vec<String>,
    pub rows: Vec<NormalizedRow>,
    pub rejected: Vec<RejectedRow>,
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the column for `needed`: an exact match after trimming and
/// lowercasing first, then a match that also ignores inner whitespace.
fn find_column(headers: &[String], needed: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().to_lowercase() == needed)
        .or_else(|| headers.iter().position(|h| squash(h) == needed))
}

/// Standardizes an upload to `timestamp`/`lat`/`lon` plus a parsed UTC instant.
///
/// Column names match case- and whitespace-insensitively. A missing column
/// fails the whole table; a row whose timestamp or coordinates don't parse is
/// only dropped and listed in [`NormalizedTable::rejected`].
pub fn normalize(table: &InputTable) -> Result<NormalizedTable, InputError> {
    let mut idx = [0usize; 3];
    for (slot, needed) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = find_column(&table.headers, needed)
            .ok_or_else(|| InputError::MissingColumn(needed.to_string()))?;
    }
    let [idx_ts, idx_lat, idx_lon] = idx;

    let mut headers = table.headers.clone();
    for (i, name) in idx.iter().zip(REQUIRED_COLUMNS) {
        headers[*i] = name.to_string();
    }
    // Other columns spelling a required name get a numbered suffix.
    let mut seen = [1usize; 3];
    for (i, header) in headers.iter_mut().enumerate() {
        if idx.contains(&i) {
            continue;
        }
        let key = squash(header);
        if let Some(k) = REQUIRED_COLUMNS.iter().position(|name| *name == key) {
            *header = format!("{}.{}", REQUIRED_COLUMNS[k], seen[k]);
            seen[k] += 1;
        }
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut rejected = Vec::new();
    for (n, cells) in table.rows.iter().enumerate() {
        let cell = |i: usize| cells.get(i).map(|s| s.trim()).unwrap_or("");
        let raw_ts = cell(idx_ts);

        let outcome = match parse_instant(raw_ts) {
            None => Err(format!("unparseable timestamp '{}'", raw_ts)),
            Some(ts) => match (
                cell(idx_lat).parse::<f64>(),
                cell(idx_lon).parse::<f64>(),
            ) {
                (Ok(lat), Ok(lon)) => RequestPoint::new(ts, lat, lon)
                    .ok_or_else(|| format!("coordinates out of range ({}, {})", lat, lon)),
                _ => Err(format!(
                    "unparseable coordinates ('{}', '{}')",
                    cell(idx_lat),
                    cell(idx_lon)
                )),
            },
        };

        match outcome {
            Ok(point) => rows.push(NormalizedRow {
                timestamp: raw_ts.to_string(),
                point,
                cells: cells.clone(),
            }),
            Err(reason) => {
                warn!("Dropping input row {} — {}", n + 1, reason);
                rejected.push(RejectedRow { row: n + 1, reason });
            }
        }
    }

    debug!(
        "Normalized input — kept={} rejected={}",
        rows.len(),
        rejected.len()
    );
    Ok(NormalizedTable {
        headers,
        rows,
        rejected,
    })
}
