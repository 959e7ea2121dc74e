// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

//! Marine weather lookup for positions and timestamps.
//!
//! Request points come from a form or a CSV upload ([`input`]); each point is
//! sent to a [`client::PointSource`], the nearest hourly sample is picked
//! ([`selector`]), one value per variable is settled across providers
//! ([`extract`]) and speeds are normalized to knots ([`units`]). The result is
//! a flat [`fetch::ResolvedRecord`] per point, exportable via [`export`].

pub mod client;
pub mod config;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod sample;
pub mod selector;
pub mod time;
pub mod units;

pub use client::{FetchError, PointSource, StormglassClient, UpstreamUnits};
pub use config::FetchConfig;
pub use fetch::{MarineFetcher, ResolvedRecord};
pub use input::{InputError, InputTable, NormalizedTable, RequestPoint};
