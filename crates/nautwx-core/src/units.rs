// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

/// Knots per meter/second (1852 m per nautical mile, 3600 s per hour).
pub const KTS_PER_MPS: f64 = 1.9438444924574;

/// Converts a speed in meters/second to knots.
///
/// Missing or non-finite input yields `None`; nothing here ever fails.
pub fn to_knots(mps: Option<f64>) -> Option<f64> {
    mps.filter(|v| v.is_finite()).map(|v| v * KTS_PER_MPS)
}

/// Same as [`to_knots`] for textual input such as a raw table cell.
pub fn parse_knots(raw: &str) -> Option<f64> {
    to_knots(raw.trim().parse::<f64>().ok())
}

/// Unit a speed is reported in by the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    #[default]
    MetersPerSecond,
    Knots,
}

impl SpeedUnit {
    /// Normalizes a value reported in this unit to knots.
    pub fn knots(self, value: Option<f64>) -> Option<f64> {
        match self {
            SpeedUnit::MetersPerSecond => to_knots(value),
            SpeedUnit::Knots => value.filter(|v| v.is_finite()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_knots() {
        assert_eq!(to_knots(None), None);
        let kt = to_knots(Some(1.0)).unwrap();
        assert!((kt - 1.9438444924574).abs() < 1e-9);
        assert_eq!(to_knots(Some(0.0)), Some(0.0));
        assert_eq!(to_knots(Some(f64::NAN)), None);
    }

    #[test]
    fn test_parse_knots() {
        assert_eq!(parse_knots("abc"), None);
        assert_eq!(parse_knots(""), None);
        let kt = parse_knots(" 5 ").unwrap();
        assert!((kt - 9.719222462287).abs() < 1e-9);
    }

    #[test]
    fn test_speed_unit_passthrough() {
        assert_eq!(SpeedUnit::Knots.knots(Some(12.5)), Some(12.5));
        assert_eq!(SpeedUnit::Knots.knots(None), None);
        let kt = SpeedUnit::MetersPerSecond.knots(Some(2.0)).unwrap();
        assert!((kt - 2.0 * KTS_PER_MPS).abs() < 1e-9);
    }
}
