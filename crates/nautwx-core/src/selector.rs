// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use chrono::{DateTime, Utc};

/// Index of the sample closest in time to `requested`.
///
/// `instant_of` yields a sample's time, or `None` when it has none; such
/// samples are never selected. Returns `0` when `samples` is empty, when
/// `requested` is `None`, or when no sample carries a time, so callers must
/// still bounds-check the result. Ties go to the earliest sample.
pub fn pick_nearest<T, F>(samples: &[T], requested: Option<DateTime<Utc>>, instant_of: F) -> usize
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let Some(requested) = requested else {
        return 0;
    };

    let mut best: Option<(usize, i64)> = None;
    for (i, sample) in samples.iter().enumerate() {
        let Some(t) = instant_of(sample) else {
            continue;
        };
        let delta = (t - requested).num_milliseconds().abs();
        if best.map_or(true, |(_, d)| delta < d) {
            best = Some((i, delta));
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// [`pick_nearest`] with the requested instant given as text.
///
/// An unparseable request falls back to the first sample.
pub fn pick_nearest_iso<T, F>(samples: &[T], requested: &str, instant_of: F) -> usize
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    pick_nearest(samples, crate::time::parse_instant(requested), instant_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, min: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2025, 9, 20, hour, min, 0).unwrap())
    }

    fn pick(samples: &[Option<DateTime<Utc>>], requested: Option<DateTime<Utc>>) -> usize {
        pick_nearest(samples, requested, |t| *t)
    }

    #[test]
    fn test_exact_match() {
        let samples = [at(5, 0), at(6, 0), at(7, 0)];
        for (i, t) in samples.iter().enumerate() {
            assert_eq!(pick(&samples, *t), i);
        }
    }

    #[test]
    fn test_nearest_by_absolute_delta() {
        let samples = [at(5, 0), at(6, 0), at(7, 0)];
        assert_eq!(pick(&samples, at(6, 20)), 1);
        assert_eq!(pick(&samples, at(6, 40)), 2);
        assert_eq!(pick(&samples, at(2, 0)), 0);
        assert_eq!(pick(&samples, at(23, 0)), 2);
    }

    #[test]
    fn test_tie_goes_to_first() {
        let samples = [at(6, 0), at(7, 0)];
        assert_eq!(pick(&samples, at(6, 30)), 0);
    }

    #[test]
    fn test_empty_and_missing_request() {
        assert_eq!(pick(&[], at(6, 0)), 0);
        assert_eq!(pick(&[at(5, 0), at(6, 0)], None), 0);
    }

    #[test]
    fn test_untimed_samples_are_skipped() {
        let samples = [None, at(9, 0), None, at(6, 0)];
        assert_eq!(pick(&samples, at(6, 0)), 3);
        assert_eq!(pick(&samples, at(10, 0)), 1);
        assert_eq!(pick(&[None, None], at(6, 0)), 0);
    }

    #[test]
    fn test_sub_second_deltas() {
        let base = at(6, 0).unwrap();
        let samples = [
            Some(base + Duration::milliseconds(400)),
            Some(base - Duration::milliseconds(300)),
        ];
        assert_eq!(pick(&samples, Some(base)), 1);
    }

    #[test]
    fn test_iso_request() {
        let samples = [at(5, 0), at(6, 0), at(7, 0)];
        assert_eq!(pick_nearest_iso(&samples, "2025-09-20T07:10:00Z", |t| *t), 2);
        assert_eq!(pick_nearest_iso(&samples, "garbage", |t| *t), 0);
    }
}
