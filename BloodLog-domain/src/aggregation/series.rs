use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::normalize::normalize;
use crate::entities::history::SeriesPoint;
use crate::entities::reading::Reading;
use crate::timestamp::local_day;

#[derive(Default)]
struct DaySums {
    systolic: f64,
    diastolic: f64,
    pulse: f64,
    count: usize,
}

/// Daily means over the trailing `window_days` days ending at `as_of`.
///
/// Days are calendar days in `as_of`'s timezone, emitted oldest first. Days
/// without a usable reading are omitted.
pub fn aggregate_series<Tz: TimeZone>(
    readings: &[Reading],
    window_days: u32,
    as_of: &DateTime<Tz>,
) -> Vec<SeriesPoint> {
    let tz = as_of.timezone();
    let end = as_of.with_timezone(&Utc);
    let start = end - Duration::days(i64::from(window_days));

    let mut days: BTreeMap<NaiveDate, DaySums> = BTreeMap::new();
    for reading in readings {
        let Some(instant) = reading.instant() else {
            continue;
        };
        if instant < start || instant > end {
            continue;
        }

        let effective = normalize(reading);
        if !effective.is_finite() {
            continue;
        }

        let sums = days.entry(local_day(instant, &tz)).or_default();
        sums.systolic += effective.systolic;
        sums.diastolic += effective.diastolic;
        sums.pulse += effective.pulse;
        sums.count += 1;
    }

    days.into_iter()
        .map(|(day, sums)| {
            let count = sums.count as f64;
            SeriesPoint {
                day,
                systolic: (sums.systolic / count).round(),
                diastolic: (sums.diastolic / count).round(),
                pulse: (sums.pulse / count).round(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reading::{Measurement, TimeSlot};
    use crate::timestamp::ParsedTimestamp;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn reading_at(instant: DateTime<Utc>, systolic: f64, diastolic: f64, pulse: f64) -> Reading {
        Reading {
            id: instant.to_rfc3339(),
            date: ParsedTimestamp::Valid(instant),
            time_slot: TimeSlot::Evening,
            first: Measurement::new(systolic, diastolic, pulse),
            second: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_means_in_window() {
        let as_of = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let readings = vec![
            reading_at(Utc.with_ymd_and_hms(2024, 3, 20, 7, 0, 0).unwrap(), 120.0, 80.0, 70.0),
            reading_at(Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap(), 125.0, 81.0, 71.0),
            reading_at(Utc.with_ymd_and_hms(2024, 3, 18, 7, 0, 0).unwrap(), 130.0, 85.0, 75.0),
            // Outside the 7 day window
            reading_at(Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap(), 150.0, 95.0, 90.0),
            // In the future relative to as_of
            reading_at(Utc.with_ymd_and_hms(2024, 3, 20, 18, 0, 0).unwrap(), 160.0, 95.0, 90.0),
        ];

        let series = aggregate_series(&readings, 7, &as_of);

        assert_eq!(
            series,
            vec![
                SeriesPoint { day: day(2024, 3, 18), systolic: 130.0, diastolic: 85.0, pulse: 75.0 },
                // 122.5 and 80.5 and 70.5 round away from zero
                SeriesPoint { day: day(2024, 3, 20), systolic: 123.0, diastolic: 81.0, pulse: 71.0 },
            ]
        );
        assert_eq!(series[0].label(), "03-18");
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let as_of = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let readings = vec![
            reading_at(as_of - Duration::days(7), 120.0, 80.0, 70.0),
            reading_at(as_of, 130.0, 80.0, 70.0),
        ];

        let series = aggregate_series(&readings, 7, &as_of);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_groups_by_local_day() {
        let taipei = FixedOffset::east_opt(8 * 3600).unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap().with_timezone(&taipei);
        let readings = vec![
            // 2024-03-19 23:00 and 2024-03-20 01:00 in UTC+8
            reading_at(Utc.with_ymd_and_hms(2024, 3, 19, 15, 0, 0).unwrap(), 120.0, 80.0, 70.0),
            reading_at(Utc.with_ymd_and_hms(2024, 3, 19, 17, 0, 0).unwrap(), 140.0, 90.0, 80.0),
        ];

        let local = aggregate_series(&readings, 7, &as_of);
        assert_eq!(local.iter().map(|p| p.day).collect::<Vec<_>>(), vec![day(2024, 3, 19), day(2024, 3, 20)]);

        let utc = aggregate_series(&readings, 7, &as_of.with_timezone(&Utc));
        assert_eq!(utc.len(), 1);
        assert_eq!(utc[0].systolic, 130.0);
    }

    #[test]
    fn test_skips_malformed_and_non_numeric() {
        let as_of = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let mut broken = reading_at(as_of, 120.0, 80.0, 70.0);
        broken.date = ParsedTimestamp::Malformed;
        let readings = vec![
            broken,
            reading_at(as_of - Duration::days(1), f64::NAN, 80.0, 70.0),
        ];

        assert!(aggregate_series(&readings, 7, &as_of).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let as_of = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let readings = vec![
            reading_at(as_of - Duration::days(2), 121.0, 79.0, 70.0),
            reading_at(as_of - Duration::days(1), 126.0, 82.0, 72.0),
        ];

        assert_eq!(aggregate_series(&readings, 14, &as_of), aggregate_series(&readings, 14, &as_of));
    }
}
