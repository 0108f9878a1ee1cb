use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use super::normalize::normalize;
use crate::entities::history::{HistoryBatch, HistoryEntry};
use crate::entities::reading::Reading;
use crate::timestamp::start_of_day;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A reading this many days older than the run's first day starts a new run
const BATCH_SPAN_DAYS: f64 = 6.0;

#[derive(Default)]
struct RunningSums {
    systolic: f64,
    diastolic: f64,
    pulse: f64,
    count: usize,
}

impl RunningSums {
    fn add(&mut self, reading: &Reading) {
        let effective = normalize(reading);
        if !effective.is_finite() {
            debug!(reading_id = %reading.id, "Reading has non-numeric values, left out of batch means");
            return;
        }
        self.systolic += effective.systolic;
        self.diastolic += effective.diastolic;
        self.pulse += effective.pulse;
        self.count += 1;
    }

    fn take_summary(&mut self) -> Option<HistoryEntry> {
        let sums = std::mem::take(self);
        if sums.count == 0 {
            return None;
        }
        let count = sums.count as f64;
        Some(HistoryEntry::Summary(HistoryBatch {
            mean_systolic: sums.systolic / count,
            mean_diastolic: sums.diastolic / count,
            mean_pulse: sums.pulse / count,
            count: sums.count,
        }))
    }
}

fn day_distance(anchor: DateTime<Utc>, day: DateTime<Utc>) -> f64 {
    let millis = (anchor - day).num_milliseconds().abs() as f64;
    (millis / MILLIS_PER_DAY).ceil()
}

/// Group readings into runs of up to six calendar days, newest first.
///
/// Each run is listed reading by reading and closed by a summary of its means.
/// A run starts at the day of its first (newest) reading; a reading six or more
/// days older than that starts the next run. Readings with an unreadable date
/// are left out.
pub fn batch<Tz: TimeZone>(readings: &[Reading], tz: &Tz) -> Vec<HistoryEntry> {
    let mut dated: Vec<(DateTime<Utc>, &Reading)> = readings
        .iter()
        .filter_map(|reading| match reading.instant() {
            Some(instant) => Some((instant, reading)),
            None => {
                debug!(reading_id = %reading.id, "Skipping reading with malformed date");
                None
            }
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut entries = Vec::with_capacity(dated.len() + dated.len() / 2 + 1);
    let mut anchor: Option<DateTime<Utc>> = None;
    let mut sums = RunningSums::default();

    for (instant, reading) in dated {
        let day = start_of_day(instant, tz);
        let current = *anchor.get_or_insert(day);

        if day_distance(current, day) >= BATCH_SPAN_DAYS {
            if let Some(summary) = sums.take_summary() {
                entries.push(summary);
            }
            anchor = Some(day);
        }

        entries.push(HistoryEntry::Reading(reading.clone()));
        sums.add(reading);
    }

    if let Some(summary) = sums.take_summary() {
        entries.push(summary);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reading::{Measurement, TimeSlot};
    use crate::timestamp::ParsedTimestamp;
    use chrono::{Duration, FixedOffset};
    use pretty_assertions::assert_eq;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).unwrap()
    }

    fn reading_days_ago(id: &str, days: i64, systolic: f64) -> Reading {
        Reading {
            id: id.to_string(),
            date: ParsedTimestamp::Valid(base() - Duration::days(days)),
            time_slot: TimeSlot::Morning,
            first: Measurement::new(systolic, 80.0, 70.0),
            second: None,
        }
    }

    fn shape(entries: &[HistoryEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| match entry {
                HistoryEntry::Reading(r) => r.id.clone(),
                HistoryEntry::Summary(b) => format!("summary({})", b.count),
            })
            .collect()
    }

    #[test]
    fn test_batches_by_six_day_window() {
        let readings = vec![
            reading_days_ago("d0", 0, 120.0),
            reading_days_ago("d1", 1, 130.0),
            reading_days_ago("d2", 2, 140.0),
            reading_days_ago("d7", 7, 110.0),
            reading_days_ago("d8", 8, 112.0),
            reading_days_ago("d20", 20, 150.0),
        ];

        let entries = batch(&readings, &Utc);

        assert_eq!(
            shape(&entries),
            vec!["d0", "d1", "d2", "summary(3)", "d7", "d8", "summary(2)", "d20", "summary(1)"]
        );
        assert_eq!(entries.iter().filter(|e| e.is_summary()).count(), 3);

        match &entries[3] {
            HistoryEntry::Summary(batch) => {
                assert_eq!(batch.mean_systolic, 130.0);
                assert_eq!(batch.mean_diastolic, 80.0);
            }
            other => panic!("expected summary, got {:?}", other),
        }
    }

    #[test]
    fn test_sorts_newest_first() {
        let readings = vec![
            reading_days_ago("old", 3, 120.0),
            reading_days_ago("new", 0, 120.0),
            reading_days_ago("mid", 1, 120.0),
        ];

        assert_eq!(shape(&batch(&readings, &Utc)), vec!["new", "mid", "old", "summary(3)"]);
    }

    #[test]
    fn test_six_days_apart_starts_new_batch() {
        let readings = vec![reading_days_ago("a", 0, 120.0), reading_days_ago("b", 6, 120.0)];
        assert_eq!(
            shape(&batch(&readings, &Utc)),
            vec!["a", "summary(1)", "b", "summary(1)"]
        );

        let readings = vec![reading_days_ago("a", 0, 120.0), reading_days_ago("b", 5, 120.0)];
        assert_eq!(shape(&batch(&readings, &Utc)), vec!["a", "b", "summary(2)"]);
    }

    #[test]
    fn test_day_boundaries_follow_timezone() {
        let taipei = FixedOffset::east_opt(8 * 3600).unwrap();
        // 2024-03-20 23:30 local and 2024-03-15 00:30 local: five local days apart,
        // but six UTC days apart
        let newer = Reading {
            date: ParsedTimestamp::Valid(Utc.with_ymd_and_hms(2024, 3, 20, 15, 30, 0).unwrap()),
            ..reading_days_ago("newer", 0, 120.0)
        };
        let older = Reading {
            date: ParsedTimestamp::Valid(Utc.with_ymd_and_hms(2024, 3, 14, 16, 30, 0).unwrap()),
            ..reading_days_ago("older", 0, 120.0)
        };
        let readings = vec![newer, older];

        assert_eq!(shape(&batch(&readings, &taipei)), vec!["newer", "older", "summary(2)"]);
        assert_eq!(
            shape(&batch(&readings, &Utc)),
            vec!["newer", "summary(1)", "older", "summary(1)"]
        );
    }

    #[test]
    fn test_malformed_dates_are_excluded() {
        let mut broken = reading_days_ago("broken", 0, 120.0);
        broken.date = ParsedTimestamp::Malformed;
        let readings = vec![broken, reading_days_ago("ok", 1, 120.0)];

        assert_eq!(shape(&batch(&readings, &Utc)), vec!["ok", "summary(1)"]);
    }

    #[test]
    fn test_non_numeric_readings_are_listed_but_not_averaged() {
        let readings = vec![
            reading_days_ago("good", 0, 124.0),
            reading_days_ago("nan", 1, f64::NAN),
        ];

        let entries = batch(&readings, &Utc);
        assert_eq!(shape(&entries), vec!["good", "nan", "summary(1)"]);
        match &entries[2] {
            HistoryEntry::Summary(batch) => assert_eq!(batch.mean_systolic, 124.0),
            other => panic!("expected summary, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(batch(&[], &Utc).is_empty());
    }

    #[test]
    fn test_batching_is_idempotent() {
        let readings = vec![
            reading_days_ago("d0", 0, 120.0),
            reading_days_ago("d9", 9, 128.0),
            reading_days_ago("d4", 4, 135.0),
        ];

        assert_eq!(batch(&readings, &Utc), batch(&readings, &Utc));
    }
}
