use crate::entities::reading::{EffectiveReading, Reading};

/// Per-metric average of the reading's measurements.
///
/// A single measurement is returned as is. Two measurements are averaged and
/// rounded half away from zero.
pub fn normalize(reading: &Reading) -> EffectiveReading {
    let first = &reading.first;
    match &reading.second {
        None => EffectiveReading {
            systolic: first.systolic,
            diastolic: first.diastolic,
            pulse: first.pulse,
        },
        Some(second) => EffectiveReading {
            systolic: ((first.systolic + second.systolic) / 2.0).round(),
            diastolic: ((first.diastolic + second.diastolic) / 2.0).round(),
            pulse: ((first.pulse + second.pulse) / 2.0).round(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reading::{Measurement, TimeSlot};
    use crate::timestamp::ParsedTimestamp;

    fn reading(first: Measurement, second: Option<Measurement>) -> Reading {
        Reading {
            id: "r".to_string(),
            date: ParsedTimestamp::Malformed,
            time_slot: TimeSlot::Morning,
            first,
            second,
        }
    }

    #[test]
    fn test_single_measurement_passes_through() {
        let effective = normalize(&reading(Measurement::new(121.0, 79.0, 66.0), None));
        assert_eq!(effective.systolic, 121.0);
        assert_eq!(effective.diastolic, 79.0);
        assert_eq!(effective.pulse, 66.0);
    }

    #[test]
    fn test_two_measurements_are_averaged_and_rounded() {
        let effective = normalize(&reading(
            Measurement::new(130.0, 85.0, 70.0),
            Some(Measurement::new(120.0, 81.0, 76.0)),
        ));
        assert_eq!(effective.systolic, 125.0);
        assert_eq!(effective.diastolic, 83.0);
        assert_eq!(effective.pulse, 73.0);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        let effective = normalize(&reading(
            Measurement::new(121.0, 80.0, 70.0),
            Some(Measurement::new(120.0, 81.0, 71.0)),
        ));
        assert_eq!(effective.systolic, 121.0);
        assert_eq!(effective.diastolic, 81.0);
        assert_eq!(effective.pulse, 71.0);
    }

    #[test]
    fn test_input_is_untouched() {
        let original = reading(
            Measurement::new(130.0, 85.0, 70.0),
            Some(Measurement::new(121.0, 80.0, 75.0)),
        );
        let copy = original.clone();
        let _ = normalize(&original);
        assert_eq!(original, copy);
    }
}
