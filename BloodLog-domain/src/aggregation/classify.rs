use crate::entities::reading::StatusLevel;

/// Classify an effective reading; the first matching rule wins.
///
/// NaN fails every comparison and falls through to `Normal`.
pub fn classify(systolic: f64, diastolic: f64) -> StatusLevel {
    if systolic >= 140.0 || diastolic >= 90.0 {
        StatusLevel::Stage2
    } else if (130.0..=139.0).contains(&systolic) || (80.0..=89.0).contains(&diastolic) {
        StatusLevel::Stage1
    } else if (120.0..=129.0).contains(&systolic) && diastolic < 80.0 {
        StatusLevel::Elevated
    } else {
        StatusLevel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_normal() {
        assert_eq!(classify(110.0, 75.0), StatusLevel::Normal);
        assert_eq!(classify(119.0, 79.0), StatusLevel::Normal);
    }

    #[test]
    fn test_status_elevated() {
        assert_eq!(classify(125.0, 75.0), StatusLevel::Elevated);
        assert_eq!(classify(129.0, 79.0), StatusLevel::Elevated);
    }

    #[test]
    fn test_status_stage1() {
        // Systolic in range
        assert_eq!(classify(135.0, 75.0), StatusLevel::Stage1);

        // Diastolic in range wins over an elevated systolic
        assert_eq!(classify(125.0, 85.0), StatusLevel::Stage1);
        assert_eq!(classify(110.0, 80.0), StatusLevel::Stage1);
    }

    #[test]
    fn test_status_stage2() {
        assert_eq!(classify(140.0, 70.0), StatusLevel::Stage2);
        assert_eq!(classify(120.0, 90.0), StatusLevel::Stage2);
        assert_eq!(classify(185.0, 125.0), StatusLevel::Stage2);
    }

    #[test]
    fn test_fractional_gaps_fall_through() {
        assert_eq!(classify(139.5, 70.0), StatusLevel::Normal);
        assert_eq!(classify(129.5, 70.0), StatusLevel::Normal);
        assert_eq!(classify(110.0, 89.5), StatusLevel::Normal);
    }

    #[test]
    fn test_nan_is_normal() {
        assert_eq!(classify(f64::NAN, f64::NAN), StatusLevel::Normal);
        assert_eq!(classify(f64::NAN, 95.0), StatusLevel::Stage2);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(StatusLevel::Normal < StatusLevel::Elevated);
        assert!(StatusLevel::Elevated < StatusLevel::Stage1);
        assert!(StatusLevel::Stage1 < StatusLevel::Stage2);
    }
}
