//! Property-based tests for the numeric kernels.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::clean::{clip_outliers, forward_fill, interpolate_time, mean_std};
    use crate::features::{lag, rolling_mean};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn index(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2009, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n).map(|i| start + Duration::minutes(i as i64)).collect()
    }

    fn readings() -> impl Strategy<Value = Vec<Option<f64>>> {
        proptest::collection::vec(proptest::option::weighted(0.7, 0.0f64..10.0), 0..80)
    }

    proptest! {
        #[test]
        fn test_interpolation_stays_within_neighbours(values in readings(), limit in 0usize..30) {
            let mut filled = values.clone();
            interpolate_time(&index(values.len()), &mut filled, limit);

            for (before, after) in values.iter().zip(&filled) {
                if before.is_some() {
                    prop_assert_eq!(before, after);
                }
                if let Some(v) = after {
                    prop_assert!((0.0..10.0 + 1e-9).contains(v));
                }
            }
            let missing_before = values.iter().filter(|v| v.is_none()).count();
            let missing_after = filled.iter().filter(|v| v.is_none()).count();
            prop_assert!(missing_after <= missing_before);
        }

        #[test]
        fn test_forward_fill_never_exceeds_limit(values in readings(), limit in 0usize..10) {
            let mut filled = values.clone();
            forward_fill(&mut filled, limit);

            let mut run = 0;
            for (before, after) in values.iter().zip(&filled) {
                if before.is_none() && after.is_some() {
                    run += 1;
                    prop_assert!(run <= limit);
                } else {
                    run = 0;
                }
            }
        }

        #[test]
        fn test_clip_bounds_hold(values in readings(), sigma in 0.5f64..4.0) {
            let mut clipped = values.clone();
            clip_outliers(&mut clipped, sigma);
            if let Some((mean, std)) = mean_std(&values) {
                for v in clipped.iter().flatten() {
                    prop_assert!(*v >= mean - sigma * std - 1e-9);
                    prop_assert!(*v <= mean + sigma * std + 1e-9);
                }
            }
        }

        #[test]
        fn test_lag_and_rolling_keep_length(values in readings(), n in 1usize..20) {
            prop_assert_eq!(lag(&values, n).len(), values.len());
            prop_assert_eq!(rolling_mean(&values, n).len(), values.len());
        }
    }
}
