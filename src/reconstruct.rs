use crate::schema::{DailyBalanceSample, DailyMovementBucket};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Derives per-day movements from cumulative balance samples.
///
/// Samples outside `[window_start, window_end]` are dropped first. For each
/// consecutive pair the delta becomes one bucket on the later date: a
/// non-negative delta is inflow, a negative delta is outflow — never both,
/// because a cumulative-balance signal cannot distinguish a day with a large
/// inflow and a large outflow netting out from a day with a single small
/// movement. That information loss is inherent to the source, not corrected
/// here.
///
/// The first in-window sample establishes the baseline and emits no bucket.
/// Missing days are simply absent from the output; zero-filling a calendar
/// range is the statement builder's job.
pub fn reconstruct_movements(
    samples: &[DailyBalanceSample],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<DailyMovementBucket> {
    let mut in_window: Vec<DailyBalanceSample> = samples
        .iter()
        .filter(|s| s.date >= window_start && s.date <= window_end)
        .copied()
        .collect();
    in_window.sort_by_key(|s| s.date);

    let mut buckets = Vec::new();

    for pair in in_window.windows(2) {
        let prev = pair[0];
        let current = pair[1];
        let delta = current.balance - prev.balance;

        let (inflow, outflow) = if delta >= Decimal::ZERO {
            (delta, Decimal::ZERO)
        } else {
            (Decimal::ZERO, -delta)
        };

        buckets.push(DailyMovementBucket {
            date: current.date,
            inflow,
            outflow,
            closing_balance: current.balance,
            entries: Vec::new(),
        });
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(year: i32, month: u32, day: u32, balance: Decimal) -> DailyBalanceSample {
        DailyBalanceSample {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            balance,
        }
    }

    #[test]
    fn test_basic_reconstruction() {
        let samples = vec![
            sample(2024, 1, 1, dec!(1000.00)),
            sample(2024, 1, 2, dec!(1200.00)),
            sample(2024, 1, 3, dec!(1150.00)),
        ];

        let window_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let window_end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let buckets = reconstruct_movements(&samples, window_start, window_end);

        // First sample is baseline only.
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(buckets[0].inflow, dec!(200.00));
        assert_eq!(buckets[0].outflow, Decimal::ZERO);
        assert_eq!(buckets[0].closing_balance, dec!(1200.00));

        assert_eq!(buckets[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(buckets[1].inflow, Decimal::ZERO);
        assert_eq!(buckets[1].outflow, dec!(50.00));
        assert_eq!(buckets[1].closing_balance, dec!(1150.00));
    }

    #[test]
    fn test_sign_property() {
        let samples = vec![
            sample(2024, 2, 1, dec!(500.00)),
            sample(2024, 2, 2, dec!(480.25)),
            sample(2024, 2, 3, dec!(480.25)),
            sample(2024, 2, 4, dec!(610.00)),
        ];

        let window_start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let window_end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let buckets = reconstruct_movements(&samples, window_start, window_end);

        for (bucket, pair) in buckets.iter().zip(samples.windows(2)) {
            let delta = pair[1].balance - pair[0].balance;
            assert_eq!(bucket.net(), delta);
            // Exactly one side non-zero, or both zero when the delta is zero.
            assert!(bucket.inflow.is_zero() || bucket.outflow.is_zero());
        }

        // Zero-delta day stays, with both sides zero.
        assert_eq!(buckets[1].inflow, Decimal::ZERO);
        assert_eq!(buckets[1].outflow, Decimal::ZERO);
    }

    #[test]
    fn test_window_filtering() {
        let samples = vec![
            sample(2024, 1, 30, dec!(100.00)),
            sample(2024, 2, 1, dec!(300.00)),
            sample(2024, 2, 2, dec!(250.00)),
            sample(2024, 3, 1, dec!(900.00)),
        ];

        let window_start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let window_end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let buckets = reconstruct_movements(&samples, window_start, window_end);

        // Out-of-window samples contribute nothing, not even as baseline.
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].outflow, dec!(50.00));
    }

    #[test]
    fn test_gaps_stay_absent() {
        let samples = vec![
            sample(2024, 1, 1, dec!(100.00)),
            sample(2024, 1, 5, dec!(180.00)),
        ];

        let window_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let window_end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let buckets = reconstruct_movements(&samples, window_start, window_end);

        // The four-day gap collapses into one bucket on the later date.
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(buckets[0].inflow, dec!(80.00));
    }

    #[test]
    fn test_empty_and_single_sample() {
        let window_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let window_end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        assert!(reconstruct_movements(&[], window_start, window_end).is_empty());

        let single = vec![sample(2024, 1, 10, dec!(42.00))];
        assert!(reconstruct_movements(&single, window_start, window_end).is_empty());
    }
}
