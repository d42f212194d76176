//! Fixed numeric buckets and the midpoint reconstruction of an average.

use crate::stats::tally::Tally;

/// Inclusive age range; `max = None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeBucket {
    pub label: &'static str,
    pub min: u32,
    pub max: Option<u32>,
}

pub const AGE_BUCKETS: &[AgeBucket] = &[
    AgeBucket { label: "18-25", min: 18, max: Some(25) },
    AgeBucket { label: "26-30", min: 26, max: Some(30) },
    AgeBucket { label: "31-35", min: 31, max: Some(35) },
    AgeBucket { label: "36-45", min: 36, max: Some(45) },
    AgeBucket { label: "46+", min: 46, max: None },
];

/// Stand-in value for the open-ended age bucket when averaging.
pub const OPEN_ENDED_AGE_VALUE: f64 = 50.0;

/// Half-open range of work years `[min, max)`; `max = None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearsBucket {
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
}

pub const WORK_YEARS_BUCKETS: &[YearsBucket] = &[
    YearsBucket { label: "0-1", min: 0.0, max: Some(1.0) },
    YearsBucket { label: "1-3", min: 1.0, max: Some(3.0) },
    YearsBucket { label: "3-5", min: 3.0, max: Some(5.0) },
    YearsBucket { label: "5-10", min: 5.0, max: Some(10.0) },
    YearsBucket { label: "10+", min: 10.0, max: None },
];

pub fn age_bucket(age: u32) -> Option<&'static AgeBucket> {
    AGE_BUCKETS
        .iter()
        .find(|b| age >= b.min && b.max.map_or(true, |max| age <= max))
}

pub fn work_years_bucket(years: f64) -> Option<&'static YearsBucket> {
    WORK_YEARS_BUCKETS
        .iter()
        .find(|b| years >= b.min && b.max.map_or(true, |max| years < max))
}

/// Representative value of an age-bucket label: the midpoint of `a-b`, or
/// [`OPEN_ENDED_AGE_VALUE`] for `a+`.
pub fn age_label_midpoint(label: &str) -> Option<f64> {
    if label.trim().ends_with('+') {
        return Some(OPEN_ENDED_AGE_VALUE);
    }
    let (min, max) = label.split_once('-')?;
    let min: f64 = min.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;
    Some((min + max) / 2.0)
}

/// Average age reconstructed from an age-bucket distribution:
/// `Σ(midpoint × count) / Σ(count)`. `None` when the distribution is empty.
/// Labels that are not age ranges are ignored.
pub fn average_age_from_buckets(distribution: &Tally) -> Option<f64> {
    let (weighted, total) = distribution
        .iter()
        .filter_map(|(label, count)| age_label_midpoint(label).map(|mid| (mid, count)))
        .fold((0.0, 0usize), |(sum, n), (mid, count)| {
            (sum + mid * count as f64, n + count)
        });
    (total > 0).then(|| weighted / total as f64)
}

/// Rounds half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One decimal place, `—` when undefined.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.1}", round_one_decimal(avg)),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bucket_edges() {
        assert_eq!(age_bucket(17), None);
        assert_eq!(age_bucket(18).map(|b| b.label), Some("18-25"));
        assert_eq!(age_bucket(25).map(|b| b.label), Some("18-25"));
        assert_eq!(age_bucket(26).map(|b| b.label), Some("26-30"));
        assert_eq!(age_bucket(45).map(|b| b.label), Some("36-45"));
        assert_eq!(age_bucket(46).map(|b| b.label), Some("46+"));
        assert_eq!(age_bucket(65).map(|b| b.label), Some("46+"));
    }

    #[test]
    fn test_work_years_bucket_edges() {
        assert_eq!(work_years_bucket(0.0).map(|b| b.label), Some("0-1"));
        assert_eq!(work_years_bucket(0.99).map(|b| b.label), Some("0-1"));
        assert_eq!(work_years_bucket(1.0).map(|b| b.label), Some("1-3"));
        assert_eq!(work_years_bucket(9.5).map(|b| b.label), Some("5-10"));
        assert_eq!(work_years_bucket(25.0).map(|b| b.label), Some("10+"));
        assert_eq!(work_years_bucket(-1.0), None);
    }

    #[test]
    fn test_midpoints() {
        assert_eq!(age_label_midpoint("18-25"), Some(21.5));
        assert_eq!(age_label_midpoint("26-30"), Some(28.0));
        assert_eq!(age_label_midpoint("46+"), Some(50.0));
        assert_eq!(age_label_midpoint("unknown"), None);
    }

    #[test]
    fn test_average_example() {
        let distribution: Tally = [("18-25", 2), ("26-30", 2)].into_iter().collect();
        let avg = average_age_from_buckets(&distribution).unwrap();
        assert!((avg - 24.75).abs() < 1e-9);
        assert!(avg > 21.5 && avg < 28.0);
        assert_eq!(format_average(Some(avg)), "24.8");
    }

    #[test]
    fn test_average_uses_open_ended_value() {
        let distribution: Tally = [("46+", 3)].into_iter().collect();
        assert_eq!(average_age_from_buckets(&distribution), Some(50.0));
    }

    #[test]
    fn test_average_undefined_when_empty() {
        let distribution = Tally::with_keys(AGE_BUCKETS.iter().map(|b| b.label));
        assert_eq!(average_age_from_buckets(&distribution), None);
        assert_eq!(format_average(None), "—");
    }
}
