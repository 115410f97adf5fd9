use super::types::{Momentum, VolumeSample};

const EXPLODING_RATIO: f64 = 2.0;
const RISING_RATIO: f64 = 1.2;
const FALLING_RATIO: f64 = 0.5;

/// Classify a volume history by comparing the mean of its recent half
/// against the mean of its older half.
///
/// The history is ordered by timestamp (stable, so equal timestamps keep
/// their insertion order) and split at `n / 2`; for odd `n` the middle
/// sample belongs to the recent half.
pub fn classify_momentum(history: &[VolumeSample]) -> Momentum {
    if history.len() < 2 {
        return Momentum::Stable;
    }

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|s| s.timestamp);

    let mid = sorted.len() / 2;
    let older_avg = mean_volume(&sorted[..mid]);
    let recent_avg = mean_volume(&sorted[mid..]);

    // IEEE semantics on purpose: 0/0 is NaN and falls through to Stable,
    // x/0 is +inf and classifies as Exploding.
    classify_ratio(recent_avg / older_avg)
}

/// Bucket a recent/older ratio. Checks run from the top bucket down.
pub fn classify_ratio(ratio: f64) -> Momentum {
    if ratio > EXPLODING_RATIO {
        Momentum::Exploding
    } else if ratio > RISING_RATIO {
        Momentum::Rising
    } else if ratio < FALLING_RATIO {
        Momentum::Falling
    } else {
        Momentum::Stable
    }
}

fn mean_volume(samples: &[VolumeSample]) -> f64 {
    let sum: f64 = samples.iter().map(|s| s.volume).sum();
    sum / samples.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(points: &[(i64, f64)]) -> Vec<VolumeSample> {
        points
            .iter()
            .map(|&(timestamp, volume)| VolumeSample { timestamp, volume })
            .collect()
    }

    #[test]
    fn too_few_samples_is_stable() {
        assert_eq!(classify_momentum(&[]), Momentum::Stable);
        assert_eq!(classify_momentum(&history(&[(0, 1000.0)])), Momentum::Stable);
    }

    #[test]
    fn fivefold_growth_explodes() {
        assert_eq!(
            classify_momentum(&history(&[(0, 100.0), (1, 500.0)])),
            Momentum::Exploding
        );
    }

    #[test]
    fn moderate_growth_rises() {
        assert_eq!(
            classify_momentum(&history(&[(0, 100.0), (1, 150.0)])),
            Momentum::Rising
        );
    }

    #[test]
    fn halving_and_below_falls() {
        assert_eq!(
            classify_momentum(&history(&[(0, 100.0), (1, 40.0)])),
            Momentum::Falling
        );
        // exactly 0.5 is not below the threshold
        assert_eq!(
            classify_momentum(&history(&[(0, 100.0), (1, 50.0)])),
            Momentum::Stable
        );
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(classify_ratio(2.0), Momentum::Rising);
        assert_eq!(classify_ratio(1.2), Momentum::Stable);
        assert_eq!(classify_ratio(0.5), Momentum::Stable);
        assert_eq!(classify_ratio(2.0001), Momentum::Exploding);
    }

    #[test]
    fn sorts_by_timestamp_before_splitting() {
        // Out of order input: chronologically 100 then 500.
        assert_eq!(
            classify_momentum(&history(&[(10, 500.0), (0, 100.0)])),
            Momentum::Exploding
        );
    }

    #[test]
    fn odd_length_middle_goes_to_recent() {
        // older = [100], recent = [100, 400] -> 250 / 100 = 2.5
        assert_eq!(
            classify_momentum(&history(&[(0, 100.0), (1, 100.0), (2, 400.0)])),
            Momentum::Exploding
        );
    }

    #[test]
    fn zero_older_half() {
        assert_eq!(
            classify_momentum(&history(&[(0, 0.0), (1, 10.0)])),
            Momentum::Exploding
        );
        assert_eq!(
            classify_momentum(&history(&[(0, 0.0), (1, 0.0)])),
            Momentum::Stable
        );
    }
}
