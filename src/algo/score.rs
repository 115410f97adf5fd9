use super::types::{Momentum, VolumeSample};

const SOURCE_WEIGHT: f64 = 20.0;
const SOURCE_CAP: f64 = 60.0;
const VOLUME_WEIGHT: f64 = 10.0;
const VOLUME_CAP: f64 = 30.0;

/// Combine source coverage, log-scaled volume and momentum into a 0-100 score.
pub fn combined_score(source_count: usize, avg_volume: f64, momentum: Momentum) -> u8 {
    let sources = (source_count as f64 * SOURCE_WEIGHT).min(SOURCE_CAP);

    // NaN.max(0.0) is 0.0, so garbage volumes contribute nothing.
    let volume = ((avg_volume.max(0.0) + 1.0).log10() * VOLUME_WEIGHT).min(VOLUME_CAP);

    let total = sources + volume + momentum.bonus();
    total.clamp(0.0, 100.0).round() as u8
}

/// Arithmetic mean of the recorded volumes, 0.0 when there are none.
pub fn average_volume(history: &[VolumeSample]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    history.iter().map(|s| s.volume).sum::<f64>() / history.len() as f64
}
