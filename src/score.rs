/// Minimum rating counts per bucket. The bucket index is fed to `log10`, so
/// index 0 is never selected and index 1 (threshold 0) always matches.
const RATING_COUNT_BUCKETS: [u64; 14] = [
    0, 0, 500, 1_000, 1_500, 2_000, 3_000, 4_000, 8_000, 10_000, 20_000, 50_000, 100_000,
    500_000,
];

const MAX_SCORE: u32 = 100;

/// Popularity-weighted quality score in `0..=100`.
///
/// The average rating (0-10) is scaled to 0-100 and multiplied by the log10 of the
/// bucket the rating count falls into, so well-rated shows with few votes are damped
/// and widely-rated shows are boosted. An unparsable rating scores 0.
pub fn score(average_rating: &str, rating_count: u64) -> u32 {
    let rating = match average_rating.trim().parse::<f64>() {
        Ok(r) if r.is_finite() => r,
        _ => return 0,
    };
    let base = rating * 10.0;

    // Unreachable fallback: index 1 has a threshold of 0.
    let bucket = (1..RATING_COUNT_BUCKETS.len())
        .rev()
        .find(|&i| rating_count >= RATING_COUNT_BUCKETS[i])
        .unwrap_or(0);
    if bucket == 0 {
        return 0;
    }

    let raw = (base * (bucket as f64).log10()).floor();
    raw.clamp(0.0, MAX_SCORE as f64) as u32
}
