//! Randomness primitives for reel population and spin speeds.
//!
//! Pure functions over a caller-owned `Rng`; nothing here keeps state.
//! Invalid inputs (`min > max`, empty pool, zero samples) are programmer
//! errors and panic.

use rand::Rng;

/// Uniform sample in `[min, max]`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    assert!(min <= max, "uniform: min {min} > max {max}");
    let t: f32 = rng.random();
    (min + t * (max - min)).clamp(min, max)
}

/// Average of `samples` uniform draws, rescaled into `[min, max]`.
///
/// Averaging concentrates mass around the midpoint (central-limit effect),
/// so extreme values become rare while the range stays hard-bounded.
pub fn bell_curve<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32, samples: u32) -> f32 {
    assert!(min <= max, "bell_curve: min {min} > max {max}");
    assert!(samples > 0, "bell_curve: zero samples");
    let mut sum = 0.0f32;
    for _ in 0..samples {
        sum += rng.random::<f32>();
    }
    let mean = sum / samples as f32;
    (min + mean * (max - min)).clamp(min, max)
}

/// Draw one item from `(item, weight)` pairs with probability proportional
/// to weight. Equivalent to drawing uniformly from a pool in which each item
/// appears `weight` times, without materializing that pool.
pub fn weighted_sample<T: Copy, R: Rng + ?Sized>(rng: &mut R, pool: &[(T, u32)]) -> T {
    let total: u64 = pool.iter().map(|&(_, w)| w as u64).sum();
    assert!(total > 0, "weighted_sample: empty pool");
    let mut ticket = rng.random_range(0..total);
    for &(item, weight) in pool {
        let w = weight as u64;
        if ticket < w {
            return item;
        }
        ticket -= w;
    }
    // ticket < total guarantees a hit above
    pool[pool.len() - 1].0
}

/// Fill a sequence of `len` items by repeated weighted sampling.
pub fn weighted_sequence<T: Copy, R: Rng + ?Sized>(rng: &mut R, pool: &[(T, u32)], len: usize) -> Vec<T> {
    (0..len).map(|_| weighted_sample(rng, pool)).collect()
}
