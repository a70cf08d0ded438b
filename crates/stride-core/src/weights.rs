//! Weight normalization for goal compositions.
//!
//! A goal's composition items each carry a relative weight: an integer
//! multiple of [`WEIGHT_STEP`] in `[0,100]`. Whenever the item set or any
//! weight changes, the working set is renormalized so the weights sum to
//! exactly [`WEIGHT_TOTAL`] before persistence.
//!
//! The rules, in order:
//! - an empty set normalizes to an empty set;
//! - a set already summing to 100 is returned unchanged (idempotence);
//! - an all-zero set gets an exact equal split, remainder to the earliest
//!   items; this branch is allowed to leave the step grid, because an equal
//!   split of 100 over e.g. 3 items cannot land on multiples of 5;
//! - anything else is scaled by `100/sum`, rounded to the nearest step
//!   (ties up), clamped, then corrected by a bounded round-robin walk that
//!   moves one step at a time until the sum is exactly 100.
//!
//! `normalize` is pure and total: it never fails for any input length.

use crate::errors::{EngineError, EngineResult};

/// Weight step granularity.
pub const WEIGHT_STEP: u32 = 5;

/// Required sum of a normalized non-empty weight set.
pub const WEIGHT_TOTAL: u32 = 100;

/// Validate a caller-entered weight prior to normalization.
pub fn validate_weight(value: u32) -> EngineResult<()> {
    if value > WEIGHT_TOTAL || value % WEIGHT_STEP != 0 {
        return Err(EngineError::InvalidWeight { value });
    }
    Ok(())
}

/// Exact equal split of 100 over `count` items, remainder to the earliest.
///
/// `equal_split(3)` is `[34, 33, 33]`. The result sums to 100 by
/// construction and ignores the step grid when `count` does not divide
/// evenly.
pub fn equal_split(count: usize) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let base = WEIGHT_TOTAL / count as u32;
    let remainder = (WEIGHT_TOTAL - base * count as u32) as usize;
    (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Normalize a raw weight set to sum exactly to 100.
///
/// Same length and order as the input. Re-normalizing an already-valid set
/// is a no-op.
pub fn normalize(weights: &[u32]) -> Vec<u32> {
    let count = weights.len();
    if count == 0 {
        return Vec::new();
    }

    let sum: u64 = weights.iter().map(|&w| w as u64).sum();
    if sum == WEIGHT_TOTAL as u64 {
        return weights.to_vec();
    }
    if sum == 0 {
        return equal_split(count);
    }

    // Scale to 100 and snap to the step grid, ties rounding up.
    let ratio = WEIGHT_TOTAL as f64 / sum as f64;
    let mut out: Vec<u32> = weights
        .iter()
        .map(|&w| {
            let scaled = w as f64 * ratio;
            let snapped = (scaled / WEIGHT_STEP as f64 + 0.5).floor() * WEIGHT_STEP as f64;
            (snapped as i64).clamp(0, WEIGHT_TOTAL as i64) as u32
        })
        .collect();

    // Rounding residue is always a multiple of the step; push it back one
    // step at a time, round-robin, respecting per-item bounds. Converges in
    // at most 2 * count visits given integer step arithmetic.
    let mut diff: i64 = WEIGHT_TOTAL as i64 - out.iter().map(|&w| w as i64).sum::<i64>();
    let mut visits = 0usize;
    let mut idx = 0usize;
    while diff != 0 && visits < 2 * count {
        let w = &mut out[idx];
        if diff > 0 && *w <= WEIGHT_TOTAL - WEIGHT_STEP {
            *w += WEIGHT_STEP;
            diff -= WEIGHT_STEP as i64;
        } else if diff < 0 && *w >= WEIGHT_STEP {
            *w -= WEIGHT_STEP;
            diff += WEIGHT_STEP as i64;
        }
        idx = (idx + 1) % count;
        visits += 1;
    }
    debug_assert_eq!(diff, 0, "round-robin correction failed to converge");

    for w in &mut out {
        *w = (*w).min(WEIGHT_TOTAL);
    }
    out
}
