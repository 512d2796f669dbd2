use anchor_lang::prelude::*;

use crate::constants::{CATEGORY_COUNT, DRAWN_NUMBERS, MIN_WINNING_MATCHES};
use crate::error::LotteryError;

/// C(n, k). Every value this program asks for (n <= 90, k <= 6) fits in u64.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // Exact at every step: result * (n - i) is divisible by (i + 1).
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    result as u64
}

/// Winning combinations a ticket holds in each category.
///
/// A ticket with `cardinality` numbers and `matches` drawn numbers covers
/// C(matches, k) * C(cardinality - matches, 6 - k) combinations with exactly
/// `k` matches. Index `k - 2` holds the count for `k` in 2..=6.
pub fn category_weights(cardinality: u8, matches: u8) -> [u64; CATEGORY_COUNT] {
    let mut weights = [0u64; CATEGORY_COUNT];
    let matches = (matches as u64).min(DRAWN_NUMBERS as u64);
    let misses = (cardinality as u64).saturating_sub(matches);
    for k in MIN_WINNING_MATCHES as u64..=matches {
        weights[k as usize - MIN_WINNING_MATCHES] =
            binomial(matches, k) * binomial(misses, DRAWN_NUMBERS as u64 - k);
    }
    weights
}

/// Payout for one ticket. Each category is divided separately and truncated
/// before the results are summed.
pub fn ticket_prize(
    cardinality: u8,
    matches: u8,
    prizes: &[u64; CATEGORY_COUNT],
    winners: &[u64; CATEGORY_COUNT],
) -> Result<u64> {
    let weights = category_weights(cardinality, matches);
    let mut total: u64 = 0;
    for (i, &weight) in weights.iter().enumerate() {
        if weight == 0 {
            continue;
        }
        let share = (prizes[i] as u128)
            .checked_mul(weight as u128)
            .ok_or(LotteryError::MathOverflow)?
            .checked_div(winners[i] as u128)
            .ok_or(LotteryError::MathOverflow)?;
        let share = u64::try_from(share).map_err(|_| LotteryError::MathOverflow)?;
        total = total.checked_add(share).ok_or(LotteryError::MathOverflow)?;
    }
    Ok(total)
}
