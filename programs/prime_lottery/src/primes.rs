use anchor_lang::prelude::*;

use crate::constants::MAX_NUMBER;
use crate::error::LotteryError;

/// The first 90 primes. Number `n` in 1..=90 is represented by `PRIMES[n - 1]`.
pub const PRIMES: [u16; MAX_NUMBER as usize] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463,
];

/// Maps a lottery number to its prime. Index 0 maps to 1 so it can be used
/// as a neutral multiplier.
pub fn get_prime(index: u8) -> Result<u64> {
    match index {
        0 => Ok(1),
        1..=MAX_NUMBER => Ok(PRIMES[index as usize - 1] as u64),
        _ => err!(LotteryError::OutOfRange),
    }
}
