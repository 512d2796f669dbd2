use anchor_lang::prelude::*;
use solana_program::keccak;

use crate::constants::{DRAWN_NUMBERS, MAX_NUMBER};
use crate::error::LotteryError;

const LANES_PER_WORD: usize = 4;

/// Derives the drawn numbers from one or more 32-byte random words.
///
/// Each word is read as four little-endian u64 lanes; a lane maps to
/// `lane % 90 + 1` and repeats are skipped. Once the supplied words are used
/// up, the last word is re-hashed with keccak for more entropy.
pub fn derive_numbers(words: &[[u8; 32]]) -> Result<[u8; DRAWN_NUMBERS]> {
    require!(!words.is_empty(), LotteryError::RandomnessNotResolved);

    let mut numbers = [0u8; DRAWN_NUMBERS];
    let mut found = 0;
    let mut next_word = 1;
    let mut word = words[0];

    loop {
        for lane in word.chunks_exact(8).take(LANES_PER_WORD) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(lane);
            let candidate = (u64::from_le_bytes(bytes) % MAX_NUMBER as u64) as u8 + 1;
            if numbers[..found].contains(&candidate) {
                continue;
            }
            numbers[found] = candidate;
            found += 1;
            if found == DRAWN_NUMBERS {
                return Ok(numbers);
            }
        }

        word = match words.get(next_word) {
            Some(next) => *next,
            None => keccak::hashv(&[word.as_ref()]).to_bytes(),
        };
        next_word += 1;
    }
}
