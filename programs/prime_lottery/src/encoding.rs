//! Prime-product ticket encoding.
//!
//! A ticket is stored as the product of the primes of its numbers. Number `n`
//! is on the ticket iff `PRIMES[n - 1]` divides the product, so membership
//! tests are a single remainder and the number list is never stored.

use anchor_lang::prelude::*;

use crate::constants::{
    DRAWN_NUMBERS, MAX_NUMBER, MAX_TICKET_NUMBERS, MIN_NUMBER, MIN_TICKET_NUMBERS,
};
use crate::error::LotteryError;
use crate::prize::binomial;
use crate::primes::get_prime;

/// Width of a ticket hash in 64-bit words. The product of all 90 primes
/// needs 641 bits.
pub const HASH_WORDS: usize = 11;

// The macro expands against `core::result::Result`, not Anchor's alias.
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 704-bit unsigned integer holding a prime-product ticket hash.
        pub struct TicketHash(11);
    }
}

pub use wide::TicketHash;

impl TicketHash {
    /// Little-endian words, the layout kept in accounts.
    pub fn to_words(&self) -> [u64; HASH_WORDS] {
        self.0
    }

    pub fn from_words(words: [u64; HASH_WORDS]) -> Self {
        TicketHash(words)
    }

    /// `self % divisor` for a single-word divisor, walking the limbs from the
    /// most significant non-zero one.
    pub fn rem_small(&self, divisor: u64) -> u64 {
        let divisor = divisor as u128;
        self.0
            .iter()
            .rev()
            .skip_while(|limb| **limb == 0)
            .fold(0u128, |rem, limb| ((rem << 64) | *limb as u128) % divisor) as u64
    }

    pub fn contains(&self, number: u8) -> Result<bool> {
        require!(
            (MIN_NUMBER..=MAX_NUMBER).contains(&number),
            LotteryError::OutOfRange
        );
        Ok(self.rem_small(get_prime(number)?) == 0)
    }
}

/// Checks cardinality, range and uniqueness of a ticket's numbers.
pub fn validate(numbers: &[u8]) -> Result<()> {
    if numbers.len() < MIN_TICKET_NUMBERS || numbers.len() > MAX_TICKET_NUMBERS {
        msg!(
            "Ticket has {} numbers, expected {} to {}",
            numbers.len(),
            MIN_TICKET_NUMBERS,
            MAX_TICKET_NUMBERS
        );
        return err!(LotteryError::InvalidNumbers);
    }
    for (i, &number) in numbers.iter().enumerate() {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            msg!("Number {} at position {} is out of range", number, i);
            return err!(LotteryError::InvalidNumbers);
        }
        if let Some(j) = numbers[..i].iter().position(|&other| other == number) {
            msg!("Number {} repeated at positions {} and {}", number, j, i);
            return err!(LotteryError::InvalidNumbers);
        }
    }
    Ok(())
}

/// Product of the primes of `numbers`. Callers validate first.
pub fn encode(numbers: &[u8]) -> Result<TicketHash> {
    numbers.iter().try_fold(TicketHash::one(), |hash, &number| {
        hash.checked_mul(TicketHash::from(get_prime(number)?))
            .ok_or_else(|| error!(LotteryError::MathOverflow))
    })
}

pub fn validate_and_encode(numbers: &[u8]) -> Result<TicketHash> {
    validate(numbers)?;
    encode(numbers)
}

/// Recovers the ticket's numbers in ascending order.
pub fn decode(hash: &TicketHash) -> Vec<u8> {
    (MIN_NUMBER..=MAX_NUMBER)
        .filter(|&number| hash.contains(number).unwrap_or(false))
        .collect()
}

/// How many of the drawn numbers are on the ticket.
pub fn count_matches(hash: &TicketHash, drawn: &[u8; DRAWN_NUMBERS]) -> Result<u8> {
    let mut matches = 0u8;
    for &number in drawn {
        if hash.rem_small(get_prime(number)?) == 0 {
            matches += 1;
        }
    }
    Ok(matches)
}

/// Number of 6-number combinations a ticket of `cardinality` numbers covers.
pub fn combinations_for(cardinality: u8) -> u64 {
    binomial(cardinality as u64, DRAWN_NUMBERS as u64)
}
