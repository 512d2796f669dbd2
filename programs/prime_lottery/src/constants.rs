use anchor_lang::prelude::*;

// ===== PDA SEEDS =====
#[constant]
pub const LOTTERY_SEED: &[u8] = b"lottery";
#[constant]
pub const VAULT_SEED: &[u8] = b"vault";
#[constant]
pub const ROUND_SEED: &[u8] = b"round";
#[constant]
pub const TICKET_SEED: &[u8] = b"ticket";
#[constant]
pub const REFERRAL_SEED: &[u8] = b"referral";
#[constant]
pub const REFERRAL_PAYOUT_SEED: &[u8] = b"referral_payout";

// ===== TICKETS =====
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 90;
pub const MIN_TICKET_NUMBERS: usize = 6;
pub const MAX_TICKET_NUMBERS: usize = 90;
pub const DRAWN_NUMBERS: usize = 6;

// ===== PRIZE CATEGORIES (2..6 matches -> index 0..4) =====
pub const CATEGORY_COUNT: usize = 5;
pub const MIN_WINNING_MATCHES: usize = 2;
pub const JACKPOT: usize = CATEGORY_COUNT - 1;

// ===== REVENUE SPLIT (integer ratios, truncating) =====
/// Owner 10% and referral 10%.
pub const FEE_DIVISOR: u128 = 10;
/// Per category, of the post-fee remainder.
pub const CATEGORY_SHARE_PER_MILLE: u128 = 188;
pub const PER_MILLE: u128 = 1_000;
/// External funding: 60/248 to the stash, the other 188/248 to the jackpot.
pub const FUND_STASH_NUMERATOR: u128 = 60;
pub const FUND_DENOMINATOR: u128 = 248;

// ===== ROUND LEDGER LIMITS =====
/// Distinct ticket hashes per round. Bounds the heap used to load a round
/// and the work done when it is drawn.
pub const MAX_TICKET_INDEX_ENTRIES: usize = 64;
/// Distinct referral codes per round.
pub const MAX_REFERRAL_TALLIES: usize = 32;

// ===== DRAWING WINDOW =====
pub const WINDOW_PERIOD: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_WINDOW_ANCHOR: i64 = 2 * 24 * 60 * 60 + 20 * 60 * 60; // Sat 1970-01-03 20:00 UTC
pub const DEFAULT_WINDOW_DURATION: i64 = 4 * 60 * 60;

/// Referral code reserved for sales without a partner. Its share goes to the owner.
pub const NO_REFERRAL: u64 = 0;
