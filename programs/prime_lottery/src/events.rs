use anchor_lang::prelude::*;

use crate::constants::{CATEGORY_COUNT, DRAWN_NUMBERS};

#[event]
pub struct LotteryInitialized {
    pub authority: Pubkey,
    pub mint: Pubkey,
    pub coordinator: Pubkey,
    pub base_ticket_price: u64,
    pub window_anchor: i64,
    pub window_duration: i64,
}

#[event]
pub struct BaseTicketPriceUpdated {
    pub previous: u64,
    pub price: u64,
    /// First round the new price applies to.
    pub effective_round: u64,
}

#[event]
pub struct ReferralCodeClaimed {
    pub code: u64,
    pub partner: Pubkey,
}

#[event]
pub struct TicketCreated {
    pub round: u64,
    pub player: Pubkey,
    pub id: u64,
    pub numbers: Vec<u8>,
    pub referral_code: u64,
    pub combinations: u64,
    pub price: u64,
}

#[event]
pub struct Funded {
    pub round: u64,
    pub funder: Pubkey,
    pub amount: u64,
    pub to_stash: u64,
    pub to_jackpot: u64,
}

#[event]
pub struct DrawRequested {
    pub round: u64,
    pub request_id: u64,
    pub randomness_account: Pubkey,
}

#[event]
pub struct DrawCancelled {
    pub round: u64,
    pub request_id: u64,
}

#[event]
pub struct DrawFinalized {
    pub round: u64,
    pub total_combinations: u64,
    pub numbers: [u8; DRAWN_NUMBERS],
    pub winners: [u64; CATEGORY_COUNT],
    pub prizes: [u64; CATEGORY_COUNT],
    pub stash: u64,
    pub owner_revenue: u64,
}

#[event]
pub struct PrizeWithdrawn {
    pub ticket_id: u64,
    pub player: Pubkey,
    pub amount: u64,
}

#[event]
pub struct ReferralRevenueWithdrawn {
    pub code: u64,
    pub round: u64,
    pub partner: Pubkey,
    pub amount: u64,
}
