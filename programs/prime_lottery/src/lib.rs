#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use instructions::*;

pub mod constants;
pub mod encoding;
pub mod error;
pub mod events;
mod instructions;
pub mod primes;
pub mod prize;
pub mod randomness;
pub mod schedule;
pub mod state;
mod vault;

use constants::CATEGORY_COUNT;
use schedule::DrawingSchedule;

declare_id!("2RTh2Y4e2N421EbSnUYTKdGqDHJH7etxZb3VrWDMpNMY");

#[program]
pub mod prime_lottery {
    use super::*;

    pub fn initialize_lottery(
        ctx: Context<InitializeLottery>,
        params: LotteryParams,
    ) -> Result<()> {
        process_initialize_lottery(ctx, params)
    }

    pub fn set_base_ticket_price(ctx: Context<SetBaseTicketPrice>, price: u64) -> Result<()> {
        process_set_base_ticket_price(ctx, price)
    }

    pub fn claim_referral_code(ctx: Context<ClaimReferralCode>, code: u64) -> Result<()> {
        process_claim_referral_code(ctx, code)
    }

    pub fn buy_ticket(ctx: Context<BuyTicket>, numbers: Vec<u8>, referral_code: u64) -> Result<()> {
        process_buy_ticket(ctx, numbers, referral_code)
    }

    pub fn fund(ctx: Context<Fund>, amount: u64) -> Result<()> {
        process_fund(ctx, amount)
    }

    pub fn request_drawing(ctx: Context<RequestDrawing>) -> Result<()> {
        process_request_drawing(ctx)
    }

    pub fn cancel_failed_drawing(ctx: Context<CancelFailedDrawing>) -> Result<()> {
        process_cancel_failed_drawing(ctx)
    }

    pub fn fulfill_drawing(ctx: Context<FulfillDrawing>, request_id: u64) -> Result<()> {
        process_fulfill_drawing(ctx, request_id)
    }

    pub fn withdraw_prize(ctx: Context<WithdrawPrize>, ticket_id: u64) -> Result<()> {
        process_withdraw_prize(ctx, ticket_id)
    }

    pub fn withdraw_referral_revenue(
        ctx: Context<WithdrawReferralRevenue>,
        code: u64,
        round_number: u64,
    ) -> Result<()> {
        process_withdraw_referral_revenue(ctx, code, round_number)
    }

    pub fn get_prizes(ctx: Context<ViewRound>, round_number: u64) -> Result<[u64; CATEGORY_COUNT]> {
        process_get_prizes(ctx, round_number)
    }

    pub fn get_stash(ctx: Context<ViewRound>, round_number: u64) -> Result<u64> {
        process_get_stash(ctx, round_number)
    }

    pub fn get_ticket_prize(ctx: Context<ViewTicket>) -> Result<u64> {
        process_get_ticket_prize(ctx)
    }

    pub fn get_ticket_numbers(ctx: Context<ViewTicket>) -> Result<Vec<u8>> {
        process_get_ticket_numbers(ctx)
    }

    pub fn get_drawing_schedule(ctx: Context<ViewLottery>) -> Result<DrawingSchedule> {
        process_get_drawing_schedule(ctx)
    }
}
