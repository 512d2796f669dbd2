use anchor_lang::prelude::*;

use crate::constants::*;
use crate::schedule::DrawingSchedule;
use crate::state::{Lottery, Round, Ticket};

#[derive(Accounts)]
#[instruction(round_number: u64)]
pub struct ViewRound<'info> {
    #[account(
        seeds = [ROUND_SEED, round_number.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,
}

#[derive(Accounts)]
pub struct ViewTicket<'info> {
    #[account(
        seeds = [TICKET_SEED, ticket.id.to_le_bytes().as_ref()],
        bump = ticket.bump,
    )]
    pub ticket: Box<Account<'info, Ticket>>,

    #[account(
        seeds = [ROUND_SEED, ticket.round.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,
}

#[derive(Accounts)]
pub struct ViewLottery<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,
}

/// Category pots of a round, including the open round's live sales.
pub fn process_get_prizes(
    ctx: Context<ViewRound>,
    _round_number: u64,
) -> Result<[u64; CATEGORY_COUNT]> {
    ctx.accounts.round.get_prizes()
}

pub fn process_get_stash(ctx: Context<ViewRound>, _round_number: u64) -> Result<u64> {
    ctx.accounts.round.get_stash()
}

pub fn process_get_ticket_prize(ctx: Context<ViewTicket>) -> Result<u64> {
    ctx.accounts.round.ticket_prize(&ctx.accounts.ticket)
}

/// The ticket's numbers in ascending order.
pub fn process_get_ticket_numbers(ctx: Context<ViewTicket>) -> Result<Vec<u8>> {
    Ok(ctx.accounts.ticket.numbers())
}

pub fn process_get_drawing_schedule(ctx: Context<ViewLottery>) -> Result<DrawingSchedule> {
    let now = Clock::get()?.unix_timestamp;
    let lottery = &ctx.accounts.lottery;
    Ok(DrawingSchedule {
        can_draw: lottery.can_draw(now),
        next_window: lottery.window.next_open(now),
        window_duration: lottery.window.duration,
    })
}
