use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::DrawCancelled;
use crate::state::Lottery;

#[derive(Accounts)]
pub struct CancelFailedDrawing<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,

    /// The randomness account committed by the pending drawing.
    /// CHECK: Matched against the lottery; its data is read within the handler.
    #[account(address = lottery.randomness_account @ LotteryError::RequestMismatch)]
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Reopens sales on the same round when randomness never arrived within
/// the drawing window. The next window can then request a new drawing.
pub fn process_cancel_failed_drawing(ctx: Context<CancelFailedDrawing>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;
    let randomness = &ctx.accounts.randomness_account_data;

    lottery.require_authority(&ctx.accounts.authority.key())?;

    // An account the coordinator no longer owns, or cannot parse, can never
    // deliver a value.
    let revealed = *randomness.owner == lottery.coordinator
        && RandomnessAccountData::parse(randomness.data.borrow())
            .map(|data| data.reveal_slot != 0)
            .unwrap_or(false);
    if revealed {
        msg!("Randomness for drawing {} was already revealed", lottery.pending_request);
    }

    let request_id = lottery.cancel_drawing(clock.unix_timestamp, revealed)?;

    msg!(
        "Drawing {} for round {} cancelled",
        request_id,
        lottery.current_round
    );

    emit!(DrawCancelled {
        round: lottery.current_round,
        request_id,
    });

    Ok(())
}
