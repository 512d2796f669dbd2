use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::DrawRequested;
use crate::state::Lottery;

/// Accounts required to start a drawing by committing a randomness account.
///
/// Ensures:
/// 1. Only the authority of the lottery can start a drawing.
/// 2. The randomness account belongs to the coordinator and has not been revealed yet.
#[derive(Accounts)]
pub struct RequestDrawing<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,

    /// Randomness account from Switchboard.
    /// CHECK: Owner and data are validated within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Closes sales and records the randomness account the drawing will be
/// fulfilled from. The value itself is revealed in a later transaction.
pub fn process_request_drawing(ctx: Context<RequestDrawing>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;
    let randomness = &ctx.accounts.randomness_account_data;

    lottery.require_authority(&ctx.accounts.authority.key())?;
    require_keys_eq!(
        *randomness.owner,
        lottery.coordinator,
        LotteryError::OnlyCoordinator
    );

    let randomness_data = RandomnessAccountData::parse(randomness.data.borrow())
        .map_err(|_| error!(LotteryError::IncorrectRandomnessAccount))?;
    if randomness_data.seed_slot != clock.slot.saturating_sub(1) {
        msg!(
            "Randomness seeded at slot {}, current slot {}",
            randomness_data.seed_slot,
            clock.slot
        );
        return err!(LotteryError::RandomnessAlreadyRevealed);
    }

    let request_id = lottery.begin_drawing(clock.unix_timestamp, randomness.key())?;

    msg!(
        "Drawing {} requested for round {}",
        request_id,
        lottery.current_round
    );

    emit!(DrawRequested {
        round: lottery.current_round,
        request_id,
        randomness_account: randomness.key(),
    });

    Ok(())
}
