use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::DrawFinalized;
use crate::randomness::derive_numbers;
use crate::state::{Lottery, Round};
use crate::vault;

/// Accounts required to finish a drawing once randomness is revealed.
///
/// This ensures that:
/// 1. The randomness account is owned by the coordinator.
/// 2. It is the account committed by the pending request.
/// 3. The revealed value is available for the current slot.
#[derive(Accounts)]
pub struct FulfillDrawing<'info> {
    /// Pays for the next round account.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    #[account(
        mut,
        seeds = [ROUND_SEED, lottery.current_round.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,

    #[account(
        init,
        payer = payer,
        space = Round::space(0, 0),
        seeds = [ROUND_SEED, (lottery.current_round + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub next_round: Box<Account<'info, Round>>,

    /// The randomness oracle account providing verifiable randomness.
    /// CHECK: Owner and data are validated within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    #[account(address = lottery.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = lottery.vault_bump,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the owner revenue of the closed round.
    #[account(
        mut,
        token::mint = mint,
        token::authority = lottery.authority,
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Draws the numbers, settles the current round and opens the next one.
///
/// # Arguments
/// * `ctx` - Context containing FulfillDrawing accounts
/// * `request_id` - Id returned when the drawing was requested
pub fn process_fulfill_drawing(ctx: Context<FulfillDrawing>, request_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let randomness = &ctx.accounts.randomness_account_data;
    let lottery = &mut ctx.accounts.lottery;
    let round = &mut ctx.accounts.round;

    require_keys_eq!(
        *randomness.owner,
        lottery.coordinator,
        LotteryError::OnlyCoordinator
    );
    lottery.check_fulfillment(request_id, &randomness.key())?;

    let revealed_random_value = {
        let randomness_data = RandomnessAccountData::parse(randomness.data.borrow())
            .map_err(|_| error!(LotteryError::IncorrectRandomnessAccount))?;
        randomness_data
            .get_value(&clock)
            .map_err(|_| error!(LotteryError::RandomnessNotResolved))?
    };

    let numbers = derive_numbers(&[revealed_random_value])?;
    msg!("Round {} numbers: {:?}", round.number, numbers);

    let settlement = Round::close(round, numbers)?;
    let next_first_ticket = lottery
        .ticket_count
        .checked_add(1)
        .ok_or(LotteryError::MathOverflow)?;
    ctx.accounts.next_round.set_inner(round.open_next(
        ctx.bumps.next_round,
        lottery.base_ticket_price,
        next_first_ticket,
    )?);
    lottery.complete_drawing()?;

    if settlement.owner_revenue > 0 {
        vault::payout(
            &ctx.accounts.token_program,
            &ctx.accounts.mint,
            &ctx.accounts.vault,
            &ctx.accounts.owner_token_account,
            lottery,
            settlement.owner_revenue,
        )?;
    }

    msg!(
        "Winners: {:?}, prizes: {:?}, owner revenue: {}",
        settlement.winners,
        settlement.prizes,
        settlement.owner_revenue
    );

    emit!(DrawFinalized {
        round: round.number,
        total_combinations: round.total_combinations,
        numbers: settlement.numbers,
        winners: settlement.winners,
        prizes: settlement.prizes,
        stash: settlement.stash,
        owner_revenue: settlement.owner_revenue,
    });

    Ok(())
}
