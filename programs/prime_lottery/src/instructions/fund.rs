use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::events::Funded;
use crate::state::{Lottery, Round};
use crate::vault;

#[derive(Accounts)]
pub struct Fund<'info> {
    pub funder: Signer<'info>,

    /// Written so funding is ordered against drawings.
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

    #[account(address = lottery.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = lottery.vault_bump,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = funder,
    )]
    pub funder_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Adds external money to the open round: 60/248 to the stash, the rest to
/// the jackpot.
pub fn process_fund(ctx: Context<Fund>, amount: u64) -> Result<()> {
    ctx.accounts.lottery.require_open()?;

    let round = &mut ctx.accounts.round;
    let (to_stash, to_jackpot) = round.fund(amount)?;

    vault::deposit(
        &ctx.accounts.token_program,
        &ctx.accounts.mint,
        &ctx.accounts.funder_token_account,
        &ctx.accounts.vault,
        &ctx.accounts.funder,
        amount,
    )?;

    msg!(
        "Round {} funded with {}: {} to stash, {} to jackpot",
        round.number,
        amount,
        to_stash,
        to_jackpot
    );

    emit!(Funded {
        round: round.number,
        funder: ctx.accounts.funder.key(),
        amount,
        to_stash,
        to_jackpot,
    });

    Ok(())
}
