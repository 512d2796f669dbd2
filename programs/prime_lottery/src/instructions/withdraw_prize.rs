use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::PrizeWithdrawn;
use crate::state::{Lottery, Round, Ticket};
use crate::vault;

/// Accounts required for withdrawing a ticket's prize.
///
/// Ensures:
/// 1. Only the player who bought the ticket can withdraw.
/// 2. The round is the one the ticket was sold in.
#[derive(Accounts)]
#[instruction(ticket_id: u64)]
pub struct WithdrawPrize<'info> {
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    #[account(
        mut,
        seeds = [TICKET_SEED, ticket_id.to_le_bytes().as_ref()],
        bump = ticket.bump,
        constraint = ticket.player == player.key() @ LotteryError::Unauthorized,
    )]
    pub ticket: Box<Account<'info, Ticket>>,

    #[account(
        seeds = [ROUND_SEED, ticket.round.to_le_bytes().as_ref()],
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
        token::authority = player,
    )]
    pub player_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Pays out a ticket's winnings from a drawn round. The ticket is marked
/// withdrawn before tokens leave the vault.
///
/// # Arguments
/// * `ctx` - Context containing `WithdrawPrize` accounts
/// * `ticket_id` - Id of the ticket to cash in
pub fn process_withdraw_prize(ctx: Context<WithdrawPrize>, ticket_id: u64) -> Result<()> {
    let ticket = &mut ctx.accounts.ticket;
    let amount = ctx.accounts.round.withdraw_prize(ticket)?;

    vault::payout(
        &ctx.accounts.token_program,
        &ctx.accounts.mint,
        &ctx.accounts.vault,
        &ctx.accounts.player_token_account,
        &ctx.accounts.lottery,
        amount,
    )?;

    msg!("Ticket {} withdrew {}", ticket_id, amount);

    emit!(PrizeWithdrawn {
        ticket_id,
        player: ticket.player,
        amount,
    });

    Ok(())
}
