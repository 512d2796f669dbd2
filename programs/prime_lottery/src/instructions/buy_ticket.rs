use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::encoding::{encode, validate_and_encode};
use crate::events::TicketCreated;
use crate::state::{Lottery, ReferralCode, Round, Ticket};
use crate::vault;

/// Accounts required to buy a lottery ticket.
/// Handles:
/// - Payment transfer into the vault
/// - Growing the round ledger when the hash or referral code is new
/// - Creating the ticket account
#[derive(Accounts)]
#[instruction(numbers: Vec<u8>, referral_code: u64)]
pub struct BuyTicket<'info> {
    /// The account paying for the ticket and owning it afterwards.
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The open round, grown by exactly the entries this ticket adds.
    #[account(
        mut,
        seeds = [ROUND_SEED, lottery.current_round.to_le_bytes().as_ref()],
        bump = round.bump,
        realloc = round.space_for_ticket(encode(&numbers).ok().as_ref(), referral_code),
        realloc::payer = player,
        realloc::zero = false,
    )]
    pub round: Box<Account<'info, Round>>,

    #[account(
        init,
        payer = player,
        space = 8 + Ticket::INIT_SPACE,
        seeds = [TICKET_SEED, (lottery.ticket_count + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub ticket: Box<Account<'info, Ticket>>,

    /// Required when `referral_code` is not `NO_REFERRAL`.
    #[account(
        seeds = [REFERRAL_SEED, referral_code.to_le_bytes().as_ref()],
        bump = referral.bump,
    )]
    pub referral: Option<Account<'info, ReferralCode>>,

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

    pub system_program: Program<'info, System>,
}

/// Buys a ticket on `numbers` for the open round.
///
/// Steps performed:
/// 1. Check that sales are open.
/// 2. Validate and encode the numbers.
/// 3. Check the referral code, if any.
/// 4. Record the ticket in the round ledger and issue its id.
/// 5. Transfer `base_ticket_price * C(n, 6)` into the vault.
///
/// # Arguments
/// * `ctx` - Context containing BuyTicket accounts
/// * `numbers` - 6 to 90 distinct numbers in 1..=90, any order
/// * `referral_code` - Claimed referral code, or `NO_REFERRAL`
pub fn process_buy_ticket(
    ctx: Context<BuyTicket>,
    numbers: Vec<u8>,
    referral_code: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;
    let round = &mut ctx.accounts.round;

    lottery.require_open()?;

    let hash = validate_and_encode(&numbers)?;
    let cardinality = numbers.len() as u8;

    let referral = ctx.accounts.referral.as_ref().map(|referral| &**referral);
    ReferralCode::verify(referral_code, referral)?;

    let price = round.ticket_price(cardinality)?;
    let combinations = round.record_ticket(&hash, cardinality, referral_code)?;
    let id = lottery.issue_ticket_id()?;

    vault::deposit(
        &ctx.accounts.token_program,
        &ctx.accounts.mint,
        &ctx.accounts.player_token_account,
        &ctx.accounts.vault,
        &ctx.accounts.player,
        price,
    )?;

    ctx.accounts.ticket.set_inner(Ticket {
        bump: ctx.bumps.ticket,
        id,
        round: round.number,
        player: ctx.accounts.player.key(),
        hash: hash.to_words(),
        cardinality,
        created_at: clock.slot,
        withdrawn: false,
    });

    let mut sorted = numbers;
    sorted.sort_unstable();
    msg!("Ticket {} in round {}: {:?}", id, round.number, sorted);

    emit!(TicketCreated {
        round: round.number,
        player: ctx.accounts.player.key(),
        id,
        numbers: sorted,
        referral_code,
        combinations,
        price,
    });

    Ok(())
}
