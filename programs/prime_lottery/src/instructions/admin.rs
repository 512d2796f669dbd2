use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::{BaseTicketPriceUpdated, LotteryInitialized};
use crate::schedule::DrawingWindow;
use crate::state::{DrawingStatus, Lottery, Round};

/// Parameters for a new lottery.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct LotteryParams {
    /// Price (in the mint's smallest unit) of a 6-number ticket.
    pub base_ticket_price: u64,
    /// Any moment a drawing window opens; windows repeat weekly from it.
    pub window_anchor: i64,
    /// How long each drawing window stays open, in seconds.
    pub window_duration: i64,
    /// Program expected to own randomness accounts.
    pub coordinator: Pubkey,
}

impl Default for LotteryParams {
    fn default() -> Self {
        Self {
            base_ticket_price: 0,
            window_anchor: DEFAULT_WINDOW_ANCHOR,
            window_duration: DEFAULT_WINDOW_DURATION,
            coordinator: Pubkey::default(),
        }
    }
}

/// Accounts required to create the lottery, its token vault and round 1.
#[derive(Accounts)]
pub struct InitializeLottery<'info> {
    /// Becomes the lottery authority and pays for account creation.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + Lottery::INIT_SPACE,
        seeds = [LOTTERY_SEED],
        bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// Mint tickets are paid in.
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account holding every pot, owned by the lottery PDA.
    #[account(
        init,
        payer = authority,
        seeds = [VAULT_SEED],
        bump,
        token::mint = mint,
        token::authority = lottery,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        space = Round::space(0, 0),
        seeds = [ROUND_SEED, 1u64.to_le_bytes().as_ref()],
        bump
    )]
    pub round: Box<Account<'info, Round>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Creates the lottery account and opens round 1 with empty pots.
///
/// # Arguments
/// * `ctx` - Context holding the InitializeLottery accounts
/// * `params` - Ticket price, drawing window and randomness coordinator
pub fn process_initialize_lottery(
    ctx: Context<InitializeLottery>,
    params: LotteryParams,
) -> Result<()> {
    require!(params.base_ticket_price > 0, LotteryError::InvalidConfig);
    require_keys_neq!(params.coordinator, Pubkey::default(), LotteryError::InvalidConfig);
    let window = DrawingWindow::new(params.window_anchor, params.window_duration)?;

    let lottery = &mut ctx.accounts.lottery;
    lottery.bump = ctx.bumps.lottery;
    lottery.vault_bump = ctx.bumps.vault;
    lottery.authority = ctx.accounts.authority.key();
    lottery.mint = ctx.accounts.mint.key();
    lottery.coordinator = params.coordinator;
    lottery.base_ticket_price = params.base_ticket_price;
    lottery.current_round = 1;
    lottery.ticket_count = 0;
    lottery.status = DrawingStatus::Open;
    lottery.request_count = 0;
    lottery.pending_request = 0;
    lottery.randomness_account = Pubkey::default();
    lottery.window = window;
    lottery.drawing_window_start = 0;
    lottery.last_drawing_window = None;

    ctx.accounts.round.set_inner(Round::new(
        1,
        ctx.bumps.round,
        params.base_ticket_price,
        1,
        [0; CATEGORY_COUNT],
        0,
    ));

    msg!(
        "Lottery initialized, ticket price {}, window every {}s from {} for {}s",
        params.base_ticket_price,
        WINDOW_PERIOD,
        window.anchor,
        window.duration
    );

    emit!(LotteryInitialized {
        authority: lottery.authority,
        mint: lottery.mint,
        coordinator: lottery.coordinator,
        base_ticket_price: lottery.base_ticket_price,
        window_anchor: window.anchor,
        window_duration: window.duration,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetBaseTicketPrice<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,
}

/// Sets the ticket price used by rounds opened after the current one.
pub fn process_set_base_ticket_price(ctx: Context<SetBaseTicketPrice>, price: u64) -> Result<()> {
    let lottery = &mut ctx.accounts.lottery;
    lottery.require_authority(&ctx.accounts.authority.key())?;
    require!(price > 0, LotteryError::InvalidAmount);

    let previous = lottery.base_ticket_price;
    lottery.base_ticket_price = price;

    emit!(BaseTicketPriceUpdated {
        previous,
        price,
        effective_round: lottery.current_round + 1,
    });

    Ok(())
}
