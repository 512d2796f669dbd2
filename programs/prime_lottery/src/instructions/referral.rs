use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::{ReferralCodeClaimed, ReferralRevenueWithdrawn};
use crate::state::{Lottery, ReferralCode, ReferralPayout, Round};
use crate::vault;

#[derive(Accounts)]
#[instruction(code: u64)]
pub struct ClaimReferralCode<'info> {
    #[account(mut)]
    pub partner: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    #[account(
        init_if_needed,
        payer = partner,
        space = 8 + ReferralCode::INIT_SPACE,
        seeds = [REFERRAL_SEED, code.to_le_bytes().as_ref()],
        bump
    )]
    pub referral: Account<'info, ReferralCode>,

    pub system_program: Program<'info, System>,
}

/// Binds `code` to the signer. Codes are first come, first served.
pub fn process_claim_referral_code(ctx: Context<ClaimReferralCode>, code: u64) -> Result<()> {
    let referral = &mut ctx.accounts.referral;
    referral.claim(ctx.bumps.referral, code, ctx.accounts.partner.key())?;

    msg!("Referral code {} claimed by {}", code, referral.partner);

    emit!(ReferralCodeClaimed {
        code,
        partner: referral.partner,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(code: u64, round_number: u64)]
pub struct WithdrawReferralRevenue<'info> {
    #[account(mut)]
    pub partner: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    #[account(
        seeds = [REFERRAL_SEED, code.to_le_bytes().as_ref()],
        bump = referral.bump,
        constraint = referral.partner == partner.key() @ LotteryError::Unauthorized,
    )]
    pub referral: Box<Account<'info, ReferralCode>>,

    #[account(
        seeds = [ROUND_SEED, round_number.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,

    #[account(
        init_if_needed,
        payer = partner,
        space = 8 + ReferralPayout::INIT_SPACE,
        seeds = [
            REFERRAL_PAYOUT_SEED,
            code.to_le_bytes().as_ref(),
            round_number.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub payout: Box<Account<'info, ReferralPayout>>,

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
        token::authority = partner,
    )]
    pub partner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Pays a partner its part of a closed round's referral cut.
pub fn process_withdraw_referral_revenue(
    ctx: Context<WithdrawReferralRevenue>,
    code: u64,
    round_number: u64,
) -> Result<()> {
    let amount = ctx
        .accounts
        .payout
        .settle(ctx.bumps.payout, code, &ctx.accounts.round)?;

    vault::payout(
        &ctx.accounts.token_program,
        &ctx.accounts.mint,
        &ctx.accounts.vault,
        &ctx.accounts.partner_token_account,
        &ctx.accounts.lottery,
        amount,
    )?;

    msg!("Referral code {} withdrew {} from round {}", code, amount, round_number);

    emit!(ReferralRevenueWithdrawn {
        code,
        round: round_number,
        partner: ctx.accounts.partner.key(),
        amount,
    });

    Ok(())
}
