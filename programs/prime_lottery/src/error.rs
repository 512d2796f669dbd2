use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    #[msg("Ticket numbers are invalid")]
    InvalidNumbers,
    #[msg("Operation not allowed in the current drawing state")]
    InvalidState,
    #[msg("Round is unknown or still open")]
    InvalidRound,
    #[msg("Referral code has not been claimed")]
    InvalidReferralCode,
    #[msg("Referral code already claimed or reserved")]
    ReferralCodeExists,
    #[msg("Randomness does not match the pending request")]
    RequestMismatch,
    #[msg("Randomness must come from the coordinator")]
    OnlyCoordinator,
    #[msg("Not authorized")]
    Unauthorized,
    #[msg("Nothing to withdraw")]
    NoPrize,
    #[msg("Already withdrawn")]
    AlreadyWithdrawn,
    #[msg("Number out of range")]
    OutOfRange,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Ticket does not belong to this round or player")]
    InvalidTicket,
    #[msg("Invalid lottery configuration")]
    InvalidConfig,
    #[msg("Randomness already revealed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness not resolved")]
    RandomnessNotResolved,
    #[msg("Incorrect randomness account")]
    IncorrectRandomnessAccount,
    #[msg("Round cannot take more distinct tickets or referral codes")]
    RoundFull,
}
