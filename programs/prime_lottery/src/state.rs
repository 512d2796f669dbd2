use anchor_lang::prelude::*;

use crate::constants::*;
use crate::encoding::{combinations_for, count_matches, decode, validate, TicketHash, HASH_WORDS};
use crate::error::LotteryError;
use crate::prize::{category_weights, ticket_prize};
use crate::schedule::DrawingWindow;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum DrawingStatus {
    /// Ticket sales are allowed.
    Open,
    /// Randomness was requested; sales are closed until it is delivered or
    /// the drawing is cancelled.
    Drawing,
}

#[account]
#[derive(InitSpace)]
pub struct Lottery {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Bump of the token vault PDA.
    pub vault_bump: u8,

    /// The authority allowed to trigger drawings and update the ticket price.
    /// Also receives the owner share of every round's sales.
    pub authority: Pubkey,

    /// The SPL mint tickets are paid in.
    pub mint: Pubkey,

    /// Program that must own randomness accounts (the Switchboard on-demand program).
    pub coordinator: Pubkey,

    /// Price of a 6-number ticket for rounds opened from now on.
    pub base_ticket_price: u64,

    /// Number of the open round. Rounds start at 1.
    pub current_round: u64,

    /// Id of the most recently issued ticket. Ids start at 1 and never repeat.
    pub ticket_count: u64,

    pub status: DrawingStatus,

    /// Number of drawings requested so far; the latest one is the pending request id.
    pub request_count: u64,

    /// Id of the drawing awaiting randomness, `0` when none.
    pub pending_request: u64,

    /// The randomness account committed for the pending request.
    pub randomness_account: Pubkey,

    pub window: DrawingWindow,

    /// Start of the window the pending drawing was requested in.
    pub drawing_window_start: i64,

    /// Start of the last window a drawing was requested in.
    pub last_drawing_window: Option<i64>,
}

impl Lottery {
    pub fn require_authority(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.authority, LotteryError::Unauthorized);
        Ok(())
    }

    /// Ticket sales and funding are only accepted while no drawing is pending.
    pub fn require_open(&self) -> Result<()> {
        require!(
            self.status == DrawingStatus::Open,
            LotteryError::InvalidState
        );
        Ok(())
    }

    pub fn can_draw(&self, now: i64) -> bool {
        self.status == DrawingStatus::Open
            && self.window.is_open(now)
            && self.last_drawing_window != Some(self.window.window_start(now))
    }

    /// Moves to `Drawing` and returns the new request id.
    pub fn begin_drawing(&mut self, now: i64, randomness_account: Pubkey) -> Result<u64> {
        require!(self.can_draw(now), LotteryError::InvalidState);

        let request_id = self
            .request_count
            .checked_add(1)
            .ok_or(LotteryError::MathOverflow)?;
        let window_start = self.window.window_start(now);

        self.request_count = request_id;
        self.pending_request = request_id;
        self.randomness_account = randomness_account;
        self.drawing_window_start = window_start;
        self.last_drawing_window = Some(window_start);
        self.status = DrawingStatus::Drawing;
        Ok(request_id)
    }

    /// Abandons a drawing whose randomness never arrived. The round stays open.
    /// A revealed value must be fulfilled, never cancelled.
    pub fn cancel_drawing(&mut self, now: i64, randomness_revealed: bool) -> Result<u64> {
        require!(
            self.status == DrawingStatus::Drawing
                && self.window.has_elapsed(self.drawing_window_start, now)
                && !randomness_revealed,
            LotteryError::InvalidState
        );
        let request_id = self.pending_request;
        self.status = DrawingStatus::Open;
        self.pending_request = 0;
        self.randomness_account = Pubkey::default();
        Ok(request_id)
    }

    pub fn check_fulfillment(&self, request_id: u64, randomness_account: &Pubkey) -> Result<()> {
        require!(
            self.status == DrawingStatus::Drawing,
            LotteryError::InvalidState
        );
        require!(
            request_id == self.pending_request && *randomness_account == self.randomness_account,
            LotteryError::RequestMismatch
        );
        Ok(())
    }

    /// Reopens sales on the next round after a successful drawing.
    pub fn complete_drawing(&mut self) -> Result<u64> {
        self.current_round = self
            .current_round
            .checked_add(1)
            .ok_or(LotteryError::MathOverflow)?;
        self.status = DrawingStatus::Open;
        self.pending_request = 0;
        self.randomness_account = Pubkey::default();
        Ok(self.current_round)
    }

    pub fn issue_ticket_id(&mut self) -> Result<u64> {
        self.ticket_count = self
            .ticket_count
            .checked_add(1)
            .ok_or(LotteryError::MathOverflow)?;
        Ok(self.ticket_count)
    }
}

/// One distinct ticket hash sold in a round and how many times it was sold.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TicketIndexEntry {
    pub hash: [u64; HASH_WORDS],
    pub cardinality: u8,
    pub count: u32,
}

impl TicketIndexEntry {
    pub const SIZE: usize = HASH_WORDS * 8 + 1 + 4;
}

/// Combinations sold under one referral code.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralTally {
    pub code: u64,
    pub combinations: u64,
}

impl ReferralTally {
    pub const SIZE: usize = 8 + 8;
}

/// How one round's gross sales are divided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SalesSplit {
    pub owner_cut: u64,
    pub referral_cut: u64,
    pub per_category: u64,
    pub stash: u64,
}

impl SalesSplit {
    /// 10% owner, 10% referrals, then 18.8% of the remainder to each of the five
    /// categories. Whatever the categories leave goes to the stash, so the four
    /// parts always add back up to `value`.
    pub fn of(value: u128) -> Result<Self> {
        let fee = value / FEE_DIVISOR;
        let remaining = value - fee * 2;
        let per_category = remaining * CATEGORY_SHARE_PER_MILLE / PER_MILLE;
        let stash = remaining - per_category * CATEGORY_COUNT as u128;
        Ok(Self {
            owner_cut: to_u64(fee)?,
            referral_cut: to_u64(fee)?,
            per_category: to_u64(per_category)?,
            stash: to_u64(stash)?,
        })
    }
}

/// Result of closing a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub numbers: [u8; DRAWN_NUMBERS],
    pub prizes: [u64; CATEGORY_COUNT],
    pub winners: [u64; CATEGORY_COUNT],
    pub stash: u64,
    /// Amount owed to the lottery authority right away.
    pub owner_revenue: u64,
}

fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(LotteryError::MathOverflow))
}

/// Round ledger. The open round keeps only the pots inherited from earlier
/// rounds and funding in `prizes`/`stash`; its own sales are added on read
/// and frozen into those fields when the round closes.
#[account]
#[derive(Debug)]
pub struct Round {
    pub bump: u8,
    pub number: u64,
    /// Price of a 6-number ticket, fixed when the round opens.
    pub base_ticket_price: u64,
    /// Pots for 2, 3, 4, 5 and 6 matches.
    pub prizes: [u64; CATEGORY_COUNT],
    pub stash: u64,
    pub total_combinations: u64,
    /// Drawn numbers, zero until the round closes.
    pub numbers: [u8; DRAWN_NUMBERS],
    /// Winning combinations per category, set when the round closes.
    pub winners: [u64; CATEGORY_COUNT],
    pub first_ticket_id: u64,
    pub ticket_count: u64,
    pub owner_revenue: u64,
    /// Referral cut of this round's sales, shared by combinations sold per code.
    pub referral_revenue: u64,
    pub closed: bool,
    pub ticket_index: Vec<TicketIndexEntry>,
    /// Code `NO_REFERRAL` collects sales without a partner.
    pub referrals: Vec<ReferralTally>,
}

impl Round {
    const FIXED_SIZE: usize = 1 + 8 + 8 + 8 * CATEGORY_COUNT + 8 + 8 + DRAWN_NUMBERS
        + 8 * CATEGORY_COUNT + 8 + 8 + 8 + 8 + 1;

    /// Account size (with discriminator) for the given vector lengths.
    pub const fn space(entries: usize, referrals: usize) -> usize {
        8 + Self::FIXED_SIZE
            + 4 + entries * TicketIndexEntry::SIZE
            + 4 + referrals * ReferralTally::SIZE
    }

    /// Account size after recording a ticket with `hash` under `referral_code`.
    /// Only a hash or code the round has not seen yet adds an entry. With no
    /// hash (unencodable numbers) the size is unchanged.
    pub fn space_for_ticket(&self, hash: Option<&TicketHash>, referral_code: u64) -> usize {
        let new_entry = hash.map_or(false, |hash| self.index_position(hash).is_none());
        let new_referral = hash.is_some() && self.tally_position(referral_code).is_none();
        Self::space(
            self.ticket_index.len() + new_entry as usize,
            self.referrals.len() + new_referral as usize,
        )
    }

    fn index_position(&self, hash: &TicketHash) -> Option<usize> {
        let words = hash.to_words();
        self.ticket_index.iter().position(|entry| entry.hash == words)
    }

    fn tally_position(&self, code: u64) -> Option<usize> {
        self.referrals.iter().position(|tally| tally.code == code)
    }

    pub fn new(
        number: u64,
        bump: u8,
        base_ticket_price: u64,
        first_ticket_id: u64,
        prizes: [u64; CATEGORY_COUNT],
        stash: u64,
    ) -> Self {
        Self {
            bump,
            number,
            base_ticket_price,
            prizes,
            stash,
            total_combinations: 0,
            numbers: [0; DRAWN_NUMBERS],
            winners: [0; CATEGORY_COUNT],
            first_ticket_id,
            ticket_count: 0,
            owner_revenue: 0,
            referral_revenue: 0,
            closed: false,
            ticket_index: Vec::new(),
            referrals: Vec::new(),
        }
    }

    /// Gross sales of the round.
    pub fn sales_value(&self) -> u128 {
        self.base_ticket_price as u128 * self.total_combinations as u128
    }

    pub fn ticket_price(&self, cardinality: u8) -> Result<u64> {
        self.base_ticket_price
            .checked_mul(combinations_for(cardinality))
            .ok_or_else(|| error!(LotteryError::MathOverflow))
    }

    /// Category pots including the open round's own sales.
    pub fn get_prizes(&self) -> Result<[u64; CATEGORY_COUNT]> {
        if self.closed {
            return Ok(self.prizes);
        }
        let split = SalesSplit::of(self.sales_value())?;
        let mut prizes = self.prizes;
        for prize in prizes.iter_mut() {
            *prize = prize
                .checked_add(split.per_category)
                .ok_or(LotteryError::MathOverflow)?;
        }
        Ok(prizes)
    }

    pub fn get_stash(&self) -> Result<u64> {
        if self.closed {
            return Ok(self.stash);
        }
        let split = SalesSplit::of(self.sales_value())?;
        self.stash
            .checked_add(split.stash)
            .ok_or_else(|| error!(LotteryError::MathOverflow))
    }

    /// External funding: 60/248 to the stash, the rest to the jackpot.
    /// Returns `(to_stash, to_jackpot)`.
    pub fn fund(&mut self, amount: u64) -> Result<(u64, u64)> {
        require!(!self.closed, LotteryError::InvalidRound);
        require!(amount > 0, LotteryError::InvalidAmount);

        let to_stash = to_u64(amount as u128 * FUND_STASH_NUMERATOR / FUND_DENOMINATOR)?;
        let to_jackpot = amount - to_stash;
        self.stash = self
            .stash
            .checked_add(to_stash)
            .ok_or(LotteryError::MathOverflow)?;
        self.prizes[JACKPOT] = self.prizes[JACKPOT]
            .checked_add(to_jackpot)
            .ok_or(LotteryError::MathOverflow)?;
        Ok((to_stash, to_jackpot))
    }

    /// Adds a sold ticket to the round's totals and index. Returns the number
    /// of combinations it covers.
    pub fn record_ticket(
        &mut self,
        hash: &TicketHash,
        cardinality: u8,
        referral_code: u64,
    ) -> Result<u64> {
        require!(!self.closed, LotteryError::InvalidState);
        let combinations = combinations_for(cardinality);
        require!(combinations > 0, LotteryError::InvalidNumbers);

        let total_combinations = self
            .total_combinations
            .checked_add(combinations)
            .ok_or(LotteryError::MathOverflow)?;
        // Sales must still be representable once multiplied by the price.
        let value = self.base_ticket_price as u128 * total_combinations as u128;
        to_u64(value)?;
        let ticket_count = self
            .ticket_count
            .checked_add(1)
            .ok_or(LotteryError::MathOverflow)?;

        let entry = self.index_position(hash);
        let tally = self.tally_position(referral_code);
        if entry.is_none() && self.ticket_index.len() >= MAX_TICKET_INDEX_ENTRIES {
            msg!(
                "Round {} already holds {} distinct tickets",
                self.number,
                MAX_TICKET_INDEX_ENTRIES
            );
            return err!(LotteryError::RoundFull);
        }
        if tally.is_none() && self.referrals.len() >= MAX_REFERRAL_TALLIES {
            msg!(
                "Round {} already holds {} referral codes",
                self.number,
                MAX_REFERRAL_TALLIES
            );
            return err!(LotteryError::RoundFull);
        }

        match tally {
            Some(i) => {
                let tally = &mut self.referrals[i];
                tally.combinations = tally
                    .combinations
                    .checked_add(combinations)
                    .ok_or(LotteryError::MathOverflow)?
            }
            None => {
                self.referrals.reserve_exact(1);
                self.referrals.push(ReferralTally {
                    code: referral_code,
                    combinations,
                })
            }
        }

        match entry {
            Some(i) => {
                let entry = &mut self.ticket_index[i];
                entry.count = entry.count.checked_add(1).ok_or(LotteryError::MathOverflow)?
            }
            None => {
                self.ticket_index.reserve_exact(1);
                self.ticket_index.push(TicketIndexEntry {
                    hash: hash.to_words(),
                    cardinality,
                    count: 1,
                })
            }
        }

        self.total_combinations = total_combinations;
        self.ticket_count = ticket_count;
        Ok(combinations)
    }

    pub fn referral_combinations(&self, code: u64) -> u64 {
        self.referrals
            .iter()
            .find(|t| t.code == code)
            .map_or(0, |t| t.combinations)
    }

    /// A partner's part of the referral cut, by combinations sold under its code.
    pub fn partner_share(&self, code: u64) -> Result<u64> {
        require!(self.closed, LotteryError::InvalidRound);
        share_of(
            self.referral_revenue,
            self.referral_combinations(code),
            self.total_combinations,
        )
    }

    /// Winning combinations per category across every ticket sold.
    pub fn count_winners(&self, numbers: &[u8; DRAWN_NUMBERS]) -> Result<[u64; CATEGORY_COUNT]> {
        let mut winners = [0u64; CATEGORY_COUNT];
        for entry in &self.ticket_index {
            let matches = count_matches(&TicketHash::from_words(entry.hash), numbers)?;
            let weights = category_weights(entry.cardinality, matches);
            for (winner, weight) in winners.iter_mut().zip(weights) {
                let won = weight
                    .checked_mul(entry.count as u64)
                    .ok_or(LotteryError::MathOverflow)?;
                *winner = winner.checked_add(won).ok_or(LotteryError::MathOverflow)?;
            }
        }
        Ok(winners)
    }

    /// Freezes pots and stash, records the drawn numbers and winners, and
    /// works out the owner's revenue.
    pub fn close(&mut self, numbers: [u8; DRAWN_NUMBERS]) -> Result<Settlement> {
        require!(!self.closed, LotteryError::InvalidState);
        validate(&numbers)?;

        let prizes = self.get_prizes()?;
        let stash = self.get_stash()?;
        let winners = self.count_winners(&numbers)?;
        let split = SalesSplit::of(self.sales_value())?;

        let mut partner_total: u64 = 0;
        for tally in self.referrals.iter().filter(|t| t.code != NO_REFERRAL) {
            let share = share_of(split.referral_cut, tally.combinations, self.total_combinations)?;
            partner_total = partner_total
                .checked_add(share)
                .ok_or(LotteryError::MathOverflow)?;
        }
        let owner_revenue = split
            .referral_cut
            .checked_sub(partner_total)
            .and_then(|dust| dust.checked_add(split.owner_cut))
            .ok_or(LotteryError::MathOverflow)?;

        self.prizes = prizes;
        self.stash = stash;
        self.numbers = numbers;
        self.winners = winners;
        self.owner_revenue = owner_revenue;
        self.referral_revenue = split.referral_cut;
        self.closed = true;

        Ok(Settlement {
            numbers,
            prizes,
            winners,
            stash,
            owner_revenue,
        })
    }

    /// The round that follows this closed one. Pots without winners roll
    /// over; the stash seeds the jackpot only after the jackpot was won.
    pub fn open_next(
        &self,
        bump: u8,
        base_ticket_price: u64,
        first_ticket_id: u64,
    ) -> Result<Round> {
        require!(self.closed, LotteryError::InvalidRound);
        let number = self.number.checked_add(1).ok_or(LotteryError::MathOverflow)?;

        let mut prizes = [0u64; CATEGORY_COUNT];
        for i in 0..JACKPOT {
            if self.winners[i] == 0 {
                prizes[i] = self.prizes[i];
            }
        }
        let stash = if self.winners[JACKPOT] > 0 {
            prizes[JACKPOT] = self.stash;
            0
        } else {
            prizes[JACKPOT] = self.prizes[JACKPOT];
            self.stash
        };

        Ok(Round::new(number, bump, base_ticket_price, first_ticket_id, prizes, stash))
    }

    /// What `ticket` pays out of this round.
    pub fn ticket_prize(&self, ticket: &Ticket) -> Result<u64> {
        require!(self.closed, LotteryError::InvalidRound);
        require!(ticket.round == self.number, LotteryError::InvalidTicket);
        let matches = count_matches(&ticket.hash(), &self.numbers)?;
        ticket_prize(ticket.cardinality, matches, &self.prizes, &self.winners)
    }

    /// Marks `ticket` withdrawn and returns its prize. A ticket without a
    /// prize is refused before the withdrawal flag is looked at.
    pub fn withdraw_prize(&self, ticket: &mut Ticket) -> Result<u64> {
        let amount = self.ticket_prize(ticket)?;
        require!(amount > 0, LotteryError::NoPrize);
        ticket.mark_withdrawn()?;
        Ok(amount)
    }

    pub fn contains_ticket(&self, id: u64) -> bool {
        id >= self.first_ticket_id && id - self.first_ticket_id < self.ticket_count
    }
}

fn share_of(amount: u64, part: u64, whole: u64) -> Result<u64> {
    if whole == 0 {
        return Ok(0);
    }
    to_u64(amount as u128 * part as u128 / whole as u128)
}

#[account]
#[derive(InitSpace)]
pub struct Ticket {
    pub bump: u8,
    pub id: u64,
    pub round: u64,
    pub player: Pubkey,
    /// Prime product of the chosen numbers, little-endian words.
    pub hash: [u64; HASH_WORDS],
    pub cardinality: u8,
    /// Slot the ticket was bought in.
    pub created_at: u64,
    pub withdrawn: bool,
}

impl Ticket {
    pub fn hash(&self) -> TicketHash {
        TicketHash::from_words(self.hash)
    }

    pub fn numbers(&self) -> Vec<u8> {
        decode(&self.hash())
    }

    pub fn mark_withdrawn(&mut self) -> Result<()> {
        require!(!self.withdrawn, LotteryError::AlreadyWithdrawn);
        self.withdrawn = true;
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct ReferralCode {
    pub bump: u8,
    pub code: u64,
    /// Account that claimed the code and collects its share.
    pub partner: Pubkey,
}

impl ReferralCode {
    /// Binds a fresh (zeroed) code account to `partner`.
    pub fn claim(&mut self, bump: u8, code: u64, partner: Pubkey) -> Result<()> {
        require!(code != NO_REFERRAL, LotteryError::ReferralCodeExists);
        require_keys_eq!(self.partner, Pubkey::default(), LotteryError::ReferralCodeExists);
        self.bump = bump;
        self.code = code;
        self.partner = partner;
        Ok(())
    }

    /// A ticket sold under `code` needs the claimed account for it, unless
    /// the code is `NO_REFERRAL`.
    pub fn verify(code: u64, referral: Option<&ReferralCode>) -> Result<()> {
        if code == NO_REFERRAL {
            return Ok(());
        }
        match referral {
            Some(referral) if referral.code == code && referral.partner != Pubkey::default() => {
                Ok(())
            }
            _ => err!(LotteryError::InvalidReferralCode),
        }
    }
}

/// Tracks a partner's withdrawal for one round.
#[account]
#[derive(InitSpace)]
pub struct ReferralPayout {
    pub bump: u8,
    pub code: u64,
    pub round: u64,
    pub amount: u64,
    pub withdrawn: bool,
}

impl ReferralPayout {
    /// Records the partner's withdrawal from `round` and returns the amount.
    pub fn settle(&mut self, bump: u8, code: u64, round: &Round) -> Result<u64> {
        let amount = round.partner_share(code)?;
        require!(amount > 0, LotteryError::NoPrize);
        require!(!self.withdrawn, LotteryError::AlreadyWithdrawn);
        self.bump = bump;
        self.code = code;
        self.round = round.number;
        self.amount = amount;
        self.withdrawn = true;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::validate_and_encode;
    use crate::prize::binomial;
    use crate::schedule::DrawingWindow;

    const PRICE: u64 = 1_000;
    const SATURDAY_8PM: i64 = 1_717_272_000;
    const HOUR: i64 = 60 * 60;

    fn open_round() -> Round {
        Round::new(1, 255, PRICE, 1, [0; CATEGORY_COUNT], 0)
    }

    fn buy(round: &mut Round, id: u64, numbers: &[u8], code: u64) -> Ticket {
        let hash = validate_and_encode(numbers).unwrap();
        round.record_ticket(&hash, numbers.len() as u8, code).unwrap();
        Ticket {
            bump: 255,
            id,
            round: round.number,
            player: Pubkey::new_unique(),
            hash: hash.to_words(),
            cardinality: numbers.len() as u8,
            created_at: id,
            withdrawn: false,
        }
    }

    fn lottery() -> Lottery {
        Lottery {
            bump: 255,
            vault_bump: 254,
            authority: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            coordinator: Pubkey::new_unique(),
            base_ticket_price: PRICE,
            current_round: 1,
            ticket_count: 0,
            status: DrawingStatus::Open,
            request_count: 0,
            pending_request: 0,
            randomness_account: Pubkey::default(),
            window: DrawingWindow::new(DEFAULT_WINDOW_ANCHOR, DEFAULT_WINDOW_DURATION).unwrap(),
            drawing_window_start: 0,
            last_drawing_window: None,
        }
    }

    #[test]
    fn test_round_size() {
        let mut round = open_round();
        assert_eq!(round.try_to_vec().unwrap().len() + 8, Round::space(0, 0));
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        buy(&mut round, 2, &[1, 2, 3, 4, 5, 6, 7], 42);
        assert_eq!(round.try_to_vec().unwrap().len() + 8, Round::space(2, 2));
    }

    #[test]
    fn test_space_grows_only_for_new_entries() {
        let mut round = open_round();
        let six = validate_and_encode(&[1, 2, 3, 4, 5, 6]).unwrap();
        let seven = validate_and_encode(&[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(round.space_for_ticket(Some(&six), NO_REFERRAL), Round::space(1, 1));

        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        assert_eq!(round.space_for_ticket(Some(&six), NO_REFERRAL), Round::space(1, 1));
        assert_eq!(round.space_for_ticket(Some(&six), 9), Round::space(1, 2));
        assert_eq!(round.space_for_ticket(Some(&seven), NO_REFERRAL), Round::space(2, 1));
        assert_eq!(round.space_for_ticket(None, 9), Round::space(1, 1));

        // The account after each purchase is exactly as large as its contents.
        buy(&mut round, 2, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        assert_eq!(round.try_to_vec().unwrap().len() + 8, Round::space(1, 1));
    }

    #[test]
    fn test_distinct_tickets_are_capped() {
        let mut round = open_round();
        let tickets: Vec<Vec<u8>> = (5..=89u8)
            .flat_map(|a| (a + 1..=90).map(move |b| vec![1, 2, 3, 4, a, b]))
            .take(MAX_TICKET_INDEX_ENTRIES + 1)
            .collect();
        for (i, numbers) in tickets[..MAX_TICKET_INDEX_ENTRIES].iter().enumerate() {
            buy(&mut round, i as u64 + 1, numbers, NO_REFERRAL);
        }
        assert_eq!(round.ticket_index.len(), MAX_TICKET_INDEX_ENTRIES);

        let extra = validate_and_encode(&tickets[MAX_TICKET_INDEX_ENTRIES]).unwrap();
        assert_eq!(
            round.record_ticket(&extra, 6, NO_REFERRAL).unwrap_err(),
            error!(LotteryError::RoundFull)
        );
        assert_eq!(round.ticket_count, MAX_TICKET_INDEX_ENTRIES as u64);
        assert_eq!(round.total_combinations, MAX_TICKET_INDEX_ENTRIES as u64);

        // Copies of hashes already sold are still accepted.
        buy(&mut round, 100, &tickets[0], NO_REFERRAL);
        assert_eq!(round.ticket_index[0].count, 2);

        // [1..=6] twice hits the jackpot, every other ticket matches five.
        let settlement = round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(settlement.winners, [0, 0, 0, MAX_TICKET_INDEX_ENTRIES as u64 - 1, 2]);
    }

    #[test]
    fn test_referral_codes_are_capped() {
        let mut round = open_round();
        let hash = validate_and_encode(&[1, 2, 3, 4, 5, 6]).unwrap();
        for code in 1..=MAX_REFERRAL_TALLIES as u64 {
            round.record_ticket(&hash, 6, code).unwrap();
        }
        assert_eq!(
            round.record_ticket(&hash, 6, NO_REFERRAL).unwrap_err(),
            error!(LotteryError::RoundFull)
        );
        round.record_ticket(&hash, 6, 1).unwrap();
        assert_eq!(round.referral_combinations(1), 2);
    }

    #[test]
    fn test_ticket_size() {
        let mut round = open_round();
        let ticket = buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        assert_eq!(ticket.try_to_vec().unwrap().len(), Ticket::INIT_SPACE);
    }

    #[test]
    fn test_sales_split_accounts_for_every_unit() {
        for value in [0u128, 1, 9, 10, 999, 1_000, 123_456_789, u64::MAX as u128] {
            let split = SalesSplit::of(value).unwrap();
            let total = split.owner_cut as u128
                + split.referral_cut as u128
                + split.per_category as u128 * CATEGORY_COUNT as u128
                + split.stash as u128;
            assert_eq!(total, value);
        }
        let split = SalesSplit::of(1_000).unwrap();
        assert_eq!(
            split,
            SalesSplit {
                owner_cut: 100,
                referral_cut: 100,
                per_category: 150,
                stash: 50,
            }
        );
    }

    #[test]
    fn test_stash_view_matches_unassigned_remainder() {
        let mut round = open_round();
        buy(&mut round, 1, &(1..=9).collect::<Vec<u8>>(), NO_REFERRAL);
        let value = round.sales_value();
        assert_eq!(value, PRICE as u128 * 84);
        let prizes = round.get_prizes().unwrap();
        let stash = round.get_stash().unwrap();
        let fees = (value / 10) * 2;
        let assigned: u128 = prizes.iter().map(|&p| p as u128).sum();
        assert_eq!(stash as u128, value - fees - assigned);
        assert_eq!(prizes[0] as u128, (value - fees) * 188 / 1000);
    }

    #[test]
    fn test_ticket_price_scales_with_combinations() {
        let round = open_round();
        assert_eq!(round.ticket_price(6).unwrap(), PRICE);
        assert_eq!(round.ticket_price(7).unwrap(), 7 * PRICE);
        assert_eq!(round.ticket_price(8).unwrap(), 28 * PRICE);
    }

    #[test]
    fn test_record_ticket_tracks_index_and_referrals() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        buy(&mut round, 2, &[6, 5, 4, 3, 2, 1], 7);
        buy(&mut round, 3, &[1, 2, 3, 4, 5, 6, 7], 7);
        assert_eq!(round.total_combinations, 9);
        assert_eq!(round.ticket_count, 3);
        assert_eq!(round.ticket_index.len(), 2);
        assert_eq!(round.ticket_index[0].count, 2);
        assert_eq!(round.referral_combinations(NO_REFERRAL), 1);
        assert_eq!(round.referral_combinations(7), 8);
        assert_eq!(round.referral_combinations(8), 0);
        assert!(round.contains_ticket(1) && round.contains_ticket(3));
        assert!(!round.contains_ticket(4) && !round.contains_ticket(0));
    }

    #[test]
    fn test_single_jackpot_winner_takes_jackpot() {
        let mut round = open_round();
        let ticket = buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        assert_eq!(
            round.ticket_prize(&ticket).unwrap_err(),
            error!(LotteryError::InvalidRound)
        );

        let settlement = round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(settlement.winners, [0, 0, 0, 0, 1]);
        assert_eq!(settlement.prizes, [150; CATEGORY_COUNT]);
        assert_eq!(settlement.stash, 50);
        assert_eq!(settlement.owner_revenue, 200);
        assert_eq!(round.ticket_prize(&ticket).unwrap(), round.prizes[JACKPOT]);
    }

    #[test]
    fn test_seven_number_ticket_winner_counts() {
        let ticket: Vec<u8> = (1..=7).collect();
        for matches in 0..=6usize {
            let mut round = open_round();
            buy(&mut round, 1, &ticket, NO_REFERRAL);
            let mut drawn = [0u8; DRAWN_NUMBERS];
            for (i, n) in drawn.iter_mut().enumerate() {
                *n = if i < matches { i as u8 + 1 } else { 50 + i as u8 };
            }
            let settlement = round.close(drawn).unwrap();
            for k in 2..=6usize {
                let expected = if k <= matches {
                    binomial(matches as u64, k as u64) * binomial(7 - matches as u64, 6 - k as u64)
                } else {
                    0
                };
                assert_eq!(settlement.winners[k - 2], expected, "matches {matches}, category {k}");
            }
        }
    }

    #[test]
    fn test_two_winners_split_category() {
        let mut round = open_round();
        let a = buy(&mut round, 1, &[1, 2, 10, 11, 12, 13], NO_REFERRAL);
        let b = buy(&mut round, 2, &[1, 2, 20, 21, 22, 23], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(round.winners, [2, 0, 0, 0, 0]);

        let prize_a = round.ticket_prize(&a).unwrap();
        let prize_b = round.ticket_prize(&b).unwrap();
        assert_eq!(prize_a, round.prizes[0] / 2);
        assert_eq!(prize_a, prize_b);
        assert!(prize_a + prize_b <= round.prizes[0]);
    }

    #[test]
    fn test_losing_ticket_has_no_prize() {
        let mut round = open_round();
        let ticket = buy(&mut round, 1, &[1, 20, 30, 40, 50, 60], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(round.ticket_prize(&ticket).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_tickets_share_the_index_entry() {
        let mut round = open_round();
        let a = buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        let b = buy(&mut round, 2, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(round.winners[JACKPOT], 2);
        assert_eq!(round.ticket_prize(&a).unwrap(), round.prizes[JACKPOT] / 2);
        assert_eq!(round.ticket_prize(&b).unwrap(), round.prizes[JACKPOT] / 2);
    }

    #[test]
    fn test_ticket_from_other_round_is_rejected() {
        let mut round = open_round();
        let mut ticket = buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        ticket.round = 2;
        assert_eq!(
            round.ticket_prize(&ticket).unwrap_err(),
            error!(LotteryError::InvalidTicket)
        );
    }

    #[test]
    fn test_rollover_after_jackpot_win() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();

        let next = round.open_next(254, 2 * PRICE, 2).unwrap();
        assert_eq!(next.number, 2);
        assert_eq!(next.base_ticket_price, 2 * PRICE);
        assert_eq!(next.first_ticket_id, 2);
        assert_eq!(next.prizes, [150, 150, 150, 150, 50]);
        assert_eq!(next.stash, 0);
        assert!(!next.closed);
    }

    #[test]
    fn test_rollover_without_jackpot_win() {
        let mut round = open_round();
        round.fund(10_000).unwrap();
        buy(&mut round, 1, &[1, 2, 3, 10, 11, 12], NO_REFERRAL);
        let settlement = round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(settlement.winners, [0, 1, 0, 0, 0]);

        let next = round.open_next(254, PRICE, 2).unwrap();
        assert_eq!(next.prizes[0], settlement.prizes[0]);
        assert_eq!(next.prizes[1], 0);
        assert_eq!(next.prizes[JACKPOT], settlement.prizes[JACKPOT]);
        assert_eq!(next.stash, settlement.stash);
    }

    #[test]
    fn test_funding_after_jackpot_win() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        let mut next = round.open_next(254, PRICE, 2).unwrap();
        let jackpot_before = next.prizes[JACKPOT];

        let amount = 1_234_567u64;
        let (to_stash, to_jackpot) = next.fund(amount).unwrap();
        assert_eq!(to_stash, 298_685);
        assert_eq!(to_stash as u128, amount as u128 * 60 / 248);
        assert_eq!(to_stash + to_jackpot, amount);
        assert_eq!(next.stash, to_stash);
        assert_eq!(next.prizes[JACKPOT], jackpot_before + to_jackpot);
        assert_eq!(next.get_stash().unwrap(), to_stash);
    }

    #[test]
    fn test_fund_rejects_zero_and_closed_rounds() {
        let mut round = open_round();
        assert_eq!(round.fund(0).unwrap_err(), error!(LotteryError::InvalidAmount));
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(round.fund(1).unwrap_err(), error!(LotteryError::InvalidRound));
    }

    #[test]
    fn test_referral_split_is_exact() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6, 7], 11);
        buy(&mut round, 2, &[10, 20, 30, 40, 50, 60], 11);
        buy(&mut round, 3, &[11, 21, 31, 41, 51, 61, 71, 81], 22);
        buy(&mut round, 4, &[12, 22, 32, 42, 52, 62], NO_REFERRAL);
        let value = round.sales_value();
        let settlement = round.close([80, 81, 82, 83, 84, 85]).unwrap();

        let share_11 = round.partner_share(11).unwrap();
        let share_22 = round.partner_share(22).unwrap();
        assert_eq!(share_11 as u128, round.referral_revenue as u128 * 8 / 37);
        assert_eq!(share_22 as u128, round.referral_revenue as u128 * 28 / 37);
        assert_eq!(round.partner_share(33).unwrap(), 0);

        let pots: u128 = settlement.prizes.iter().map(|&p| p as u128).sum();
        let paid = pots + settlement.stash as u128 + settlement.owner_revenue as u128
            + share_11 as u128
            + share_22 as u128;
        assert_eq!(paid, value);
    }

    #[test]
    fn test_partner_share_requires_closed_round() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], 5);
        assert_eq!(round.partner_share(5).unwrap_err(), error!(LotteryError::InvalidRound));
    }

    #[test]
    fn test_close_rejects_invalid_draws() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        let invalid = error!(LotteryError::InvalidNumbers);
        assert_eq!(round.close([0, 2, 3, 4, 5, 6]).unwrap_err(), invalid);
        assert_eq!(round.close([1, 2, 3, 4, 5, 91]).unwrap_err(), invalid);
        assert_eq!(round.close([1, 1, 3, 4, 5, 6]).unwrap_err(), invalid);
        assert!(!round.closed);
        assert_eq!(round.winners, [0; CATEGORY_COUNT]);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
    }

    #[test]
    fn test_close_twice_fails() {
        let mut round = open_round();
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            round.close([1, 2, 3, 4, 5, 6]).unwrap_err(),
            error!(LotteryError::InvalidState)
        );
        let mut ticket_round = open_round();
        ticket_round.closed = true;
        let hash = validate_and_encode(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            ticket_round.record_ticket(&hash, 6, NO_REFERRAL).unwrap_err(),
            error!(LotteryError::InvalidState)
        );
    }

    #[test]
    fn test_double_withdrawal_fails() {
        let mut round = open_round();
        let mut ticket = buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        let prizes = round.prizes;
        let winners = round.winners;

        let prize = round.withdraw_prize(&mut ticket).unwrap();
        assert_eq!(prize, prizes[JACKPOT]);
        assert!(ticket.withdrawn);

        let before = ticket.try_to_vec().unwrap();
        assert_eq!(
            round.withdraw_prize(&mut ticket).unwrap_err(),
            error!(LotteryError::AlreadyWithdrawn)
        );
        assert_eq!(ticket.try_to_vec().unwrap(), before);
        assert_eq!(round.prizes, prizes);
        assert_eq!(round.winners, winners);
    }

    #[test]
    fn test_withdraw_checks_round_then_prize_then_flag() {
        let mut round = open_round();
        let mut winner = buy(&mut round, 1, &[1, 2, 3, 4, 5, 6], NO_REFERRAL);
        let mut loser = buy(&mut round, 2, &[1, 20, 30, 40, 50, 60], NO_REFERRAL);
        assert_eq!(
            round.withdraw_prize(&mut winner).unwrap_err(),
            error!(LotteryError::InvalidRound)
        );
        assert!(!winner.withdrawn);

        round.close([1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            round.withdraw_prize(&mut loser).unwrap_err(),
            error!(LotteryError::NoPrize)
        );
        assert!(!loser.withdrawn);
        loser.withdrawn = true;
        assert_eq!(
            round.withdraw_prize(&mut loser).unwrap_err(),
            error!(LotteryError::NoPrize)
        );
        round.withdraw_prize(&mut winner).unwrap();
    }

    #[test]
    fn test_claim_referral_code() {
        let partner = Pubkey::new_unique();
        let mut referral = ReferralCode {
            bump: 0,
            code: 0,
            partner: Pubkey::default(),
        };
        assert_eq!(
            referral.claim(250, NO_REFERRAL, partner).unwrap_err(),
            error!(LotteryError::ReferralCodeExists)
        );
        referral.claim(250, 77, partner).unwrap();
        assert_eq!((referral.bump, referral.code, referral.partner), (250, 77, partner));

        assert_eq!(
            referral.claim(250, 77, Pubkey::new_unique()).unwrap_err(),
            error!(LotteryError::ReferralCodeExists)
        );
        assert_eq!(referral.partner, partner);
    }

    #[test]
    fn test_ticket_referral_must_be_claimed() {
        let referral = ReferralCode {
            bump: 250,
            code: 77,
            partner: Pubkey::new_unique(),
        };
        ReferralCode::verify(NO_REFERRAL, None).unwrap();
        ReferralCode::verify(77, Some(&referral)).unwrap();
        assert_eq!(
            ReferralCode::verify(77, None).unwrap_err(),
            error!(LotteryError::InvalidReferralCode)
        );
        assert_eq!(
            ReferralCode::verify(78, Some(&referral)).unwrap_err(),
            error!(LotteryError::InvalidReferralCode)
        );
    }

    #[test]
    fn test_referral_payout_settles_once() {
        let mut round = open_round();
        buy(&mut round, 1, &[1, 2, 3, 4, 5, 6, 7], 11);
        buy(&mut round, 2, &[10, 20, 30, 40, 50, 60], NO_REFERRAL);
        let mut payout = ReferralPayout {
            bump: 0,
            code: 0,
            round: 0,
            amount: 0,
            withdrawn: false,
        };
        assert_eq!(
            payout.settle(249, 11, &round).unwrap_err(),
            error!(LotteryError::InvalidRound)
        );

        round.close([80, 81, 82, 83, 84, 85]).unwrap();
        assert_eq!(
            payout.settle(249, 12, &round).unwrap_err(),
            error!(LotteryError::NoPrize)
        );
        let amount = payout.settle(249, 11, &round).unwrap();
        assert_eq!(amount, round.partner_share(11).unwrap());
        assert!(payout.withdrawn && payout.amount == amount && payout.round == 1);
        assert_eq!(
            payout.settle(249, 11, &round).unwrap_err(),
            error!(LotteryError::AlreadyWithdrawn)
        );
    }

    #[test]
    fn test_ticket_decodes_its_numbers() {
        let mut round = open_round();
        let ticket = buy(&mut round, 1, &[42, 7, 90, 1, 13, 66], NO_REFERRAL);
        assert_eq!(ticket.numbers(), vec![1, 7, 13, 42, 66, 90]);
    }

    #[test]
    fn test_drawing_state_machine() {
        let mut lottery = lottery();
        let randomness = Pubkey::new_unique();

        assert!(!lottery.can_draw(SATURDAY_8PM - 1));
        assert_eq!(
            lottery.begin_drawing(SATURDAY_8PM - 1, randomness).unwrap_err(),
            error!(LotteryError::InvalidState)
        );

        assert!(lottery.can_draw(SATURDAY_8PM + HOUR));
        let request = lottery.begin_drawing(SATURDAY_8PM + HOUR, randomness).unwrap();
        assert_eq!(request, 1);
        assert_eq!(lottery.status, DrawingStatus::Drawing);
        assert!(!lottery.can_draw(SATURDAY_8PM + HOUR));

        assert_eq!(
            lottery.check_fulfillment(2, &randomness).unwrap_err(),
            error!(LotteryError::RequestMismatch)
        );
        assert_eq!(
            lottery.check_fulfillment(1, &Pubkey::new_unique()).unwrap_err(),
            error!(LotteryError::RequestMismatch)
        );
        lottery.check_fulfillment(1, &randomness).unwrap();

        assert_eq!(lottery.complete_drawing().unwrap(), 2);
        assert_eq!(lottery.status, DrawingStatus::Open);
        assert_eq!(lottery.pending_request, 0);
        assert_eq!(
            lottery.check_fulfillment(1, &randomness).unwrap_err(),
            error!(LotteryError::InvalidState)
        );
        // One drawing per window.
        assert!(!lottery.can_draw(SATURDAY_8PM + 2 * HOUR));
        assert!(lottery.can_draw(SATURDAY_8PM + WINDOW_PERIOD));
    }

    #[test]
    fn test_cancel_failed_drawing() {
        let mut lottery = lottery();
        let randomness = Pubkey::new_unique();
        assert_eq!(
            lottery.cancel_drawing(SATURDAY_8PM + 5 * HOUR, false).unwrap_err(),
            error!(LotteryError::InvalidState)
        );

        lottery.begin_drawing(SATURDAY_8PM, randomness).unwrap();
        assert_eq!(
            lottery.cancel_drawing(SATURDAY_8PM + 4 * HOUR - 1, false).unwrap_err(),
            error!(LotteryError::InvalidState)
        );
        // A revealed value cannot be thrown away, however late.
        assert_eq!(
            lottery.cancel_drawing(SATURDAY_8PM + 5 * HOUR, true).unwrap_err(),
            error!(LotteryError::InvalidState)
        );
        assert_eq!(lottery.status, DrawingStatus::Drawing);
        assert_eq!(lottery.randomness_account, randomness);
        assert_eq!(lottery.cancel_drawing(SATURDAY_8PM + 4 * HOUR, false).unwrap(), 1);
        assert_eq!(lottery.status, DrawingStatus::Open);
        assert_eq!(lottery.current_round, 1);
        assert_eq!(lottery.randomness_account, Pubkey::default());

        assert!(!lottery.can_draw(SATURDAY_8PM + 5 * HOUR));
        let retry = lottery.begin_drawing(SATURDAY_8PM + WINDOW_PERIOD, randomness).unwrap();
        assert_eq!(retry, 2);
    }

    #[test]
    fn test_sales_and_funding_need_open_status() {
        let mut lottery = lottery();
        lottery.require_open().unwrap();
        lottery.begin_drawing(SATURDAY_8PM, Pubkey::new_unique()).unwrap();
        assert_eq!(lottery.require_open().unwrap_err(), error!(LotteryError::InvalidState));
        lottery.cancel_drawing(SATURDAY_8PM + 4 * HOUR, false).unwrap();
        lottery.require_open().unwrap();
    }

    #[test]
    fn test_authority_and_ticket_ids() {
        let mut lottery = lottery();
        let authority = lottery.authority;
        lottery.require_authority(&authority).unwrap();
        assert_eq!(
            lottery.require_authority(&Pubkey::new_unique()).unwrap_err(),
            error!(LotteryError::Unauthorized)
        );
        assert_eq!(lottery.issue_ticket_id().unwrap(), 1);
        assert_eq!(lottery.issue_ticket_id().unwrap(), 2);
    }
}
