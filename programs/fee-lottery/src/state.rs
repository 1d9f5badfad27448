use anchor_lang::prelude::*;

use crate::constants::{MAX_PARTICIPANTS, SWITCHBOARD_PROGRAM_ID};
use crate::error::LotteryError;

/// Position of the round in its forward-only lifecycle.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum Phase {
    #[default]
    Open,
    Closed,
    AwaitingRandomness,
    Resolved,
    /// The oracle never answered; entrants may reclaim their fee.
    Expired,
}

impl Phase {
    fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Open, Phase::Closed)
                | (Phase::Closed, Phase::AwaitingRandomness)
                | (Phase::AwaitingRandomness, Phase::Resolved)
                | (Phase::AwaitingRandomness, Phase::Expired)
        )
    }
}

/// Issues the randomness request made when entry closes.
pub trait RandomnessOracle {
    /// Returns the handle the oracle's response will be correlated with.
    fn request_randomness(&mut self) -> Result<Pubkey>;
}

/// Round parameters fixed at initialization.
#[derive(Clone, Copy, Debug)]
pub struct RoundConfig {
    pub fee: u64,
    pub duration: i64,
    pub randomness_timeout: i64,
}

#[account]
#[derive(InitSpace, Default)]
pub struct Lottery {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// The account that initialized the round.
    pub authority: Pubkey,

    /// The exact amount (in lamports) required to enter.
    pub fee: u64,

    /// The UNIX timestamp at which the round opened.
    pub start_time: i64,

    /// Seconds the round accepts entries.
    pub duration: i64,

    /// Seconds an outstanding randomness request may go unanswered before
    /// the round can be expired.
    pub randomness_timeout: i64,

    pub phase: Phase,

    /// Entrants in entry order.
    #[max_len(MAX_PARTICIPANTS)]
    pub participants: Vec<Pubkey>,

    /// Lamports collected from fees and not yet paid out.
    pub pool: u64,

    /// Set once, when the oracle response is consumed.
    pub winner: Option<Pubkey>,

    /// The randomness account committed when entry closed.
    pub randomness_request: Option<Pubkey>,

    /// The UNIX timestamp at which the randomness request was recorded.
    pub randomness_requested_at: i64,

    /// `true` once the winner has withdrawn the pool.
    pub prize_claimed: bool,

    /// Entrants that already reclaimed their fee from an expired round.
    #[max_len(MAX_PARTICIPANTS)]
    pub refunded: Vec<Pubkey>,
}

impl Lottery {
    pub fn initialize(
        &mut self,
        bump: u8,
        authority: Pubkey,
        config: RoundConfig,
        now: i64,
    ) -> Result<()> {
        require!(config.fee > 0, LotteryError::InvalidFee);
        require!(config.duration > 0, LotteryError::InvalidDuration);
        require!(
            config.randomness_timeout > 0,
            LotteryError::InvalidRandomnessTimeout
        );
        now.checked_add(config.duration)
            .ok_or(LotteryError::Overflow)?;

        self.bump = bump;
        self.authority = authority;
        self.fee = config.fee;
        self.start_time = now;
        self.duration = config.duration;
        self.randomness_timeout = config.randomness_timeout;
        self.phase = Phase::Open;
        self.participants = Vec::new();
        self.pool = 0;
        self.winner = None;
        self.randomness_request = None;
        self.randomness_requested_at = 0;
        self.prize_claimed = false;
        self.refunded = Vec::new();
        Ok(())
    }

    pub fn end_time(&self) -> Result<i64> {
        Ok(self
            .start_time
            .checked_add(self.duration)
            .ok_or(LotteryError::Overflow)?)
    }

    pub fn has_ended(&self, now: i64) -> Result<bool> {
        Ok(now >= self.end_time()?)
    }

    pub fn participant(&self, index: u64) -> Result<Pubkey> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.participants.get(i))
            .copied()
            .ok_or_else(|| error!(LotteryError::IndexOutOfRange))
    }

    /// Registers `caller` and adds the fee to the pool. Returns the entry's
    /// index.
    pub fn enter(&mut self, caller: Pubkey, attached_value: u64, now: i64) -> Result<u64> {
        require!(
            self.phase == Phase::Open && !self.has_ended(now)?,
            LotteryError::LotteryClosed
        );
        require!(attached_value == self.fee, LotteryError::IncorrectFee);
        require!(
            !self.participants.contains(&caller),
            LotteryError::AlreadyEntered
        );
        require!(
            self.participants.len() < MAX_PARTICIPANTS,
            LotteryError::LotteryFull
        );

        let pool = self
            .pool
            .checked_add(attached_value)
            .ok_or(LotteryError::Overflow)?;
        self.participants.push(caller);
        self.pool = pool;

        Ok(self.participants.len() as u64 - 1)
    }

    /// Closes entry once the end time has been reached and records the
    /// randomness request in the same step, so the round is never observed
    /// closed without an outstanding request. Returns `false` when there was
    /// nothing to close.
    pub fn close_if_expired<O>(&mut self, now: i64, oracle: &mut O) -> Result<bool>
    where
        O: RandomnessOracle + ?Sized,
    {
        if self.phase != Phase::Open || !self.has_ended(now)? {
            return Ok(false);
        }

        let request = oracle.request_randomness()?;

        self.advance(Phase::Closed)?;
        self.randomness_request = Some(request);
        self.randomness_requested_at = now;
        self.advance(Phase::AwaitingRandomness)?;

        Ok(true)
    }

    /// Checks that a response comes from an account owned by the Switchboard
    /// program and answers the outstanding request.
    pub fn verify_randomness_response(&self, oracle: &Pubkey, request_id: &Pubkey) -> Result<()> {
        require_keys_eq!(*oracle, SWITCHBOARD_PROGRAM_ID, LotteryError::UntrustedOracle);
        require!(
            self.phase == Phase::AwaitingRandomness
                && self.randomness_request.as_ref() == Some(request_id),
            LotteryError::StaleOrUnknownRequest
        );
        Ok(())
    }

    /// Picks `participants[random_value % len]` and resolves the round. A
    /// round without entrants resolves with no winner.
    pub fn on_randomness_received(
        &mut self,
        oracle: &Pubkey,
        request_id: &Pubkey,
        random_value: u64,
    ) -> Result<Option<Pubkey>> {
        self.verify_randomness_response(oracle, request_id)?;

        let winner = match self.participants.len() as u64 {
            0 => None,
            len => Some(self.participants[(random_value % len) as usize]),
        };

        self.advance(Phase::Resolved)?;
        self.winner = winner;

        Ok(winner)
    }

    /// Releases the pool to the winner. The caller moves the returned
    /// lamports after this succeeds.
    pub fn withdraw(&mut self, caller: &Pubkey) -> Result<u64> {
        match self.phase {
            Phase::Open | Phase::Closed | Phase::AwaitingRandomness => {
                return err!(LotteryError::LotteryStillActive)
            }
            Phase::Expired => return err!(LotteryError::LotteryExpired),
            Phase::Resolved => {}
        }
        require!(
            self.winner.as_ref() == Some(caller),
            LotteryError::NotWinner
        );
        require!(!self.prize_claimed, LotteryError::PrizeAlreadyClaimed);

        let amount = self.pool;
        self.pool = 0;
        self.prize_claimed = true;

        Ok(amount)
    }

    pub fn expire(&mut self, now: i64) -> Result<()> {
        require!(
            self.phase == Phase::AwaitingRandomness,
            LotteryError::RoundNotAwaitingRandomness
        );
        let deadline = self
            .randomness_requested_at
            .checked_add(self.randomness_timeout)
            .ok_or(LotteryError::Overflow)?;
        require!(now >= deadline, LotteryError::RandomnessNotTimedOut);

        self.advance(Phase::Expired)
    }

    /// Releases one fee back to an entrant of an expired round.
    pub fn refund(&mut self, caller: &Pubkey) -> Result<u64> {
        require!(self.phase == Phase::Expired, LotteryError::LotteryNotExpired);
        require!(
            self.participants.contains(caller),
            LotteryError::NotParticipant
        );
        require!(
            !self.refunded.contains(caller),
            LotteryError::RefundAlreadyClaimed
        );

        let pool = self
            .pool
            .checked_sub(self.fee)
            .ok_or(LotteryError::Overflow)?;
        self.refunded.push(*caller);
        self.pool = pool;

        Ok(self.fee)
    }

    fn advance(&mut self, next: Phase) -> Result<()> {
        require!(
            self.phase.can_advance_to(next),
            LotteryError::InvalidPhaseTransition
        );
        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    const START: i64 = 1_000;
    const FEE: u64 = 1;
    const DURATION: i64 = 300;
    const TIMEOUT: i64 = 3_600;

    struct MockOracle {
        request: Pubkey,
        calls: usize,
        fail: bool,
    }

    impl MockOracle {
        fn new() -> Self {
            Self {
                request: Pubkey::new_unique(),
                calls: 0,
                fail: false,
            }
        }
    }

    impl RandomnessOracle for MockOracle {
        fn request_randomness(&mut self) -> Result<Pubkey> {
            self.calls += 1;
            if self.fail {
                return err!(LotteryError::RandomnessAlreadyRevealed);
            }
            Ok(self.request)
        }
    }

    fn code(err: Error) -> u32 {
        match err {
            Error::AnchorError(e) => e.error_code_number,
            Error::ProgramError(e) => panic!("unexpected program error: {:?}", e),
        }
    }

    fn assert_err<T: std::fmt::Debug>(result: Result<T>, expected: LotteryError) {
        assert_eq!(code(result.unwrap_err()), code(expected.into()));
    }

    fn new_lottery() -> Lottery {
        let mut lottery = Lottery::default();
        lottery
            .initialize(
                255,
                Pubkey::new_unique(),
                RoundConfig {
                    fee: FEE,
                    duration: DURATION,
                    randomness_timeout: TIMEOUT,
                },
                START,
            )
            .unwrap();
        lottery
    }

    fn end() -> i64 {
        START + DURATION
    }

    /// Enters `n` fresh participants and closes the round.
    fn closed_lottery(n: usize) -> (Lottery, MockOracle, Vec<Pubkey>) {
        let mut lottery = new_lottery();
        let entrants: Vec<Pubkey> = (0..n).map(|_| Pubkey::new_unique()).collect();
        for entrant in &entrants {
            lottery.enter(*entrant, FEE, START + 1).unwrap();
        }
        let mut oracle = MockOracle::new();
        assert!(lottery.close_if_expired(end(), &mut oracle).unwrap());
        (lottery, oracle, entrants)
    }

    #[test]
    fn test_initialize() {
        let lottery = new_lottery();
        assert_eq!(lottery.phase, Phase::Open);
        assert_eq!(lottery.fee, FEE);
        assert_eq!(lottery.start_time, START);
        assert_eq!(lottery.end_time().unwrap(), START + DURATION);
        assert_eq!(lottery.pool, 0);
        assert!(lottery.participants.is_empty());
        assert!(lottery.winner.is_none());
        assert!(lottery.randomness_request.is_none());
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let config = RoundConfig {
            fee: FEE,
            duration: DURATION,
            randomness_timeout: TIMEOUT,
        };
        let authority = Pubkey::new_unique();

        let mut lottery = Lottery::default();
        assert_err(
            lottery.initialize(0, authority, RoundConfig { fee: 0, ..config }, START),
            LotteryError::InvalidFee,
        );
        assert_err(
            lottery.initialize(0, authority, RoundConfig { duration: 0, ..config }, START),
            LotteryError::InvalidDuration,
        );
        assert_err(
            lottery.initialize(
                0,
                authority,
                RoundConfig {
                    randomness_timeout: -1,
                    ..config
                },
                START,
            ),
            LotteryError::InvalidRandomnessTimeout,
        );
        assert_err(
            lottery.initialize(0, authority, config, i64::MAX),
            LotteryError::Overflow,
        );
    }

    #[test]
    fn test_enter_with_correct_fee() {
        let mut lottery = new_lottery();
        let alice = Pubkey::new_unique();

        assert_eq!(lottery.enter(alice, 1, START).unwrap(), 0);
        assert_eq!(lottery.participant(0).unwrap(), alice);
        assert_eq!(lottery.pool, 1);
    }

    #[test]
    fn test_enter_with_wrong_fee_leaves_state_unchanged() {
        let mut lottery = new_lottery();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        lottery.enter(alice, FEE, START).unwrap();

        assert_err(lottery.enter(bob, 2, START), LotteryError::IncorrectFee);
        assert_err(lottery.enter(bob, 0, START), LotteryError::IncorrectFee);
        assert_eq!(lottery.participants, vec![alice]);
        assert_eq!(lottery.pool, FEE);
    }

    #[test]
    fn test_enter_twice_is_rejected() {
        let mut lottery = new_lottery();
        let alice = Pubkey::new_unique();
        lottery.enter(alice, FEE, START).unwrap();

        assert_err(lottery.enter(alice, FEE, START + 1), LotteryError::AlreadyEntered);
        assert_eq!(lottery.participants.len(), 1);
        assert_eq!(lottery.pool, FEE);
    }

    #[test]
    fn test_pool_tracks_fee_times_participants() {
        let mut lottery = new_lottery();
        for i in 0..10 {
            lottery.enter(Pubkey::new_unique(), FEE, START + i).unwrap();
            assert_eq!(lottery.pool, FEE * lottery.participants.len() as u64);
        }
    }

    #[test]
    fn test_enter_rejected_when_full() {
        let mut lottery = new_lottery();
        for _ in 0..MAX_PARTICIPANTS {
            lottery.enter(Pubkey::new_unique(), FEE, START).unwrap();
        }
        assert_err(
            lottery.enter(Pubkey::new_unique(), FEE, START),
            LotteryError::LotteryFull,
        );
        assert_eq!(lottery.pool, FEE * MAX_PARTICIPANTS as u64);
    }

    #[test]
    fn test_withdrawal_while_open() {
        let mut lottery = new_lottery();
        let alice = Pubkey::new_unique();
        lottery.enter(alice, FEE, START).unwrap();

        assert_err(lottery.withdraw(&alice), LotteryError::LotteryStillActive);
        assert_eq!(lottery.pool, FEE);
    }

    #[test]
    fn test_enter_after_end_time_fails() {
        let mut lottery = new_lottery();
        lottery.enter(Pubkey::new_unique(), FEE, START).unwrap();

        assert_err(
            lottery.enter(Pubkey::new_unique(), FEE, end()),
            LotteryError::LotteryClosed,
        );
        assert_err(
            lottery.enter(Pubkey::new_unique(), FEE, end() + 50),
            LotteryError::LotteryClosed,
        );
        assert_eq!(lottery.participants.len(), 1);
        assert_eq!(lottery.phase, Phase::Open);
    }

    #[test]
    fn test_close_before_end_time_is_noop() {
        let mut lottery = new_lottery();
        let mut oracle = MockOracle::new();

        assert!(!lottery.close_if_expired(end() - 1, &mut oracle).unwrap());
        assert_eq!(lottery.phase, Phase::Open);
        assert_eq!(oracle.calls, 0);
    }

    #[test]
    fn test_close_records_request() {
        let (mut lottery, mut oracle, _) = closed_lottery(2);

        assert_eq!(lottery.phase, Phase::AwaitingRandomness);
        assert_eq!(lottery.randomness_request, Some(oracle.request));
        assert_eq!(lottery.randomness_requested_at, end());
        assert_eq!(oracle.calls, 1);

        // Already closed: no second request.
        assert!(!lottery.close_if_expired(end() + 10, &mut oracle).unwrap());
        assert_eq!(oracle.calls, 1);
    }

    #[test]
    fn test_failed_request_keeps_round_open() {
        let mut lottery = new_lottery();
        let mut oracle = MockOracle::new();
        oracle.fail = true;

        assert_err(
            lottery.close_if_expired(end(), &mut oracle),
            LotteryError::RandomnessAlreadyRevealed,
        );
        assert_eq!(lottery.phase, Phase::Open);
        assert!(lottery.randomness_request.is_none());
    }

    #[test]
    fn test_calls_while_awaiting_randomness() {
        let (mut lottery, _, entrants) = closed_lottery(2);

        assert_err(
            lottery.enter(Pubkey::new_unique(), FEE, end() + 1),
            LotteryError::LotteryClosed,
        );
        assert_err(lottery.withdraw(&entrants[0]), LotteryError::LotteryStillActive);
        assert_eq!(lottery.participants, entrants);
    }

    #[test]
    fn test_response_selects_winner_by_modulo() {
        let (mut lottery, oracle, entrants) = closed_lottery(3);

        let winner = lottery
            .on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 7)
            .unwrap();

        assert_eq!(winner, Some(entrants[7 % 3]));
        assert_eq!(lottery.winner, Some(entrants[1]));
        assert_eq!(lottery.phase, Phase::Resolved);
    }

    #[test]
    fn test_stale_response_is_rejected() {
        let (mut lottery, _, _) = closed_lottery(3);

        assert_err(
            lottery.on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &Pubkey::new_unique(), 7),
            LotteryError::StaleOrUnknownRequest,
        );
        assert!(lottery.winner.is_none());
        assert_eq!(lottery.phase, Phase::AwaitingRandomness);
    }

    #[test]
    fn test_response_from_untrusted_oracle_is_rejected() {
        let (mut lottery, oracle, _) = closed_lottery(3);

        // Any owner other than Switchboard is refused, even when the
        // request id matches the recorded one.
        for owner in [Pubkey::new_unique(), Pubkey::default(), lottery.authority] {
            assert_err(
                lottery.on_randomness_received(&owner, &oracle.request, 1),
                LotteryError::UntrustedOracle,
            );
        }
        assert!(lottery.winner.is_none());
        assert_eq!(lottery.phase, Phase::AwaitingRandomness);

        lottery
            .on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 1)
            .unwrap();
        assert_eq!(lottery.phase, Phase::Resolved);
    }

    #[test]
    fn test_response_before_close_is_rejected() {
        let mut lottery = new_lottery();
        lottery.enter(Pubkey::new_unique(), FEE, START).unwrap();

        assert_err(
            lottery.on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &Pubkey::new_unique(), 0),
            LotteryError::StaleOrUnknownRequest,
        );
        assert_eq!(lottery.phase, Phase::Open);
    }

    #[test]
    fn test_duplicate_response_is_rejected() {
        let (mut lottery, oracle, entrants) = closed_lottery(3);
        lottery
            .on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 0)
            .unwrap();

        assert_err(
            lottery.on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 1),
            LotteryError::StaleOrUnknownRequest,
        );
        assert_eq!(lottery.winner, Some(entrants[0]));
    }

    #[test]
    fn test_only_winner_withdraws_once() {
        let (mut lottery, oracle, entrants) = closed_lottery(4);
        lottery
            .on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 10)
            .unwrap();
        let winner = entrants[10 % 4];
        let loser = entrants[0];

        assert_err(lottery.withdraw(&loser), LotteryError::NotWinner);
        assert_eq!(lottery.withdraw(&winner).unwrap(), FEE * 4);
        assert_eq!(lottery.pool, 0);
        assert!(lottery.prize_claimed);
        assert_err(lottery.withdraw(&winner), LotteryError::PrizeAlreadyClaimed);
        assert_eq!(lottery.pool, 0);
    }

    #[test]
    fn test_empty_round_resolves_without_winner() {
        let (mut lottery, oracle, _) = closed_lottery(0);

        let winner = lottery
            .on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 42)
            .unwrap();

        assert!(winner.is_none());
        assert_eq!(lottery.phase, Phase::Resolved);
        assert_eq!(lottery.pool, 0);
        assert_err(
            lottery.withdraw(&Pubkey::new_unique()),
            LotteryError::NotWinner,
        );
    }

    #[test]
    fn test_expire_requires_timeout() {
        let (mut lottery, _, _) = closed_lottery(2);

        assert_err(
            lottery.expire(end() + TIMEOUT - 1),
            LotteryError::RandomnessNotTimedOut,
        );
        lottery.expire(end() + TIMEOUT).unwrap();
        assert_eq!(lottery.phase, Phase::Expired);

        assert_err(
            lottery.expire(end() + TIMEOUT),
            LotteryError::RoundNotAwaitingRandomness,
        );
    }

    #[test]
    fn test_expire_while_open_is_rejected() {
        let mut lottery = new_lottery();
        assert_err(
            lottery.expire(end() + TIMEOUT),
            LotteryError::RoundNotAwaitingRandomness,
        );
    }

    #[test]
    fn test_expired_round_refunds_each_entrant_once() {
        let (mut lottery, oracle, entrants) = closed_lottery(3);
        lottery.expire(end() + TIMEOUT).unwrap();

        assert_err(
            lottery.on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 1),
            LotteryError::StaleOrUnknownRequest,
        );
        assert_err(lottery.withdraw(&entrants[0]), LotteryError::LotteryExpired);

        assert_eq!(lottery.refund(&entrants[0]).unwrap(), FEE);
        assert_eq!(lottery.pool, FEE * 2);
        assert_err(
            lottery.refund(&entrants[0]),
            LotteryError::RefundAlreadyClaimed,
        );
        assert_err(
            lottery.refund(&Pubkey::new_unique()),
            LotteryError::NotParticipant,
        );

        lottery.refund(&entrants[1]).unwrap();
        lottery.refund(&entrants[2]).unwrap();
        assert_eq!(lottery.pool, 0);
    }

    #[test]
    fn test_refund_requires_expired_round() {
        let (mut lottery, oracle, entrants) = closed_lottery(2);
        assert_err(lottery.refund(&entrants[0]), LotteryError::LotteryNotExpired);

        lottery
            .on_randomness_received(&SWITCHBOARD_PROGRAM_ID, &oracle.request, 0)
            .unwrap();
        assert_err(lottery.refund(&entrants[1]), LotteryError::LotteryNotExpired);
    }

    #[test]
    fn test_participant_index_out_of_range() {
        let mut lottery = new_lottery();
        assert_err(lottery.participant(0), LotteryError::IndexOutOfRange);

        lottery.enter(Pubkey::new_unique(), FEE, START).unwrap();
        assert!(lottery.participant(0).is_ok());
        assert_err(lottery.participant(1), LotteryError::IndexOutOfRange);
        assert_err(lottery.participant(u64::MAX), LotteryError::IndexOutOfRange);
    }

    #[test]
    fn test_phases_only_advance_one_step() {
        let mut lottery = new_lottery();

        assert_err(lottery.advance(Phase::Resolved), LotteryError::InvalidPhaseTransition);
        assert_err(lottery.advance(Phase::Open), LotteryError::InvalidPhaseTransition);
        lottery.advance(Phase::Closed).unwrap();
        assert_err(lottery.advance(Phase::Open), LotteryError::InvalidPhaseTransition);
        lottery.advance(Phase::AwaitingRandomness).unwrap();
        lottery.advance(Phase::Resolved).unwrap();
        assert_err(lottery.advance(Phase::Expired), LotteryError::InvalidPhaseTransition);
    }

    #[test]
    fn test_account_fits_in_single_allocation() {
        assert!(8 + Lottery::INIT_SPACE <= 10_240);
    }
}
