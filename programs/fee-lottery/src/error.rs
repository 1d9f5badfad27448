use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    // Caller input
    #[msg("Please provide the correct fee to be able to enter the lottery")]
    IncorrectFee,
    #[msg("Participant index out of range")]
    IndexOutOfRange,
    #[msg("Entry fee must be greater than zero")]
    InvalidFee,
    #[msg("Lottery duration must be greater than zero")]
    InvalidDuration,
    #[msg("Randomness timeout must be greater than zero")]
    InvalidRandomnessTimeout,
    #[msg("Arithmetic overflow")]
    Overflow,

    // Round state
    #[msg("Already entered the lottery")]
    AlreadyEntered,
    #[msg("The lottery is closed to new entries")]
    LotteryClosed,
    #[msg("The lottery is still active")]
    LotteryStillActive,
    #[msg("Only the winner can withdraw the pool")]
    NotWinner,
    #[msg("The prize has already been withdrawn")]
    PrizeAlreadyClaimed,
    #[msg("The lottery has reached its participant limit")]
    LotteryFull,
    #[msg("The lottery has not reached its end time")]
    LotteryNotEnded,
    #[msg("The lottery has already been closed")]
    LotteryAlreadyClosed,
    #[msg("The lottery expired without randomness, claim a refund instead")]
    LotteryExpired,
    #[msg("Refunds are only available once the lottery has expired")]
    LotteryNotExpired,
    #[msg("The lottery is not waiting for randomness")]
    RoundNotAwaitingRandomness,
    #[msg("Caller did not enter the lottery")]
    NotParticipant,
    #[msg("Refund already claimed")]
    RefundAlreadyClaimed,
    #[msg("Lottery phases only move forward one step at a time")]
    InvalidPhaseTransition,

    // Oracle authorization
    #[msg("Randomness must come from the trusted oracle")]
    UntrustedOracle,
    #[msg("Randomness response does not match the outstanding request")]
    StaleOrUnknownRequest,

    // Oracle availability
    #[msg("Randomness account was not committed in the previous slot")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness has not been revealed yet")]
    RandomnessNotResolved,
    #[msg("Randomness account data could not be parsed")]
    InvalidRandomnessAccount,
    #[msg("The randomness request has not timed out yet")]
    RandomnessNotTimedOut,
}

/// Coarse classification of a failure, used by callers that only care about
/// who has to act on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied a bad value.
    CallerInput,
    /// The call does not fit the round's current phase or membership.
    StateConflict,
    /// The call claims an oracle identity or request it does not hold.
    Authorization,
    /// The oracle has not delivered what the call needs.
    ExternalDependency,
}

impl LotteryError {
    pub fn kind(&self) -> ErrorKind {
        use LotteryError::*;
        match self {
            IncorrectFee | IndexOutOfRange | InvalidFee | InvalidDuration
            | InvalidRandomnessTimeout | Overflow => ErrorKind::CallerInput,
            AlreadyEntered | LotteryClosed | LotteryStillActive | NotWinner
            | PrizeAlreadyClaimed | LotteryFull | LotteryNotEnded | LotteryAlreadyClosed
            | LotteryExpired | LotteryNotExpired | RoundNotAwaitingRandomness
            | NotParticipant | RefundAlreadyClaimed | InvalidPhaseTransition => {
                ErrorKind::StateConflict
            }
            UntrustedOracle | StaleOrUnknownRequest => ErrorKind::Authorization,
            RandomnessAlreadyRevealed | RandomnessNotResolved | InvalidRandomnessAccount
            | RandomnessNotTimedOut => ErrorKind::ExternalDependency,
        }
    }
}
