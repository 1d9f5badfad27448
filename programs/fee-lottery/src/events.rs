use anchor_lang::prelude::*;

#[event]
pub struct LotteryInitialized {
    pub lottery: Pubkey,
    pub authority: Pubkey,
    pub oracle: Pubkey,
    pub fee: u64,
    pub start_time: i64,
    pub end_time: i64,
}

#[event]
pub struct LotteryEntered {
    pub lottery: Pubkey,
    pub participant: Pubkey,
    /// Position of the entry, zero based.
    pub index: u64,
    pub pool: u64,
}

/// Entry closed and a randomness request is outstanding.
#[event]
pub struct RandomnessRequested {
    pub lottery: Pubkey,
    pub request: Pubkey,
    pub participants: u64,
    pub requested_at: i64,
}

#[event]
pub struct WinnerSelected {
    pub lottery: Pubkey,
    pub request: Pubkey,
    /// `None` when the round closed without entries.
    pub winner: Option<Pubkey>,
    pub pool: u64,
}

#[event]
pub struct PrizeWithdrawn {
    pub lottery: Pubkey,
    pub winner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct RoundExpired {
    pub lottery: Pubkey,
    pub request: Pubkey,
    pub expired_at: i64,
}

#[event]
pub struct RefundClaimed {
    pub lottery: Pubkey,
    pub participant: Pubkey,
    pub amount: u64,
}
