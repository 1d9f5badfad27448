use anchor_lang::prelude::*;
use solana_program::pubkey;

/// Seed of the singleton lottery PDA.
#[constant]
pub const LOTTERY_SEED: &str = "lottery";

/// Seconds a round accepts entries when no duration is configured.
pub const DEFAULT_DURATION: i64 = 300;

/// Seconds an outstanding randomness request may stay unanswered before the
/// round can be expired and refunded.
pub const DEFAULT_RANDOMNESS_TIMEOUT: i64 = 3_600;

/// Upper bound on entries.
pub const MAX_PARTICIPANTS: usize = 100;

/// Switchboard On-Demand program. Randomness accounts are only accepted when
/// owned by it.
#[cfg(not(feature = "devnet"))]
#[constant]
pub const SWITCHBOARD_PROGRAM_ID: Pubkey = pubkey!("SBondMDrcV3K4kxZR1HNVT7osZxAHVHgYXL5Ze1oMUv");

#[cfg(feature = "devnet")]
#[constant]
pub const SWITCHBOARD_PROGRAM_ID: Pubkey = pubkey!("Aio4gaXjXzJNVLtzwtNVmSqGKpANtXhybbkhtAC94ji2");
