use anchor_lang::prelude::*;

use crate::constants::{
    DEFAULT_DURATION, DEFAULT_RANDOMNESS_TIMEOUT, LOTTERY_SEED, SWITCHBOARD_PROGRAM_ID,
};
use crate::events::LotteryInitialized;
use crate::state::{Lottery, RoundConfig};

/// Round configuration supplied once, at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeLotteryParams {
    /// Exact entry fee in lamports.
    pub fee: u64,
    /// Seconds the round accepts entries. Defaults to `DEFAULT_DURATION`.
    pub duration: Option<i64>,
    /// Seconds to wait for randomness before the round may be expired.
    /// Defaults to `DEFAULT_RANDOMNESS_TIMEOUT`.
    pub randomness_timeout: Option<i64>,
}

impl From<InitializeLotteryParams> for RoundConfig {
    fn from(params: InitializeLotteryParams) -> Self {
        RoundConfig {
            fee: params.fee,
            duration: params.duration.unwrap_or(DEFAULT_DURATION),
            randomness_timeout: params
                .randomness_timeout
                .unwrap_or(DEFAULT_RANDOMNESS_TIMEOUT),
        }
    }
}

/// Accounts required to open the lottery round.
#[derive(Accounts)]
pub struct InitializeLottery<'info> {
    /// The account paying for account creation and fees.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The singleton round. A second initialization fails because the PDA
    /// already exists.
    #[account(
        init,
        payer = payer,
        space = 8 + Lottery::INIT_SPACE,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Opens the round at the current cluster time.
///
/// # Arguments
/// * `ctx` - Context holding the InitializeLottery accounts
/// * `params` - Fee and timing configuration
pub fn process_initialize_lottery(
    ctx: Context<InitializeLottery>,
    params: InitializeLotteryParams,
) -> Result<()> {
    let clock = Clock::get()?;
    let authority = ctx.accounts.payer.key();
    let lottery = &mut ctx.accounts.lottery;

    lottery.initialize(ctx.bumps.lottery, authority, params.into(), clock.unix_timestamp)?;
    let end_time = lottery.end_time()?;

    msg!("Lottery open, fee {} lamports", lottery.fee);
    msg!("Entries close at {}", end_time);

    emit!(LotteryInitialized {
        lottery: lottery.key(),
        authority,
        oracle: SWITCHBOARD_PROGRAM_ID,
        fee: lottery.fee,
        start_time: lottery.start_time,
        end_time,
    });

    Ok(())
}
