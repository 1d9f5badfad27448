use anchor_lang::prelude::*;

use crate::constants::LOTTERY_SEED;
use crate::state::Lottery;

/// Read-only access to the round. Values are returned through the
/// transaction's return data.
#[derive(Accounts)]
pub struct ViewLottery<'info> {
    #[account(
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,
}

pub fn process_get_fee(ctx: Context<ViewLottery>) -> Result<u64> {
    Ok(ctx.accounts.lottery.fee)
}

pub fn process_get_participant(ctx: Context<ViewLottery>, index: u64) -> Result<Pubkey> {
    ctx.accounts.lottery.participant(index)
}

pub fn process_get_end_time(ctx: Context<ViewLottery>) -> Result<i64> {
    ctx.accounts.lottery.end_time()
}
