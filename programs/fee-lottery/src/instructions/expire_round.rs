use anchor_lang::prelude::*;

use crate::constants::LOTTERY_SEED;
use crate::events::RoundExpired;
use crate::state::Lottery;

#[derive(Accounts)]
pub struct ExpireRound<'info> {
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,
}

/// Gives up on an oracle that has not answered within the randomness
/// timeout. Anyone may call this; entrants then reclaim their fee with
/// `claim_refund`. No funds move here.
pub fn process_expire_round(ctx: Context<ExpireRound>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;

    lottery.expire(clock.unix_timestamp)?;

    msg!("Randomness request timed out, refunds open");

    emit!(RoundExpired {
        lottery: lottery.key(),
        request: lottery.randomness_request.unwrap_or_default(),
        expired_at: clock.unix_timestamp,
    });

    Ok(())
}
