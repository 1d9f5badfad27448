use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::LOTTERY_SEED;
use crate::events::LotteryEntered;
use crate::state::Lottery;

/// Accounts required to enter the lottery.
#[derive(Accounts)]
pub struct EnterLottery<'info> {
    /// The entrant, paying the fee.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The round being entered. Also holds the pool's lamports.
    #[account(
        mut,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump
    )]
    pub lottery: Account<'info, Lottery>,

    /// System program for the fee transfer.
    pub system_program: Program<'info, System>,
}

/// Enters the caller into the round.
///
/// Steps performed:
/// 1. Check that the round is open and its end time has not passed.
/// 2. Check that `amount` equals the fee exactly.
/// 3. Check that the caller has not entered already.
/// 4. Record the entry and grow the pool.
/// 5. Transfer `amount` lamports from the caller into the lottery account.
///
/// # Arguments
/// * `ctx` - Context containing EnterLottery accounts
/// * `amount` - Lamports attached to the entry
pub fn process_enter_lottery(ctx: Context<EnterLottery>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let participant = ctx.accounts.payer.key();

    let index = ctx
        .accounts
        .lottery
        .enter(participant, amount, clock.unix_timestamp)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.payer.to_account_info(),
                to: ctx.accounts.lottery.to_account_info(),
            },
        ),
        amount,
    )?;

    msg!("Entry {}: {}", index, participant);

    emit!(LotteryEntered {
        lottery: ctx.accounts.lottery.key(),
        participant,
        index,
        pool: ctx.accounts.lottery.pool,
    });

    Ok(())
}
