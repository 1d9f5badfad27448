use anchor_lang::prelude::*;

use crate::constants::LOTTERY_SEED;
use crate::events::PrizeWithdrawn;
use crate::state::Lottery;

/// Accounts required for withdrawing the pool.
#[derive(Accounts)]
pub struct Withdrawal<'info> {
    /// The winner, receiving the pool.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The main lottery state account, holding the pool's lamports.
    #[account(
        mut,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,
}

/// Pays the pool to the winner.
///
/// Steps:
/// 1. Verify that the round is resolved.
/// 2. Verify that the caller is the winner and has not withdrawn yet.
/// 3. Zero the pool.
/// 4. Transfer the pool's lamports to the winner.
///
/// # Arguments
/// * `ctx` - Context containing `Withdrawal` accounts
pub fn process_withdrawal(ctx: Context<Withdrawal>) -> Result<()> {
    let winner = ctx.accounts.payer.key();
    let amount = ctx.accounts.lottery.withdraw(&winner)?;

    msg!("Paying {} lamports to {}", amount, winner);

    **ctx
        .accounts
        .lottery
        .to_account_info()
        .try_borrow_mut_lamports()? -= amount;
    **ctx.accounts.payer.try_borrow_mut_lamports()? += amount;

    emit!(PrizeWithdrawn {
        lottery: ctx.accounts.lottery.key(),
        winner,
        amount,
    });

    Ok(())
}
