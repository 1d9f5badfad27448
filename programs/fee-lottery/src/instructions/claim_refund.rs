use anchor_lang::prelude::*;

use crate::constants::LOTTERY_SEED;
use crate::events::RefundClaimed;
use crate::state::Lottery;

/// Accounts required to reclaim a fee from an expired round.
#[derive(Accounts)]
pub struct ClaimRefund<'info> {
    /// The entrant reclaiming their fee.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The expired round, holding the pool's lamports.
    #[account(
        mut,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,
}

pub fn process_claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
    let participant = ctx.accounts.payer.key();
    let amount = ctx.accounts.lottery.refund(&participant)?;

    msg!("Refunding {} lamports to {}", amount, participant);

    **ctx
        .accounts
        .lottery
        .to_account_info()
        .try_borrow_mut_lamports()? -= amount;
    **ctx.accounts.payer.try_borrow_mut_lamports()? += amount;

    emit!(RefundClaimed {
        lottery: ctx.accounts.lottery.key(),
        participant,
        amount,
    });

    Ok(())
}
