use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{LOTTERY_SEED, SWITCHBOARD_PROGRAM_ID};
use crate::error::LotteryError;
use crate::events::RandomnessRequested;
use crate::state::{Lottery, Phase, RandomnessOracle};

/// Accounts required to close entry and record the randomness request.
///
/// Anyone may send this once the end time has passed. The transaction must
/// create and commit the Switchboard randomness account in the same slot
/// sequence, so the account is committed but not yet revealed.
#[derive(Accounts)]
pub struct CloseLottery<'info> {
    /// The account paying transaction fees.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The main lottery state account.
    #[account(
        mut,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,

    /// Randomness account from Switchboard.
    /// CHECK: Owner and data are validated in `SwitchboardRequest`.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// A Switchboard randomness account committed in the previous slot. Its
/// address is the request handle.
pub struct SwitchboardRequest<'a, 'info> {
    pub account: &'a AccountInfo<'info>,
    pub clock: &'a Clock,
}

impl RandomnessOracle for SwitchboardRequest<'_, '_> {
    fn request_randomness(&mut self) -> Result<Pubkey> {
        require_keys_eq!(
            *self.account.owner,
            SWITCHBOARD_PROGRAM_ID,
            LotteryError::UntrustedOracle
        );

        let randomness_data = RandomnessAccountData::parse(self.account.data.borrow())
            .map_err(|_| LotteryError::InvalidRandomnessAccount)?;

        if randomness_data.seed_slot != self.clock.slot.saturating_sub(1) {
            msg!("Seed slot: {}", randomness_data.seed_slot);
            msg!("Current slot: {}", self.clock.slot);
            return Err(LotteryError::RandomnessAlreadyRevealed.into());
        }

        Ok(self.account.key())
    }
}

pub fn process_close_lottery(ctx: Context<CloseLottery>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &mut ctx.accounts.lottery;

    let mut request = SwitchboardRequest {
        account: &ctx.accounts.randomness_account_data,
        clock: &clock,
    };

    if !lottery.close_if_expired(clock.unix_timestamp, &mut request)? {
        return match lottery.phase {
            Phase::Open => {
                msg!("Current time: {}", clock.unix_timestamp);
                msg!("End time: {}", lottery.end_time()?);
                err!(LotteryError::LotteryNotEnded)
            }
            _ => err!(LotteryError::LotteryAlreadyClosed),
        };
    }

    let request_key = ctx.accounts.randomness_account_data.key();
    msg!("Entries closed with {} participants", lottery.participants.len());
    msg!("Randomness requested: {}", request_key);

    emit!(RandomnessRequested {
        lottery: lottery.key(),
        request: request_key,
        participants: lottery.participants.len() as u64,
        requested_at: lottery.randomness_requested_at,
    });

    Ok(())
}
