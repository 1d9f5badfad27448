use anchor_lang::prelude::*;
use arrayref::array_ref;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::LOTTERY_SEED;
use crate::error::LotteryError;
use crate::events::WinnerSelected;
use crate::state::Lottery;

/// Accounts required to consume the oracle's response.
///
/// This ensures that:
/// 1. The randomness account is owned by the trusted oracle.
/// 2. The randomness account is the one recorded when entry closed.
/// 3. The oracle has revealed its value.
#[derive(Accounts)]
pub struct OnRandomnessReceived<'info> {
    /// Account paying for any transaction fees.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The main lottery state account.
    #[account(
        mut,
        seeds = [LOTTERY_SEED.as_bytes()],
        bump = lottery.bump,
    )]
    pub lottery: Account<'info, Lottery>,

    /// The randomness oracle account providing verifiable randomness.
    /// CHECK: The account's owner and data are validated within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Reads the drawn value from the first eight revealed bytes.
pub fn random_value_from_bytes(revealed: &[u8; 32]) -> u64 {
    u64::from_le_bytes(*array_ref![revealed, 0, 8])
}

pub fn process_on_randomness_received(ctx: Context<OnRandomnessReceived>) -> Result<()> {
    let clock = Clock::get()?;
    let randomness_account = &ctx.accounts.randomness_account_data;
    let request_id = randomness_account.key();
    let lottery = &mut ctx.accounts.lottery;

    lottery.verify_randomness_response(randomness_account.owner, &request_id)?;

    let revealed_random_value = {
        let randomness_data = RandomnessAccountData::parse(randomness_account.data.borrow())
            .map_err(|_| LotteryError::InvalidRandomnessAccount)?;
        randomness_data
            .get_value(&clock)
            .map_err(|_| LotteryError::RandomnessNotResolved)?
    };
    let random_value = random_value_from_bytes(&revealed_random_value);

    msg!("Randomness result: {}", random_value);
    msg!("Participants: {}", lottery.participants.len());

    let winner =
        lottery.on_randomness_received(randomness_account.owner, &request_id, random_value)?;

    match winner {
        Some(winner) => msg!("Winner: {}", winner),
        None => msg!("No participants, round resolved without a winner"),
    }

    emit!(WinnerSelected {
        lottery: lottery.key(),
        request: request_id,
        winner,
        pool: lottery.pool,
    });

    Ok(())
}
