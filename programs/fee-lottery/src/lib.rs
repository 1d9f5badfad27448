use anchor_lang::prelude::*;
use instructions::*;

/// Program-wide constants: PDA seeds, default timings and capacity.
pub mod constants;

/// The `LotteryError` codes returned when instructions fail.
pub mod error;

/// Events emitted at every state transition of the round.
pub mod events;

/// Instruction handlers: entering, closing, resolving and paying out.
pub mod instructions;

/// The `Lottery` account and the round's state machine.
pub mod state;

declare_id!("5u3MwLhNEwFbFh8XyuQ5TQ1UMVGSkdmhAGLe4acx5bmK");

#[program]
pub mod fee_lottery {
    use super::*;

    pub fn initialize_lottery(
        ctx: Context<InitializeLottery>,
        params: InitializeLotteryParams,
    ) -> Result<()> {
        process_initialize_lottery(ctx, params)
    }

    pub fn enter_lottery(ctx: Context<EnterLottery>, amount: u64) -> Result<()> {
        process_enter_lottery(ctx, amount)
    }

    pub fn close_lottery(ctx: Context<CloseLottery>) -> Result<()> {
        process_close_lottery(ctx)
    }

    pub fn on_randomness_received(ctx: Context<OnRandomnessReceived>) -> Result<()> {
        process_on_randomness_received(ctx)
    }

    pub fn withdrawal(ctx: Context<Withdrawal>) -> Result<()> {
        process_withdrawal(ctx)
    }

    pub fn expire_round(ctx: Context<ExpireRound>) -> Result<()> {
        process_expire_round(ctx)
    }

    pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
        process_claim_refund(ctx)
    }

    pub fn get_fee(ctx: Context<ViewLottery>) -> Result<u64> {
        process_get_fee(ctx)
    }

    pub fn get_participant(ctx: Context<ViewLottery>, index: u64) -> Result<Pubkey> {
        process_get_participant(ctx, index)
    }

    pub fn get_end_time(ctx: Context<ViewLottery>) -> Result<i64> {
        process_get_end_time(ctx)
    }
}
