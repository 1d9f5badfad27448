pub mod claim_refund;
pub mod close_lottery;
pub mod enter_lottery;
pub mod expire_round;
pub mod initialize;
pub mod on_randomness_received;
pub mod views;
pub mod withdrawal;

pub use claim_refund::*;
pub use close_lottery::*;
pub use enter_lottery::*;
pub use expire_round::*;
pub use initialize::*;
pub use on_randomness_received::*;
pub use views::*;
pub use withdrawal::*;
