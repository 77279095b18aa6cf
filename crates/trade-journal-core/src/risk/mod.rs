pub mod reward;
pub mod sizing;

pub use reward::{r_multiple, risk_reward};
pub use sizing::{position_sizing, price_based_sizing};
