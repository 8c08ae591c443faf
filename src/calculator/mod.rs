//! Tier benefit calculation, perk valuation and ranking

mod engine;
pub mod perks;
pub mod ranking;

pub use engine::{
    annual_atm_spend, atm_savings, compute, fx_savings, reward_value, subscription_cost,
    BenefitEngine, TierBreakdown,
};
pub use engine::{
    ATM_SPEND_PER_TRIP, ATM_WITHDRAWALS_PER_TRIP, FX_SPEND_PER_TRIP, MONTHS_PER_YEAR,
    REWARD_POINT_VALUE,
};
pub use perks::{is_eligible, perk_value};
pub use ranking::{rank, Comparison};
