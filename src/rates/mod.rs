//! Rate table configuration: tier rules, benchmark bank and partner perks

mod table;
pub mod loader;

pub use table::{
    BenchmarkBank, PartnerPerk, PerkThreshold, RateTable, TierFees, TierLimits, TierRules,
    UNLIMITED_CAP,
};
pub use loader::{RateSource, RateTableError, DEFAULT_RATES_PATH};
