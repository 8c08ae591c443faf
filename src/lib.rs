//! Tier Compare - annual benefit calculator for subscription banking tiers
//!
//! This library provides:
//! - A validated rate table of tiers, benchmark bank fees and partner perks
//! - The per-tier benefit calculation and ranking against the benchmark bank
//! - Report and CSV renderings of tier breakdowns
//! - An append-only lead log
//! - A domain-restricted assistant with an offline fallback
//! - The JSON request/response contract used by the service shells

pub mod rates;
pub mod profile;
pub mod calculator;
pub mod report;
pub mod leads;
pub mod assistant;
pub mod service;

// Re-export commonly used types
pub use rates::{RateTable, TierRules, PartnerPerk, PerkThreshold};
pub use profile::{UserProfile, Toggles};
pub use calculator::{BenefitEngine, TierBreakdown, Comparison, compute, rank};
pub use service::{CompareRequest, CompareResponse, handle_compare};
