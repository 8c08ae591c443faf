//! Annual benefit of a single tier against the benchmark bank

use log::debug;
use serde::{Deserialize, Serialize};

use super::perks::perk_value;
use crate::profile::{Toggles, UserProfile};
use crate::rates::{BenchmarkBank, RateTable, TierRules};

// ============================================================================
// Modeling constants
// ============================================================================
// Spend estimates used when the profile has no explicit figure. They are
// product assumptions, kept here rather than in the rate table.

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Cash withdrawn per trip abroad when no monthly figure is given
pub const ATM_SPEND_PER_TRIP: f64 = 200.0;

/// Withdrawals per trip charged by the benchmark bank
pub const ATM_WITHDRAWALS_PER_TRIP: f64 = 3.0;

/// Currency exchanged per trip abroad
pub const FX_SPEND_PER_TRIP: f64 = 500.0;

/// Currency value of one reward point
pub const REWARD_POINT_VALUE: f64 = 0.01;

/// Itemized annual result for one tier
///
/// Savings items are signed: a tier whose fee exceeds the benchmark's
/// produces a negative saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub tier: String,
    pub subscription_cost: f64,
    pub account_fee_savings: f64,
    pub transfer_savings: f64,
    pub atm_savings: f64,
    pub fx_savings: f64,
    pub deposit_interest: f64,
    pub reward_value: f64,
    pub crypto_savings: f64,
    pub stock_savings: f64,
    pub freelance_cashback: f64,
    pub partner_perk_value: f64,
    pub net_benefit: f64,
}

impl TierBreakdown {
    pub fn monthly_benefit(&self) -> f64 {
        self.net_benefit / MONTHS_PER_YEAR
    }

    /// Labeled signed amounts, subscription cost last and negative
    pub fn line_items(&self) -> [(&'static str, f64); 11] {
        [
            ("Account fee savings", self.account_fee_savings),
            ("Transfer and bill payment savings", self.transfer_savings),
            ("ATM withdrawal savings", self.atm_savings),
            ("Currency exchange savings", self.fx_savings),
            ("Deposit interest", self.deposit_interest),
            ("Reward points value", self.reward_value),
            ("Crypto trading savings", self.crypto_savings),
            ("Stock trading savings", self.stock_savings),
            ("Freelance cashback", self.freelance_cashback),
            ("Partner subscriptions value", self.partner_perk_value),
            ("Subscription cost", -self.subscription_cost),
        ]
    }
}

/// Evaluates tiers of a rate table for a profile
pub struct BenefitEngine<'a> {
    table: &'a RateTable,
}

impl<'a> BenefitEngine<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self { table }
    }

    /// Breakdown for a tier identifier, `None` if the table lacks it
    pub fn evaluate_tier(
        &self,
        tier_id: &str,
        profile: &UserProfile,
        toggles: &Toggles,
    ) -> Option<TierBreakdown> {
        self.table
            .tier(tier_id)
            .map(|rules| compute(tier_id, rules, profile, self.table, toggles))
    }

    /// Breakdowns for every tier in declared order
    pub fn evaluate_all(&self, profile: &UserProfile, toggles: &Toggles) -> Vec<TierBreakdown> {
        self.table
            .tiers
            .iter()
            .map(|(id, rules)| compute(id, rules, profile, self.table, toggles))
            .collect()
    }
}

/// Compute the annual breakdown of one tier
///
/// Pure and deterministic; inputs are expected to be non-negative (see
/// [`UserProfile::clamped`]).
pub fn compute(
    tier_id: &str,
    tier: &TierRules,
    profile: &UserProfile,
    table: &RateTable,
    toggles: &Toggles,
) -> TierBreakdown {
    let bank = &table.benchmark_bank;

    let subscription_cost = subscription_cost(tier, toggles);
    let account_fee_savings = profile.current_bank_monthly_fee * MONTHS_PER_YEAR;
    let transfer_savings = f64::from(profile.instant_transfers_per_year) * profile.cost_per_instant_transfer
        + f64::from(profile.domestic_payments_per_year) * profile.cost_per_domestic_payment;
    let atm_savings = atm_savings(tier, profile, bank);
    let fx_savings = fx_savings(tier, profile, bank);
    let deposit_interest = profile.average_liquidity * tier.deposit_interest_rate;
    let reward_value = reward_value(tier, profile);
    let crypto_savings =
        profile.monthly_crypto_volume * MONTHS_PER_YEAR * (bank.crypto_fee_percent - tier.fees.crypto_rate);
    let stock_savings =
        profile.monthly_stock_volume * MONTHS_PER_YEAR * (bank.stock_fee_percent - tier.fees.stock_rate);
    let freelance_cashback = profile.monthly_freelance_revenue * MONTHS_PER_YEAR * tier.pro_cashback_rate;
    let partner_perk_value = perk_value(tier_id, &toggles.selected_perks, &table.partners);

    let net_benefit = (account_fee_savings
        + transfer_savings
        + atm_savings
        + fx_savings
        + deposit_interest
        + reward_value
        + freelance_cashback
        + crypto_savings
        + stock_savings
        + partner_perk_value)
        - subscription_cost;

    debug!("Tier {}: subscription {:.2}, net {:.2}", tier_id, subscription_cost, net_benefit);

    TierBreakdown {
        tier: tier_id.to_string(),
        subscription_cost,
        account_fee_savings,
        transfer_savings,
        atm_savings,
        fx_savings,
        deposit_interest,
        reward_value,
        crypto_savings,
        stock_savings,
        freelance_cashback,
        partner_perk_value,
        net_benefit,
    }
}

/// Annual price of the tier under the chosen billing and duo settings
pub fn subscription_cost(tier: &TierRules, toggles: &Toggles) -> f64 {
    let base = if toggles.annual_billing {
        tier.annual_cost
    } else {
        tier.monthly_cost * MONTHS_PER_YEAR
    };

    if toggles.duo_mode {
        base + tier.duo_addon_monthly_cost * MONTHS_PER_YEAR
    } else {
        base
    }
}

/// Yearly cash withdrawn, from the monthly figure or the trip estimate
pub fn annual_atm_spend(profile: &UserProfile) -> f64 {
    if profile.monthly_atm_withdrawal > 0.0 {
        profile.monthly_atm_withdrawal * MONTHS_PER_YEAR
    } else {
        f64::from(profile.trips_abroad_per_year) * ATM_SPEND_PER_TRIP
    }
}

/// Benchmark withdrawal fees minus the tier's overage fee
pub fn atm_savings(tier: &TierRules, profile: &UserProfile, bank: &BenchmarkBank) -> f64 {
    let trips = f64::from(profile.trips_abroad_per_year);
    let bank_cost = (trips * ATM_WITHDRAWALS_PER_TRIP) * bank.atm_fee_abroad;
    let tier_fee = overage(annual_atm_spend(profile), tier.limits.atm_withdrawal_monthly_cap)
        * tier.fees.atm_overage_rate;
    bank_cost - tier_fee
}

/// Benchmark exchange fees minus the tier's overage fee
pub fn fx_savings(tier: &TierRules, profile: &UserProfile, bank: &BenchmarkBank) -> f64 {
    let fx_spend = f64::from(profile.trips_abroad_per_year) * FX_SPEND_PER_TRIP;
    let bank_cost = fx_spend * bank.fx_fee_percent;
    let tier_fee = overage(fx_spend, tier.limits.fx_monthly_cap) * tier.fees.fx_overage_rate;
    bank_cost - tier_fee
}

/// Currency value of the points earned on card spend
pub fn reward_value(tier: &TierRules, profile: &UserProfile) -> f64 {
    if tier.reward_rate > 0.0 {
        let points = (profile.monthly_card_spend * MONTHS_PER_YEAR / tier.reward_step_amount) * tier.reward_rate;
        points * REWARD_POINT_VALUE
    } else {
        0.0
    }
}

/// Annual spend above twelve months of a monthly cap
fn overage(annual_spend: f64, monthly_cap: f64) -> f64 {
    (annual_spend - monthly_cap * MONTHS_PER_YEAR).max(0.0)
}
