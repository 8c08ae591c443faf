//! User banking profile and comparison toggles
//!
//! Both are rebuilt from the caller's input on every recalculation. Missing
//! JSON/CSV fields take the defaults below, which describe a typical user.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::rates::RateTable;

/// How a user currently banks; monetary amounts in a single currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Account fee charged by the current bank each month
    pub current_bank_monthly_fee: f64,

    pub instant_transfers_per_year: u32,
    pub cost_per_instant_transfer: f64,

    /// Domestic bill payments (e.g. PagoPA) per year
    pub domestic_payments_per_year: u32,
    pub cost_per_domestic_payment: f64,

    pub monthly_card_spend: f64,
    pub trips_abroad_per_year: u32,

    /// Cash withdrawn per month; 0 means estimate from trips abroad
    pub monthly_atm_withdrawal: f64,

    /// Balance kept on the account, earning deposit interest
    pub average_liquidity: f64,

    /// Collected for context only, not priced
    pub lounge_visits_per_year: u32,

    /// Collected for context only, not priced
    pub international_transfers_per_year: u32,

    /// Revenue flowing through a freelance/business account per month
    pub monthly_freelance_revenue: f64,

    pub monthly_crypto_volume: f64,
    pub monthly_stock_volume: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            current_bank_monthly_fee: 10.0,
            instant_transfers_per_year: 12,
            cost_per_instant_transfer: 2.0,
            domestic_payments_per_year: 12,
            cost_per_domestic_payment: 1.5,
            monthly_card_spend: 400.0,
            trips_abroad_per_year: 2,
            monthly_atm_withdrawal: 0.0,
            average_liquidity: 1000.0,
            lounge_visits_per_year: 1,
            international_transfers_per_year: 2,
            monthly_freelance_revenue: 100.0,
            monthly_crypto_volume: 0.0,
            monthly_stock_volume: 0.0,
        }
    }
}

/// Largest accepted monetary amount; keeps every annualized figure finite
pub const MAX_AMOUNT: f64 = 1e12;

impl UserProfile {
    /// Replace negative or non-finite amounts with zero and cap the rest
    /// at [`MAX_AMOUNT`]
    ///
    /// The calculator assumes bounded non-negative input; callers at the
    /// input boundary run this before computing.
    pub fn clamped(mut self) -> Self {
        for amount in [
            &mut self.current_bank_monthly_fee,
            &mut self.cost_per_instant_transfer,
            &mut self.cost_per_domestic_payment,
            &mut self.monthly_card_spend,
            &mut self.monthly_atm_withdrawal,
            &mut self.average_liquidity,
            &mut self.monthly_freelance_revenue,
            &mut self.monthly_crypto_volume,
            &mut self.monthly_stock_volume,
        ] {
            if !amount.is_finite() || *amount < 0.0 {
                *amount = 0.0;
            } else if *amount > MAX_AMOUNT {
                *amount = MAX_AMOUNT;
            }
        }
        self
    }
}

/// Global switches applied to every tier in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// Pay yearly instead of twelve monthly fees
    pub annual_billing: bool,

    /// Cover two people with the duo add-on
    pub duo_mode: bool,

    /// Partner perk names the user would actually use
    pub selected_perks: BTreeSet<String>,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            annual_billing: true,
            duo_mode: false,
            selected_perks: BTreeSet::new(),
        }
    }
}

impl Toggles {
    pub fn with_perks<I, S>(mut self, perks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_perks.extend(perks.into_iter().map(Into::into));
        self
    }

    /// Selected perk names that the rate table does not know about
    pub fn unknown_perks<'a>(&'a self, table: &RateTable) -> Vec<&'a str> {
        self.selected_perks
            .iter()
            .filter(|name| table.partner(name).is_none())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute;

    #[test]
    fn test_missing_fields_take_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{ "monthly_card_spend": 1500, "trips_abroad_per_year": 6 }"#).unwrap();
        assert_eq!(profile.monthly_card_spend, 1500.0);
        assert_eq!(profile.trips_abroad_per_year, 6);
        assert_eq!(profile.current_bank_monthly_fee, 10.0);
        assert_eq!(profile.average_liquidity, 1000.0);

        let toggles: Toggles = serde_json::from_str("{}").unwrap();
        assert!(toggles.annual_billing);
        assert!(!toggles.duo_mode);
        assert!(toggles.selected_perks.is_empty());
    }

    #[test]
    fn test_clamped_zeroes_negative_amounts() {
        let profile = UserProfile {
            monthly_card_spend: -50.0,
            average_liquidity: f64::NAN,
            monthly_stock_volume: 250.0,
            ..Default::default()
        }
        .clamped();

        assert_eq!(profile.monthly_card_spend, 0.0);
        assert_eq!(profile.average_liquidity, 0.0);
        assert_eq!(profile.monthly_stock_volume, 250.0);
    }

    #[test]
    fn test_clamped_caps_huge_amounts() {
        let table = RateTable::builtin();
        let profile = UserProfile {
            monthly_card_spend: 1e308,
            average_liquidity: f64::MAX,
            instant_transfers_per_year: u32::MAX,
            cost_per_instant_transfer: 1e300,
            ..Default::default()
        }
        .clamped();

        assert_eq!(profile.monthly_card_spend, MAX_AMOUNT);
        assert_eq!(profile.cost_per_instant_transfer, MAX_AMOUNT);
        for (id, rules) in &table.tiers {
            let b = compute(id, rules, &profile, &table, &Toggles::default());
            assert!(b.net_benefit.is_finite(), "{} net benefit {}", id, b.net_benefit);
            assert!(b.reward_value.is_finite());
        }
    }

    #[test]
    fn test_unknown_perks() {
        let table = RateTable::builtin();
        let toggles = Toggles::default().with_perks(["NordVPN", "Spotify"]);
        assert_eq!(toggles.unknown_perks(&table), vec!["Spotify"]);
    }
}
