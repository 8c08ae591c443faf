//! Tier fee schedules, benchmark bank costs and the partner perk catalog
//!
//! Field names follow the English schema; the Italian keys used by older
//! `rules.json` files are accepted as aliases when deserializing.

use serde::{Deserialize, Serialize};

use super::RateTableError;

/// Monthly cap value used by tiers with no practical limit
pub const UNLIMITED_CAP: f64 = 999_999_999.0;

/// Free monthly allowances before overage fees apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Fee-free ATM withdrawals per month (currency units)
    #[serde(alias = "prelievi_atm")]
    pub atm_withdrawal_monthly_cap: f64,

    /// Fee-free currency exchange per month (currency units)
    #[serde(alias = "cambio_valuta")]
    pub fx_monthly_cap: f64,
}

/// Percentage fees charged by a tier, as fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierFees {
    /// Charged on ATM withdrawals above the monthly cap
    #[serde(alias = "prelievi_atm_over")]
    pub atm_overage_rate: f64,

    /// Charged on currency exchange above the monthly cap
    #[serde(alias = "cambio_valuta_over")]
    pub fx_overage_rate: f64,

    #[serde(alias = "crypto")]
    pub crypto_rate: f64,

    #[serde(alias = "borsa")]
    pub stock_rate: f64,
}

/// Pricing and benefit rules of a single subscription tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRules {
    #[serde(alias = "costo_mensile")]
    pub monthly_cost: f64,

    /// Price when billed yearly (normally below 12 monthly payments)
    #[serde(alias = "costo_annuale")]
    pub annual_cost: f64,

    /// Extra monthly fee to cover a second person
    #[serde(alias = "costo_duo_addon")]
    pub duo_addon_monthly_cost: f64,

    #[serde(alias = "limiti")]
    pub limits: TierLimits,

    #[serde(alias = "commissioni")]
    pub fees: TierFees,

    /// Annual interest paid on deposited liquidity
    #[serde(alias = "interessi_deposito")]
    pub deposit_interest_rate: f64,

    /// Reward points earned per `reward_step_amount` of card spend
    #[serde(alias = "revpoints_rate")]
    pub reward_rate: f64,

    #[serde(alias = "revpoints_step")]
    pub reward_step_amount: f64,

    /// Cashback on freelance (business account) revenue
    #[serde(alias = "cashback_pro")]
    pub pro_cashback_rate: f64,
}

/// Fee schedule of the traditional bank the user is leaving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBank {
    /// Flat fee per ATM withdrawal abroad
    #[serde(alias = "fee_atm_altri")]
    pub atm_fee_abroad: f64,

    #[serde(alias = "fee_cambio_valuta")]
    pub fx_fee_percent: f64,

    #[serde(alias = "fee_crypto")]
    pub crypto_fee_percent: f64,

    #[serde(alias = "fee_borsa")]
    pub stock_fee_percent: f64,
}

impl Default for BenchmarkBank {
    /// Typical high-street current account
    fn default() -> Self {
        Self {
            atm_fee_abroad: 2.50,
            fx_fee_percent: 0.02,
            crypto_fee_percent: 0.025,
            stock_fee_percent: 0.007,
        }
    }
}

/// Lowest tier from which a partner perk is unlocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerkThreshold {
    Premium,
    Metal,
}

impl PerkThreshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerkThreshold::Premium => "Premium",
            PerkThreshold::Metal => "Metal",
        }
    }
}

/// Third-party subscription bundled with the higher tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerPerk {
    pub name: String,

    /// Retail value of the subscription per year
    #[serde(alias = "val")]
    pub annual_value: f64,

    #[serde(alias = "min_plan")]
    pub minimum_tier: PerkThreshold,
}

/// Complete rate configuration shared by every calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Tiers in declared order, keyed by unique identifier
    #[serde(alias = "piani", with = "ordered_tiers")]
    pub tiers: Vec<(String, TierRules)>,

    #[serde(alias = "benchmark_banca", default)]
    pub benchmark_bank: BenchmarkBank,

    #[serde(alias = "partners_list", default)]
    pub partners: Vec<PartnerPerk>,
}

impl RateTable {
    /// Look up the rules for a tier identifier
    pub fn tier(&self, id: &str) -> Option<&TierRules> {
        self.tiers
            .iter()
            .find(|(tier_id, _)| tier_id == id)
            .map(|(_, rules)| rules)
    }

    /// Tier identifiers in declared order
    pub fn tier_ids(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|(id, _)| id.as_str())
    }

    pub fn partner(&self, name: &str) -> Option<&PartnerPerk> {
        self.partners.iter().find(|p| p.name == name)
    }

    /// Check every invariant the calculator relies on
    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.tiers.is_empty() {
            return Err(RateTableError::EmptyTable);
        }

        for (idx, (id, rules)) in self.tiers.iter().enumerate() {
            if self.tiers[..idx].iter().any(|(seen, _)| seen == id) {
                return Err(RateTableError::DuplicateTier(id.clone()));
            }
            rules.validate(id)?;
        }

        let bank = &self.benchmark_bank;
        non_negative("benchmark_bank.atm_fee_abroad", bank.atm_fee_abroad)?;
        non_negative("benchmark_bank.fx_fee_percent", bank.fx_fee_percent)?;
        non_negative("benchmark_bank.crypto_fee_percent", bank.crypto_fee_percent)?;
        non_negative("benchmark_bank.stock_fee_percent", bank.stock_fee_percent)?;

        for (idx, perk) in self.partners.iter().enumerate() {
            if self.partners[..idx].iter().any(|p| p.name == perk.name) {
                return Err(RateTableError::DuplicatePartner(perk.name.clone()));
            }
            non_negative(&format!("partners.{}.annual_value", perk.name), perk.annual_value)?;
        }

        Ok(())
    }

    /// Built-in table used when no external rate file is available
    pub fn builtin() -> Self {
        Self {
            tiers: vec![
                (
                    "Standard".to_string(),
                    TierRules {
                        monthly_cost: 0.00,
                        annual_cost: 0.00,
                        duo_addon_monthly_cost: 0.00,
                        limits: TierLimits {
                            atm_withdrawal_monthly_cap: 200.0,
                            fx_monthly_cap: 1000.0,
                        },
                        fees: TierFees {
                            atm_overage_rate: 0.02,
                            fx_overage_rate: 0.01,
                            crypto_rate: 0.0149,
                            stock_rate: 0.0025,
                        },
                        deposit_interest_rate: 0.015,
                        reward_rate: 1.0,
                        reward_step_amount: 10.0,
                        pro_cashback_rate: 0.004,
                    },
                ),
                (
                    "Plus".to_string(),
                    TierRules {
                        monthly_cost: 3.99,
                        annual_cost: 40.00,
                        duo_addon_monthly_cost: 2.00,
                        limits: TierLimits {
                            atm_withdrawal_monthly_cap: 200.0,
                            fx_monthly_cap: 3000.0,
                        },
                        fees: TierFees {
                            atm_overage_rate: 0.02,
                            fx_overage_rate: 0.005,
                            crypto_rate: 0.0149,
                            stock_rate: 0.0025,
                        },
                        deposit_interest_rate: 0.015,
                        reward_rate: 1.0,
                        reward_step_amount: 10.0,
                        pro_cashback_rate: 0.004,
                    },
                ),
                (
                    "Premium".to_string(),
                    TierRules {
                        monthly_cost: 9.99,
                        annual_cost: 100.00,
                        duo_addon_monthly_cost: 4.00,
                        limits: TierLimits {
                            atm_withdrawal_monthly_cap: 400.0,
                            fx_monthly_cap: UNLIMITED_CAP,
                        },
                        fees: TierFees {
                            atm_overage_rate: 0.02,
                            fx_overage_rate: 0.0,
                            crypto_rate: 0.0099,
                            stock_rate: 0.0025,
                        },
                        deposit_interest_rate: 0.02,
                        reward_rate: 1.0,
                        reward_step_amount: 4.0,
                        pro_cashback_rate: 0.006,
                    },
                ),
                (
                    "Metal".to_string(),
                    TierRules {
                        monthly_cost: 15.99,
                        annual_cost: 160.00,
                        duo_addon_monthly_cost: 6.00,
                        limits: TierLimits {
                            atm_withdrawal_monthly_cap: 800.0,
                            fx_monthly_cap: UNLIMITED_CAP,
                        },
                        fees: TierFees {
                            atm_overage_rate: 0.02,
                            fx_overage_rate: 0.0,
                            crypto_rate: 0.0099,
                            stock_rate: 0.0025,
                        },
                        deposit_interest_rate: 0.0225,
                        reward_rate: 1.0,
                        reward_step_amount: 2.0,
                        pro_cashback_rate: 0.008,
                    },
                ),
                (
                    "Ultra".to_string(),
                    TierRules {
                        monthly_cost: 55.00,
                        annual_cost: 540.00,
                        duo_addon_monthly_cost: 15.00,
                        limits: TierLimits {
                            atm_withdrawal_monthly_cap: 2000.0,
                            fx_monthly_cap: UNLIMITED_CAP,
                        },
                        fees: TierFees {
                            atm_overage_rate: 0.02,
                            fx_overage_rate: 0.0,
                            crypto_rate: 0.0049,
                            stock_rate: 0.0012,
                        },
                        deposit_interest_rate: 0.025,
                        reward_rate: 1.0,
                        reward_step_amount: 1.0,
                        pro_cashback_rate: 0.01,
                    },
                ),
            ],
            benchmark_bank: BenchmarkBank::default(),
            partners: vec![
                perk("NordVPN", 80.0, PerkThreshold::Premium),
                perk("Corriere della Sera", 100.0, PerkThreshold::Premium),
                perk("Gazzetta dello Sport", 60.0, PerkThreshold::Premium),
                perk("Tinder", 80.0, PerkThreshold::Premium),
                perk("Headspace", 60.0, PerkThreshold::Premium),
                perk("Freeletics", 80.0, PerkThreshold::Premium),
                perk("Picsart", 35.0, PerkThreshold::Premium),
                perk("Sleep Cycle", 30.0, PerkThreshold::Premium),
                perk("Perplexity (AI)", 200.0, PerkThreshold::Premium),
                perk("Financial Times", 300.0, PerkThreshold::Metal),
                perk("WeWork", 300.0, PerkThreshold::Metal),
                perk("MasterClass", 180.0, PerkThreshold::Metal),
                perk("The Athletic", 70.0, PerkThreshold::Metal),
                perk("Chess.com", 100.0, PerkThreshold::Metal),
                perk("Headway", 90.0, PerkThreshold::Metal),
            ],
        }
    }
}

impl TierRules {
    fn validate(&self, id: &str) -> Result<(), RateTableError> {
        let field = |name: &str| format!("tiers.{id}.{name}");

        non_negative(&field("monthly_cost"), self.monthly_cost)?;
        non_negative(&field("annual_cost"), self.annual_cost)?;
        non_negative(&field("duo_addon_monthly_cost"), self.duo_addon_monthly_cost)?;
        non_negative(&field("limits.atm_withdrawal_monthly_cap"), self.limits.atm_withdrawal_monthly_cap)?;
        non_negative(&field("limits.fx_monthly_cap"), self.limits.fx_monthly_cap)?;
        fraction(&field("fees.atm_overage_rate"), self.fees.atm_overage_rate)?;
        fraction(&field("fees.fx_overage_rate"), self.fees.fx_overage_rate)?;
        fraction(&field("fees.crypto_rate"), self.fees.crypto_rate)?;
        fraction(&field("fees.stock_rate"), self.fees.stock_rate)?;
        fraction(&field("deposit_interest_rate"), self.deposit_interest_rate)?;
        non_negative(&field("reward_rate"), self.reward_rate)?;
        fraction(&field("pro_cashback_rate"), self.pro_cashback_rate)?;

        if !(self.reward_step_amount.is_finite() && self.reward_step_amount > 0.0) {
            return Err(RateTableError::Invalid {
                field: field("reward_step_amount"),
                reason: format!("must be greater than zero, got {}", self.reward_step_amount),
            });
        }

        Ok(())
    }
}

fn perk(name: &str, annual_value: f64, minimum_tier: PerkThreshold) -> PartnerPerk {
    PartnerPerk {
        name: name.to_string(),
        annual_value,
        minimum_tier,
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RateTableError::Invalid {
            field: field.to_string(),
            reason: format!("must be a non-negative number, got {value}"),
        })
    }
}

fn fraction(field: &str, value: f64) -> Result<(), RateTableError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RateTableError::Invalid {
            field: field.to_string(),
            reason: format!("must be within [0, 1], got {value}"),
        })
    }
}

/// Serializes the tier list as a JSON object, keeping document order
mod ordered_tiers {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::TierRules;

    pub fn serialize<S>(tiers: &[(String, TierRules)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(tiers.len()))?;
        for (id, rules) in tiers {
            map.serialize_entry(id, rules)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, TierRules)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TiersVisitor)
    }

    struct TiersVisitor;

    impl<'de> Visitor<'de> for TiersVisitor {
        type Value = Vec<(String, TierRules)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of tier identifiers to tier rules")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut tiers: Vec<(String, TierRules)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, rules)) = map.next_entry::<String, TierRules>()? {
                if tiers.iter().any(|(seen, _)| *seen == id) {
                    return Err(de::Error::custom(format!("duplicate tier `{id}`")));
                }
                tiers.push((id, rules));
            }
            Ok(tiers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let table = RateTable::builtin();
        assert!(table.validate().is_ok());
        assert_eq!(
            table.tier_ids().collect::<Vec<_>>(),
            vec!["Standard", "Plus", "Premium", "Metal", "Ultra"]
        );
        assert_eq!(table.partners.len(), 15);
    }

    #[test]
    fn test_tier_lookup() {
        let table = RateTable::builtin();
        assert_eq!(table.tier("Metal").map(|t| t.annual_cost), Some(160.0));
        assert!(table.tier("Gold").is_none());
        assert_eq!(
            table.partner("WeWork").map(|p| p.minimum_tier),
            Some(PerkThreshold::Metal)
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut table = RateTable::builtin();
        table.tiers.clear();
        assert!(matches!(table.validate(), Err(RateTableError::EmptyTable)));
    }

    #[test]
    fn test_zero_reward_step_rejected() {
        let mut table = RateTable::builtin();
        table.tiers[1].1.reward_step_amount = 0.0;
        match table.validate() {
            Err(RateTableError::Invalid { field, .. }) => {
                assert_eq!(field, "tiers.Plus.reward_step_amount");
            }
            other => panic!("expected invalid step, got {:?}", other),
        }
    }

    #[test]
    fn test_fee_outside_unit_interval_rejected() {
        let mut table = RateTable::builtin();
        table.tiers[0].1.fees.crypto_rate = 1.5;
        assert!(matches!(table.validate(), Err(RateTableError::Invalid { .. })));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut table = RateTable::builtin();
        let copy = table.tiers[0].clone();
        table.tiers.push(copy);
        assert!(matches!(table.validate(), Err(RateTableError::DuplicateTier(id)) if id == "Standard"));

        let mut table = RateTable::builtin();
        let copy = table.partners[3].clone();
        table.partners.push(copy);
        assert!(matches!(table.validate(), Err(RateTableError::DuplicatePartner(name)) if name == "Tinder"));
    }

    #[test]
    fn test_serialization_keeps_tier_order() {
        let table = RateTable::builtin();
        let json = serde_json::to_string(&table).unwrap();
        let standard = json.find("\"Standard\"").unwrap();
        let ultra = json.find("\"Ultra\"").unwrap();
        assert!(standard < ultra);

        let back: RateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
