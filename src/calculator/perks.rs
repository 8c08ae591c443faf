//! Partner perk eligibility and valuation

use std::collections::BTreeSet;

use crate::rates::{PartnerPerk, PerkThreshold};

/// Tiers that unlock `Premium` perks
pub const PREMIUM_PERK_TIERS: [&str; 3] = ["Premium", "Metal", "Ultra"];

/// Tiers that unlock `Metal` perks
pub const METAL_PERK_TIERS: [&str; 2] = ["Metal", "Ultra"];

/// Whether a tier receives perks with the given threshold
///
/// Eligibility is tied to tier names, not price order: a tier outside
/// Premium/Metal/Ultra never receives perks.
pub fn is_eligible(tier_id: &str, threshold: PerkThreshold) -> bool {
    match threshold {
        PerkThreshold::Premium => PREMIUM_PERK_TIERS.contains(&tier_id),
        PerkThreshold::Metal => METAL_PERK_TIERS.contains(&tier_id),
    }
}

/// Annual value of the selected perks a tier includes
///
/// Sums in catalog order; selected names missing from the catalog are
/// ignored.
pub fn perk_value(tier_id: &str, selected: &BTreeSet<String>, partners: &[PartnerPerk]) -> f64 {
    partners
        .iter()
        .filter(|perk| selected.contains(&perk.name))
        .filter(|perk| is_eligible(tier_id, perk.minimum_tier))
        .map(|perk| perk.annual_value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateTable;

    fn selected(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_metal_perk_eligibility() {
        let table = RateTable::builtin();
        let ft = selected(&["Financial Times"]);

        assert_eq!(perk_value("Premium", &ft, &table.partners), 0.0);
        assert_eq!(perk_value("Metal", &ft, &table.partners), 300.0);
        assert_eq!(perk_value("Ultra", &ft, &table.partners), 300.0);
    }

    #[test]
    fn test_premium_perk_eligibility() {
        let table = RateTable::builtin();
        let vpn = selected(&["NordVPN"]);

        assert_eq!(perk_value("Standard", &vpn, &table.partners), 0.0);
        assert_eq!(perk_value("Plus", &vpn, &table.partners), 0.0);
        assert_eq!(perk_value("Premium", &vpn, &table.partners), 80.0);
        assert_eq!(perk_value("Metal", &vpn, &table.partners), 80.0);
        assert_eq!(perk_value("Ultra", &vpn, &table.partners), 80.0);
    }

    #[test]
    fn test_unlisted_tier_gets_nothing() {
        let table = RateTable::builtin();
        let all: BTreeSet<String> = table.partners.iter().map(|p| p.name.clone()).collect();
        assert_eq!(perk_value("Business", &all, &table.partners), 0.0);
    }

    #[test]
    fn test_unknown_names_ignored() {
        let table = RateTable::builtin();
        let picks = selected(&["NordVPN", "Financial Times", "Netflix"]);
        assert_eq!(perk_value("Metal", &picks, &table.partners), 380.0);
        assert_eq!(perk_value("Premium", &picks, &table.partners), 80.0);
    }
}
