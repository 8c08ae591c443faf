//! Ranking tiers by net benefit

use log::info;
use serde::Serialize;

use super::engine::{BenefitEngine, TierBreakdown};
use crate::profile::{Toggles, UserProfile};
use crate::rates::RateTable;

/// Breakdowns for every tier of a table, in declared order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    breakdowns: Vec<TierBreakdown>,
}

impl Comparison {
    pub fn new(breakdowns: Vec<TierBreakdown>) -> Self {
        Self { breakdowns }
    }

    pub fn breakdowns(&self) -> &[TierBreakdown] {
        &self.breakdowns
    }

    pub fn into_breakdowns(self) -> Vec<TierBreakdown> {
        self.breakdowns
    }

    /// Tier with the highest net benefit; the earliest tier wins ties
    ///
    /// Only `None` for an empty comparison, which a validated rate table
    /// never produces.
    pub fn best(&self) -> Option<&TierBreakdown> {
        self.breakdowns.iter().fold(None, |best, candidate| match best {
            Some(current) if current.net_benefit >= candidate.net_benefit => Some(current),
            _ => Some(candidate),
        })
    }

    /// Breakdown of the tier the user is inspecting
    pub fn get(&self, tier_id: &str) -> Option<&TierBreakdown> {
        self.breakdowns.iter().find(|b| b.tier == tier_id)
    }

    pub fn is_best(&self, tier_id: &str) -> bool {
        self.best().is_some_and(|b| b.tier == tier_id)
    }
}

/// Evaluate every tier of the table for a profile
///
/// Always recomputes all tiers; nothing is cached between calls.
pub fn rank(table: &RateTable, profile: &UserProfile, toggles: &Toggles) -> Comparison {
    let comparison = Comparison::new(BenefitEngine::new(table).evaluate_all(profile, toggles));
    if let Some(best) = comparison.best() {
        info!("Best tier {} with net benefit {:.2}", best.tier, best.net_benefit);
    }
    comparison
}
