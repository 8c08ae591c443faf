//! JSON request/response contract for service shells (Lambda, CLI)

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::calculator::{rank, TierBreakdown};
use crate::profile::{Toggles, UserProfile};
use crate::rates::RateTable;

/// Comparison request; every field is optional in JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareRequest {
    pub profile: UserProfile,
    pub toggles: Toggles,

    /// Tier to inspect; defaults to the best one
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    /// Tier with the highest net benefit
    pub best: String,

    /// Tier whose breakdown the caller is inspecting
    pub selected: String,

    /// Whether the selected tier is also the best one
    pub recommended: bool,

    /// Selected perk names missing from the catalog
    pub ignored_perks: Vec<String>,

    /// Every tier in rate-table order
    pub tiers: Vec<TierBreakdown>,
}

impl CompareResponse {
    pub fn selected_breakdown(&self) -> Option<&TierBreakdown> {
        self.tiers.iter().find(|b| b.tier == self.selected)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown tier `{0}`")]
    UnknownTier(String),

    #[error("rate table defines no tiers")]
    EmptyTable,
}

/// Clamp the profile, rank every tier and resolve the inspected one
pub fn handle_compare(table: &RateTable, request: CompareRequest) -> Result<CompareResponse, ServiceError> {
    let profile = request.profile.clamped();
    let toggles = request.toggles;

    let ignored_perks: Vec<String> = toggles
        .unknown_perks(table)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !ignored_perks.is_empty() {
        warn!("Ignoring unknown partner perks: {}", ignored_perks.join(", "));
    }

    let comparison = rank(table, &profile, &toggles);
    let best = comparison.best().ok_or(ServiceError::EmptyTable)?.tier.clone();

    let selected = match request.tier {
        Some(tier) if comparison.get(&tier).is_none() => return Err(ServiceError::UnknownTier(tier)),
        Some(tier) => tier,
        None => best.clone(),
    };

    Ok(CompareResponse {
        recommended: selected == best,
        best,
        selected,
        ignored_perks,
        tiers: comparison.into_breakdowns(),
    })
}

/// HTTP status and JSON payload for a raw request body
///
/// A blank body means all defaults. Malformed JSON is a 400, an unknown
/// tier a 422.
pub fn compare_body(table: &RateTable, body: &[u8]) -> (u16, Value) {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CompareRequest::default()
    } else {
        match serde_json::from_slice::<CompareRequest>(body) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected request body: {}", e);
                return (400, error_body(format!("invalid request body: {}", e)));
            }
        }
    };

    match handle_compare(table, request) {
        Ok(response) => {
            info!("Best tier {} (selected {})", response.best, response.selected);
            match serde_json::to_value(&response) {
                Ok(value) => (200, value),
                Err(e) => (500, error_body(e.to_string())),
            }
        }
        Err(e) => (422, error_body(e.to_string())),
    }
}

fn error_body(message: String) -> Value {
    json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_request_uses_defaults() {
        let request: CompareRequest = serde_json::from_str("{}").unwrap();
        let response = handle_compare(&RateTable::builtin(), request).unwrap();

        assert_eq!(response.best, "Standard");
        assert_eq!(response.selected, "Standard");
        assert!(response.recommended);
        assert_eq!(response.tiers.len(), 5);
    }

    #[test]
    fn test_selected_tier() {
        let request = CompareRequest {
            tier: Some("Ultra".to_string()),
            ..Default::default()
        };
        let response = handle_compare(&RateTable::builtin(), request).unwrap();

        assert_eq!(response.selected, "Ultra");
        assert!(!response.recommended);
        let ultra = response.selected_breakdown().unwrap();
        assert_abs_diff_eq!(ultra.net_benefit, -258.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_tier_is_error() {
        let request = CompareRequest {
            tier: Some("Gold".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            handle_compare(&RateTable::builtin(), request),
            Err(ServiceError::UnknownTier(t)) if t == "Gold"
        ));
    }

    #[test]
    fn test_compare_body_status_codes() {
        let table = RateTable::builtin();

        let (status, body) = compare_body(&table, b"");
        assert_eq!(status, 200);
        assert_eq!(body["best"], "Standard");
        assert_eq!(body["tiers"].as_array().map(Vec::len), Some(5));

        let (status, body) = compare_body(&table, b" \n ");
        assert_eq!(status, 200);
        assert_eq!(body["selected"], "Standard");

        let (status, body) = compare_body(&table, br#"{"profile": "#);
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));

        let (status, body) = compare_body(&table, br#"{"tier": "Gold"}"#);
        assert_eq!(status, 422);
        assert_eq!(body["error"], "unknown tier `Gold`");

        let (status, body) = compare_body(&table, br#"{"tier": "Metal", "toggles": {"annual_billing": false}}"#);
        assert_eq!(status, 200);
        assert_eq!(body["selected"], "Metal");
        assert_eq!(body["recommended"], false);
    }

    #[test]
    fn test_negative_input_clamped_and_unknown_perks_reported() {
        let json = r#"{
            "profile": { "average_liquidity": -5000, "monthly_card_spend": 400 },
            "toggles": { "selected_perks": ["NordVPN", "Spotify"] }
        }"#;
        let request: CompareRequest = serde_json::from_str(json).unwrap();
        let response = handle_compare(&RateTable::builtin(), request).unwrap();

        assert_eq!(response.ignored_perks, vec!["Spotify"]);
        let standard = response.tiers.iter().find(|b| b.tier == "Standard").unwrap();
        assert_eq!(standard.deposit_interest, 0.0);
        let premium = response.tiers.iter().find(|b| b.tier == "Premium").unwrap();
        assert_eq!(premium.partner_perk_value, 80.0);
    }
}
