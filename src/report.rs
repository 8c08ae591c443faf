//! Plain-text and CSV renderings of tier breakdowns
//!
//! Formatting only: every figure comes from a [`TierBreakdown`].

use std::io::Write;

use crate::calculator::{Comparison, TierBreakdown};

/// Currency label printed next to amounts
pub const CURRENCY: &str = "EUR";

/// Amount with explicit sign, e.g. `+EUR 120.00` or `-EUR 40.00`
pub fn format_signed(amount: f64) -> String {
    let sign = if amount >= 0.0 { '+' } else { '-' };
    format!("{}{} {:.2}", sign, CURRENCY, amount.abs())
}

/// Downloadable report for one plan
pub fn render_report(breakdown: &TierBreakdown, plan_label: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("Tier Report - Plan {}\n\n", plan_label));
    out.push_str(&format!(
        "Estimated net benefit: {} {:.2} per year ({} {:.2} per month)\n\n",
        CURRENCY,
        breakdown.net_benefit,
        CURRENCY,
        breakdown.monthly_benefit()
    ));

    out.push_str("Savings breakdown, item by item\n");
    for (label, amount) in breakdown.line_items() {
        out.push_str(&format!("  {}: {}\n", label, format_signed(amount)));
    }

    out.push_str(&format!("\nFinal net benefit: {} {:.2}\n", CURRENCY, breakdown.net_benefit));
    out.push_str("\nGenerated by tier-compare\n");
    out
}

/// Side-by-side summary of every tier, marking the recommended one
pub fn render_table(comparison: &Comparison) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "Tier", "Cost/yr", "Savings/yr", "Perks/yr", "Net/yr", "Net/month"
    ));
    out.push_str(&format!("{}\n", "-".repeat(79)));

    for b in comparison.breakdowns() {
        let marker = if comparison.is_best(&b.tier) { " *" } else { "" };
        let savings = b.net_benefit + b.subscription_cost - b.partner_perk_value;
        out.push_str(&format!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}{}\n",
            b.tier,
            b.subscription_cost,
            savings,
            b.partner_perk_value,
            b.net_benefit,
            b.monthly_benefit(),
            marker
        ));
    }
    out
}

/// One CSV row per tier with full precision
pub fn write_breakdowns_csv<W: Write>(writer: W, breakdowns: &[TierBreakdown]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for b in breakdowns {
        csv_writer.serialize(b)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::rank;
    use crate::profile::{Toggles, UserProfile};
    use crate::rates::RateTable;

    fn metal() -> TierBreakdown {
        let table = RateTable::builtin();
        let toggles = Toggles::default().with_perks(["Financial Times"]);
        rank(&table, &UserProfile::default(), &toggles)
            .get("Metal")
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(120.0), "+EUR 120.00");
        assert_eq!(format_signed(-40.0), "-EUR 40.00");
        assert_eq!(format_signed(0.0), "+EUR 0.00");
        assert_eq!(format_signed(4.805), "+EUR 4.80");
    }

    #[test]
    fn test_report_lines() {
        let report = render_report(&metal(), "Metal");

        assert!(report.starts_with("Tier Report - Plan Metal\n"));
        assert!(report.contains("Estimated net benefit: EUR 393.10 per year"));
        assert!(report.contains("  Account fee savings: +EUR 120.00\n"));
        assert!(report.contains("  Partner subscriptions value: +EUR 300.00\n"));
        assert!(report.contains("  Subscription cost: -EUR 160.00\n"));
        assert!(report.contains("Final net benefit: EUR 393.10\n"));
        assert_eq!(report.lines().filter(|l| l.starts_with("  ")).count(), 11);
    }

    #[test]
    fn test_table_marks_best() {
        let table = RateTable::builtin();
        let comparison = rank(&table, &UserProfile::default(), &Toggles::default());
        let rendered = render_table(&comparison);

        let standard = rendered.lines().find(|l| l.starts_with("Standard")).unwrap();
        let ultra = rendered.lines().find(|l| l.starts_with("Ultra")).unwrap();
        assert!(standard.ends_with(" *"));
        assert!(!ultra.ends_with(" *"));
        assert!(ultra.contains("-258.00"));
    }

    #[test]
    fn test_csv_rows() {
        let mut buf = Vec::new();
        write_breakdowns_csv(&mut buf, &[metal()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("tier,subscription_cost,account_fee_savings"));
        assert!(header.ends_with("partner_perk_value,net_benefit"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Metal,160.0,120.0,42.0,"));
        assert!(lines.next().is_none());
    }
}
