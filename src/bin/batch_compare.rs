//! Rank tiers for every profile in a CSV file
//!
//! Each input row is a user profile (columns named after the profile
//! fields; missing columns use defaults). Profiles are evaluated in
//! parallel and the best tier per row is written to the output CSV.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use tier_compare::rates::DEFAULT_RATES_PATH;
use tier_compare::{rank, RateTable, Toggles, UserProfile};

#[derive(Parser)]
#[command(name = "batch_compare", about = "Best tier for every profile in a CSV file")]
struct Args {
    /// Input CSV of user profiles
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "batch_compare_output.csv")]
    output: PathBuf,

    #[arg(long, env = "TIER_RATES_PATH", default_value = DEFAULT_RATES_PATH)]
    rates: PathBuf,

    #[arg(long)]
    monthly: bool,

    #[arg(long)]
    duo: bool,
}

/// Best tier for one input profile
#[derive(Debug, Serialize)]
struct BatchRow {
    row: usize,
    best_tier: String,
    subscription_cost: f64,
    net_benefit: f64,
    monthly_benefit: f64,
    runner_up: String,
    runner_up_net_benefit: f64,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let (table, _) = RateTable::load_or_builtin(&args.rates);
    let toggles = Toggles {
        annual_billing: !args.monthly,
        duo_mode: args.duo,
        ..Default::default()
    };

    println!("Loading profiles from {}...", args.input.display());
    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let profiles: Vec<UserProfile> = reader
        .deserialize()
        .collect::<Result<Vec<UserProfile>, csv::Error>>()
        .context("Failed to parse profiles")?;
    println!("Loaded {} profiles in {:?}", profiles.len(), start.elapsed());

    let rank_start = Instant::now();
    let rows: Vec<BatchRow> = profiles
        .into_par_iter()
        .enumerate()
        .filter_map(|(idx, profile)| {
            let comparison = rank(&table, &profile.clamped(), &toggles);
            let best = comparison.best()?;
            let runner_up = comparison
                .breakdowns()
                .iter()
                .filter(|b| b.tier != best.tier)
                .fold(None, |acc: Option<&tier_compare::TierBreakdown>, b| match acc {
                    Some(current) if current.net_benefit >= b.net_benefit => Some(current),
                    _ => Some(b),
                });

            Some(BatchRow {
                row: idx + 1,
                best_tier: best.tier.clone(),
                subscription_cost: best.subscription_cost,
                net_benefit: best.net_benefit,
                monthly_benefit: best.monthly_benefit(),
                runner_up: runner_up.map(|b| b.tier.clone()).unwrap_or_default(),
                runner_up_net_benefit: runner_up.map(|b| b.net_benefit).unwrap_or(0.0),
            })
        })
        .collect();
    println!("Ranked {} profiles in {:?}", rows.len(), rank_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    // Summary of winners
    println!("\nBest tier counts:");
    for tier in table.tier_ids() {
        let count = rows.iter().filter(|r| r.best_tier == tier).count();
        println!("  {:<12} {}", tier, count);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
