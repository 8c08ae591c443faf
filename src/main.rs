//! Tier Compare CLI
//!
//! Compare subscription tiers for a banking profile, export a plan report
//! and ask the plan assistant.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;

use tier_compare::assistant::{Assistant, AssistantConfig, GeminiClient};
use tier_compare::calculator::Comparison;
use tier_compare::leads::{LeadLog, DEFAULT_LEADS_PATH, DEFAULT_ORIGIN};
use tier_compare::rates::{RateSource, DEFAULT_RATES_PATH};
use tier_compare::report::{format_signed, render_report, render_table, write_breakdowns_csv};
use tier_compare::{handle_compare, CompareRequest, CompareResponse, RateTable, Toggles, UserProfile};

#[derive(Parser)]
#[command(name = "tier-compare", version, about = "Find the subscription tier that saves you the most")]
struct Cli {
    /// Rate table JSON file; the built-in table is used if it cannot be loaded
    #[arg(long, env = "TIER_RATES_PATH", default_value = DEFAULT_RATES_PATH, global = true)]
    rates: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank every tier for a profile
    Compare(CompareArgs),
    /// Write the report for one tier, optionally logging the contact
    Report(ReportArgs),
    /// Ask the plan assistant a question
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// List the partner perk catalog
    Perks,
}

#[derive(Args)]
struct ProfileArgs {
    /// JSON file with the user profile (missing fields use defaults)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Bill every month instead of yearly
    #[arg(long)]
    monthly: bool,

    /// Cover two people with the duo add-on
    #[arg(long)]
    duo: bool,

    /// Partner perk the user would use (repeatable)
    #[arg(long = "perk")]
    perks: Vec<String>,

    /// Tier to inspect instead of the best one
    #[arg(long)]
    tier: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    input: ProfileArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    input: ProfileArgs,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Contact address to record in the lead log
    #[arg(long)]
    email: Option<String>,

    /// Origin tag stored with the lead (e.g. a campaign)
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    source: String,

    #[arg(long, env = "TIER_LEADS_PATH", default_value = DEFAULT_LEADS_PATH)]
    leads: PathBuf,
}

impl ProfileArgs {
    fn to_request(&self) -> Result<CompareRequest> {
        let profile = match &self.profile {
            Some(path) => read_profile(path)?,
            None => UserProfile::default(),
        };
        let toggles = Toggles {
            annual_billing: !self.monthly,
            duo_mode: self.duo,
            ..Default::default()
        }
        .with_perks(self.perks.iter().cloned());

        Ok(CompareRequest {
            profile,
            toggles,
            tier: self.tier.clone(),
        })
    }
}

fn read_profile(path: &Path) -> Result<UserProfile> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid profile {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let (table, source) = RateTable::load_or_builtin(&cli.rates);

    match cli.command {
        Command::Compare(args) => compare(&table, &source, &args),
        Command::Report(args) => report(&table, &args),
        Command::Ask { question } => ask(&table, &question.join(" ")).await,
        Command::Perks => {
            list_perks(&table);
            Ok(())
        }
    }
}

fn compare(table: &RateTable, source: &RateSource, args: &CompareArgs) -> Result<()> {
    let response = handle_compare(table, args.input.to_request()?)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Csv => {
            write_breakdowns_csv(io::stdout(), &response.tiers)?;
        }
        OutputFormat::Table => print_summary(source, &response),
    }
    Ok(())
}

fn print_summary(source: &RateSource, response: &CompareResponse) {
    match source {
        RateSource::File(path) => println!("Rates: {}", path.display()),
        RateSource::Builtin => println!("Rates: built-in table"),
    }
    for name in &response.ignored_perks {
        println!("Unknown partner perk ignored: {}", name);
    }
    println!();

    let comparison = Comparison::new(response.tiers.clone());
    print!("{}", render_table(&comparison));

    let Some(selected) = response.selected_breakdown() else {
        return;
    };

    println!();
    let label = if response.recommended { " (recommended)" } else { "" };
    println!("Plan {}{}", selected.tier, label);
    for (item, amount) in selected.line_items() {
        println!("  {:<36} {:>16}", item, format_signed(amount));
    }
    println!("  {:<36} {:>16.2}", "Net benefit per year", selected.net_benefit);
    println!("  {:<36} {:>16.2}", "Net benefit per month", selected.monthly_benefit());

    if let Some(best) = comparison.best() {
        println!(
            "\nSwitching to {} is worth about {:.0} per month compared to your current bank.",
            best.tier,
            best.monthly_benefit()
        );
    }
}

fn report(table: &RateTable, args: &ReportArgs) -> Result<()> {
    let response = handle_compare(table, args.input.to_request()?)?;
    let Some(selected) = response.selected_breakdown() else {
        bail!("No breakdown for tier {}", response.selected);
    };
    let text = render_report(selected, &selected.tier);

    match &args.output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", text),
    }

    // The report is delivered even if the lead cannot be stored
    if let Some(email) = &args.email {
        if !LeadLog::new(&args.leads).record(email, &args.source) {
            warn!("Report delivered without recording the lead");
        }
    }
    Ok(())
}

async fn ask(table: &RateTable, question: &str) -> Result<()> {
    let assistant = Assistant::new(GeminiClient::new(), AssistantConfig::from_env());
    let reply = assistant.respond(question, table).await;
    println!("{}", reply);
    Ok(())
}

fn list_perks(table: &RateTable) {
    println!("{:<24} {:>10}  {}", "Partner", "Value/yr", "From tier");
    println!("{}", "-".repeat(48));
    for perk in &table.partners {
        println!(
            "{:<24} {:>10.2}  {}",
            perk.name,
            perk.annual_value,
            perk.minimum_tier.as_str()
        );
    }
}
