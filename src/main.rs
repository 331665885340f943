//! Vorsorge Engine CLI
//!
//! Runs a fund-versus-insurance comparison for one contribution plan and
//! prints the year-by-year projection with a scored recommendation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use vorsorge_engine::{
    comparison::Vehicle,
    projection::ProjectionConfig,
    ContributionPlan, CostSchedule, FundAssumptions, GuaranteeTerms, InsuranceProduct,
    ProductFamily, TaxSettings, VehicleComparator,
};

#[derive(Debug, Parser)]
#[command(name = "vorsorge_engine", about = "Retirement savings vehicle comparison")]
struct Cli {
    /// Monthly contribution in EUR
    #[arg(long, default_value_t = 300.0)]
    monthly: f64,

    /// Savings horizon in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Guarantee level of the insurance tariff (0, 50, 80, 90 or 100)
    #[arg(long, default_value_t = 80.0)]
    guarantee_level: f64,

    /// Age at the end of the horizon
    #[arg(long, default_value_t = 67)]
    payout_age: u8,

    /// Annual ETF fee (TER), percent
    #[arg(long, default_value_t = 0.3)]
    ter: f64,

    /// Add church tax on top of the capital gains rate
    #[arg(long)]
    church_tax: bool,

    /// Write the year-by-year series of both vehicles to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    println!("Vorsorge Engine v0.1.0");
    println!("======================\n");

    let plan = ContributionPlan::new(cli.monthly, cli.years);
    let fund = FundAssumptions::new(cli.ter);
    let insurance = InsuranceProduct::new(
        "Fondspolice Klassik",
        ProductFamily::FundPolicy,
        0.0,
        CostSchedule::default(),
        GuaranteeTerms::new(cli.guarantee_level, 1.0),
    );

    let settings = TaxSettings {
        church_tax_enabled: cli.church_tax,
        ..TaxSettings::default_2024()
    };
    let config = ProjectionConfig {
        payout_age: cli.payout_age,
        ..ProjectionConfig::default()
    };

    println!("Plan: {:.2} EUR/month over {} years", plan.monthly_amount, plan.horizon_years);
    println!("  Total contributions: {:.2} EUR", plan.total_contributions());
    println!("  Guarantee level: {:.0}%", insurance.guarantee.guarantee_level_percent);
    println!("  Payout age: {}", config.payout_age);
    println!();

    let comparator = VehicleComparator::new(settings, config);
    let result = comparator
        .compare(&plan, &fund, &insurance)
        .context("comparison failed")?;

    // Print year-by-year series side by side
    println!("{:>5} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Paid in", "Fund gross", "Fund net", "Ins. gross", "Ins. net");
    println!("{}", "-".repeat(80));

    for (fund_point, ins_point) in result.fund.series.iter().zip(&result.insurance.series) {
        println!("{:>5} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            fund_point.year,
            fund_point.contributions_to_date,
            fund_point.gross_value,
            fund_point.net_value,
            ins_point.gross_value,
            ins_point.net_value,
        );
    }

    // Write both series to CSV
    if let Some(path) = &cli.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        writer.write_record([
            "year",
            "contributions_to_date",
            "fund_gross",
            "fund_tax_paid",
            "fund_net",
            "insurance_gross",
            "insurance_tax_paid",
            "insurance_net",
        ])?;
        for (fund_point, ins_point) in result.fund.series.iter().zip(&result.insurance.series) {
            writer.write_record([
                fund_point.year.to_string(),
                format!("{:.2}", fund_point.contributions_to_date),
                format!("{:.2}", fund_point.gross_value),
                format!("{:.2}", fund_point.tax_paid_to_date),
                format!("{:.2}", fund_point.net_value),
                format!("{:.2}", ins_point.gross_value),
                format!("{:.2}", ins_point.tax_paid_to_date),
                format!("{:.2}", ins_point.net_value),
            ])?;
        }
        writer.flush()?;
        println!("\nSeries written to: {}", path.display());
    }

    // Print summary
    let scenario = &result.insurance_scenario;
    println!("\nInsurance trajectories:");
    println!("  Guaranteed: {:>12.2} EUR net", scenario.guaranteed.net_value);
    println!("  Expected:   {:>12.2} EUR net ({:+.1}%)",
        scenario.expected.net_value, scenario.expected.return_percent);
    println!("  Optimistic: {:>12.2} EUR net ({:+.1}%)",
        scenario.optimistic.net_value, scenario.optimistic.return_percent);
    println!("  Death benefit: {:.2} EUR at halfway, {:.2} EUR at maturity",
        scenario.death_benefit.at_halfway, scenario.death_benefit.at_end);

    println!("\nDifferences (fund vs. insurance):");
    println!("  Cost difference:   {:>12.2} EUR", result.difference.cost_difference);
    println!("  Tax savings:       {:>12.2} EUR", result.difference.tax_savings);
    println!("  Guarantee benefit: {:>12.2} EUR", result.difference.guarantee_benefit);
    println!("  Net difference:    {:>12.2} EUR", result.difference.net_difference);

    let recommendation = &result.recommendation;
    println!("\nScores: fund {:.1} / insurance {:.1}",
        recommendation.score.fund, recommendation.score.insurance);
    match recommendation.vehicle {
        Vehicle::Fund => println!("Recommendation: ETF savings plan"),
        Vehicle::Insurance => println!("Recommendation: insurance product"),
        Vehicle::Blend => {
            let ratio = recommendation.blend_ratio.expect("blend carries a ratio");
            println!(
                "Recommendation: blend {:.0}% fund / {:.0}% insurance",
                ratio.fund_percent, ratio.insurance_percent
            );
        }
    }

    Ok(())
}
