//! Sweep a grid of contribution plans through the comparator
//!
//! Outputs one row per plan with the net payouts, scores and recommendation
//! of both vehicles, for calibrating the scoring policy against a product
//! catalog.

use std::time::Instant;

use rayon::prelude::*;

use vorsorge_engine::{
    comparison::Vehicle,
    projection::ProjectionConfig,
    ComparisonResult, ContributionPlan, CostSchedule, FundAssumptions, GuaranteeTerms,
    InsuranceProduct, ProductFamily, TaxSettings, VehicleComparator,
};

const MONTHLY_AMOUNTS: [f64; 6] = [50.0, 100.0, 200.0, 300.0, 500.0, 1_000.0];
const HORIZONS: [u32; 5] = [10, 15, 20, 30, 40];

fn vehicle_label(vehicle: Vehicle) -> &'static str {
    match vehicle {
        Vehicle::Fund => "fund",
        Vehicle::Insurance => "insurance",
        Vehicle::Blend => "blend",
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();

    let insurance = InsuranceProduct::new(
        "Fondspolice Klassik",
        ProductFamily::FundPolicy,
        0.0,
        CostSchedule::default(),
        GuaranteeTerms::new(80.0, 1.0),
    );
    let fund = FundAssumptions::default();
    let settings = TaxSettings::default_2024();
    let config = ProjectionConfig::default();

    let plans: Vec<ContributionPlan> = MONTHLY_AMOUNTS
        .iter()
        .flat_map(|&monthly| HORIZONS.iter().map(move |&years| ContributionPlan::new(monthly, years)))
        .collect();

    log::info!("running {} comparisons", plans.len());

    // Each task constructs its own comparator; no per-run state is shared
    let results: Vec<(ContributionPlan, ComparisonResult)> = plans
        .par_iter()
        .map(|plan| {
            let comparator = VehicleComparator::new(settings.clone(), config);
            let result = comparator
                .compare(plan, &fund, &insurance)
                .expect("grid inputs are valid");
            (*plan, result)
        })
        .collect();

    log::info!("comparisons complete in {:?}", start.elapsed());

    let output_path = "plan_sweep.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record([
        "monthly",
        "years",
        "contributions",
        "fund_net",
        "insurance_net",
        "net_difference",
        "fund_score",
        "insurance_score",
        "recommendation",
    ])?;

    for (plan, result) in &results {
        writer.write_record([
            format!("{:.2}", plan.monthly_amount),
            plan.horizon_years.to_string(),
            format!("{:.2}", plan.total_contributions()),
            format!("{:.2}", result.fund.net_value),
            format!("{:.2}", result.insurance.net_value),
            format!("{:.2}", result.difference.net_difference),
            format!("{:.1}", result.recommendation.score.fund),
            format!("{:.1}", result.recommendation.score.insurance),
            vehicle_label(result.recommendation.vehicle).to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Output written to {}", output_path);

    // Print summary stats
    let blends = results
        .iter()
        .filter(|(_, r)| r.recommendation.vehicle == Vehicle::Blend)
        .count();
    let fund_wins = results
        .iter()
        .filter(|(_, r)| r.recommendation.vehicle == Vehicle::Fund)
        .count();
    println!("\nSweep summary ({} plans):", results.len());
    println!("  Fund recommended:  {}", fund_wins);
    println!("  Blend recommended: {}", blends);
    println!(
        "  Insurance recommended: {}",
        results.len() - blends - fund_wins
    );
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
