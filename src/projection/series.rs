//! Projection output structures

use serde::{Deserialize, Serialize};

/// One simulated year of a trajectory
///
/// The series starts at year 0 with zero value and is appended through the
/// horizon; points are never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjectionPoint {
    pub year: u32,
    pub contributions_to_date: f64,
    pub gross_value: f64,
    pub tax_paid_to_date: f64,
    pub net_value: f64,
}

impl YearlyProjectionPoint {
    /// Origin point of every series
    pub fn origin() -> Self {
        Self {
            year: 0,
            contributions_to_date: 0.0,
            gross_value: 0.0,
            tax_paid_to_date: 0.0,
            net_value: 0.0,
        }
    }
}

/// Terminal figures of one trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOutcome {
    /// Value at the end of the horizon before payout taxation, EUR
    pub gross_value: f64,

    /// Value net of payout taxation, EUR
    pub net_value: f64,

    /// Total net return over contributions, percent
    pub return_percent: f64,
}

/// Death benefit at the two reference points of the savings phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathBenefit {
    /// Payable at half the horizon, EUR
    pub at_halfway: f64,

    /// Payable at the end of the horizon, EUR
    pub at_end: f64,
}

/// Annuitized payout figures for pension-family products
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionPayout {
    /// Gross monthly pension from the expected trajectory, EUR
    pub monthly_gross: f64,

    /// Monthly pension net of Ertragsanteil taxation, EUR
    pub monthly_net: f64,

    /// Taxable share applied, percent
    pub ertragsanteil_percent: f64,
}

/// Terminal summary of a scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Contract-minimum trajectory, floored by the guarantee
    pub guaranteed: TrajectoryOutcome,

    /// Expected trajectory (6% gross by default)
    pub expected: TrajectoryOutcome,

    /// Optimistic trajectory (8% gross by default)
    pub optimistic: TrajectoryOutcome,

    /// Death benefit at half-horizon and horizon
    pub death_benefit: DeathBenefit,

    /// Present only for pension-family products
    pub pension_payout: Option<PensionPayout>,
}

/// Full output of one scenario run: terminal summary plus the
/// year-by-year series of each trajectory for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub result: ScenarioResult,
    pub guaranteed_series: Vec<YearlyProjectionPoint>,
    pub expected_series: Vec<YearlyProjectionPoint>,
    pub optimistic_series: Vec<YearlyProjectionPoint>,
}

/// Output of the ETF savings-plan projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfProjection {
    /// Value at the end of the horizon before the final sale tax, EUR
    pub gross_value: f64,

    /// Value after the final sale tax, EUR
    pub net_value: f64,

    /// All tax paid over the run (advance lump sums plus sale), EUR
    pub total_tax: f64,

    /// Year-by-year series including accrued advance taxation
    pub series: Vec<YearlyProjectionPoint>,
}
