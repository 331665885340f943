//! Cost decomposition for insurance products
//!
//! Splits a tariff's cost schedule into a one-time acquisition component and
//! recurring components (administration, fund, guarantee, risk), and derives
//! the net-of-cost return the projector compounds with.

use serde::{Deserialize, Serialize};

use crate::error::{check_rate, InputError};
use crate::percent;

/// Average portfolio balance as a share of total contributions, used to
/// approximate recurring costs over the savings phase. Stands in for an
/// integral of the actual balance curve; replaceable policy, not a derived
/// constant.
pub const AVG_PORTFOLIO_FACTOR: f64 = 0.6;

/// Cost schedule of an insurance tariff, all rates in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSchedule {
    /// One-time acquisition and distribution cost, percent of total contributions
    pub acquisition_rate_percent: f64,

    /// Annual administration cost, percent of average balance
    pub annual_admin_rate_percent: f64,

    /// Annual fund cost, percent of average balance
    pub annual_fund_rate_percent: f64,

    /// Annual guarantee cost, percent of average balance
    pub annual_guarantee_rate_percent: f64,

    /// Annual risk (death cover) cost, percent of average balance
    pub annual_risk_rate_percent: f64,
}

impl CostSchedule {
    pub fn new(
        acquisition_rate_percent: f64,
        annual_admin_rate_percent: f64,
        annual_fund_rate_percent: f64,
        annual_guarantee_rate_percent: f64,
        annual_risk_rate_percent: f64,
    ) -> Self {
        Self {
            acquisition_rate_percent,
            annual_admin_rate_percent,
            annual_fund_rate_percent,
            annual_guarantee_rate_percent,
            annual_risk_rate_percent,
        }
    }

    /// Combined annual cost drag, percent per year
    pub fn effective_annual_cost_rate_percent(&self) -> f64 {
        self.annual_admin_rate_percent
            + self.annual_fund_rate_percent
            + self.annual_guarantee_rate_percent
            + self.annual_risk_rate_percent
    }

    /// One-time acquisition cost on a given contribution total
    pub fn acquisition_cost(&self, total_contributions: f64) -> f64 {
        total_contributions * percent::fraction(self.acquisition_rate_percent)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        check_rate("acquisition rate", self.acquisition_rate_percent)?;
        check_rate("annual admin rate", self.annual_admin_rate_percent)?;
        check_rate("annual fund rate", self.annual_fund_rate_percent)?;
        check_rate("annual guarantee rate", self.annual_guarantee_rate_percent)?;
        check_rate("annual risk rate", self.annual_risk_rate_percent)
    }
}

impl Default for CostSchedule {
    fn default() -> Self {
        // Mid-market unit-linked tariff
        Self {
            acquisition_rate_percent: 4.0,
            annual_admin_rate_percent: 0.8,
            annual_fund_rate_percent: 1.2,
            annual_guarantee_rate_percent: 0.35,
            annual_risk_rate_percent: 0.2,
        }
    }
}

/// Decomposed costs of a tariff over a full savings phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// One-time acquisition cost in EUR
    pub acquisition_cost: f64,

    /// Recurring administration cost over the full period, EUR
    pub admin_cost: f64,

    /// Recurring fund cost over the full period, EUR
    pub fund_cost: f64,

    /// Recurring guarantee cost over the full period, EUR
    pub guarantee_cost: f64,

    /// Recurring risk cost over the full period, EUR
    pub risk_cost: f64,

    /// All recurring costs per year, EUR
    pub recurring_per_year: f64,

    /// Acquisition plus all recurring costs over the full period, EUR
    pub total_costs: f64,

    /// Total costs relative to total contributions, percent
    pub as_percentage_of_contributions: f64,

    /// Combined recurring drag, percent per year
    pub annual_drag_percent: f64,
}

/// Recurring cost of a single rate item on the average-balance estimate.
pub(crate) fn recurring_cost(total_contributions: f64, rate_percent: f64, years: u32) -> f64 {
    total_contributions * AVG_PORTFOLIO_FACTOR * percent::fraction(rate_percent) * years as f64
}

/// Decompose a cost schedule into EUR amounts over the savings phase.
pub fn decompose_costs(
    schedule: &CostSchedule,
    total_contributions: f64,
    years: u32,
) -> CostBreakdown {
    let acquisition_cost = schedule.acquisition_cost(total_contributions);
    let admin_cost = recurring_cost(total_contributions, schedule.annual_admin_rate_percent, years);
    let fund_cost = recurring_cost(total_contributions, schedule.annual_fund_rate_percent, years);
    let guarantee_cost = recurring_cost(
        total_contributions,
        schedule.annual_guarantee_rate_percent,
        years,
    );
    let risk_cost = recurring_cost(total_contributions, schedule.annual_risk_rate_percent, years);

    let recurring_total = admin_cost + fund_cost + guarantee_cost + risk_cost;
    let total_costs = acquisition_cost + recurring_total;
    let as_percentage_of_contributions = if total_contributions > 0.0 {
        total_costs / total_contributions * 100.0
    } else {
        0.0
    };

    CostBreakdown {
        acquisition_cost,
        admin_cost,
        fund_cost,
        guarantee_cost,
        risk_cost,
        recurring_per_year: if years > 0 {
            recurring_total / years as f64
        } else {
            0.0
        },
        total_costs,
        as_percentage_of_contributions,
        annual_drag_percent: schedule.effective_annual_cost_rate_percent(),
    }
}

/// Net annual return of a gross assumption after the tariff's recurring drag,
/// percent per year. May be negative when costs exceed the gross rate.
pub fn net_annual_return(gross_rate_percent: f64, schedule: &CostSchedule) -> f64 {
    gross_rate_percent - schedule.effective_annual_cost_rate_percent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn example_schedule() -> CostSchedule {
        CostSchedule::new(4.0, 0.8, 1.2, 0.35, 0.2)
    }

    #[test]
    fn test_effective_annual_rate() {
        let schedule = example_schedule();
        assert!((schedule.effective_annual_cost_rate_percent() - 2.55).abs() < 1e-12);
    }

    #[test]
    fn test_net_annual_return() {
        let schedule = example_schedule();
        assert!((net_annual_return(6.0, &schedule) - 3.45).abs() < 1e-12);
        // Costs above gross yield a negative net rate, not an error
        assert!(net_annual_return(2.0, &schedule) < 0.0);
    }

    #[test]
    fn test_decomposition_totals() {
        let schedule = example_schedule();
        let total_contributions = 108_000.0;
        let years = 30;
        let breakdown = decompose_costs(&schedule, total_contributions, years);

        // Acquisition: 4% of contributions
        assert!((breakdown.acquisition_cost - 4_320.0).abs() < 1e-9);

        // Recurring items sum back to the total within rounding
        let recomposed = breakdown.acquisition_cost + breakdown.recurring_per_year * years as f64;
        assert_relative_eq!(recomposed, breakdown.total_costs, max_relative = 1e-12);

        // Admin item: 108000 * 0.6 * 0.8% * 30
        assert!((breakdown.admin_cost - 108_000.0 * 0.6 * 0.008 * 30.0).abs() < 1e-9);

        assert!((breakdown.annual_drag_percent - 2.55).abs() < 1e-12);
        assert!(breakdown.as_percentage_of_contributions > 0.0);
    }

    #[test]
    fn test_zero_contributions() {
        let breakdown = decompose_costs(&example_schedule(), 0.0, 30);
        assert_eq!(breakdown.total_costs, 0.0);
        assert_eq!(breakdown.as_percentage_of_contributions, 0.0);
    }
}
