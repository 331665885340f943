//! Scenario projector for insurance-type retirement products
//!
//! Drives the annuity math and the cost model through the savings phase and
//! routes the terminal gain through the applicable tax regime. Three
//! trajectories are projected per run: the contract-minimum rate, an
//! expected 6% gross and an optimistic 8% gross, each net of the tariff's
//! recurring cost drag.

use serde::{Deserialize, Serialize};

use crate::error::{check_age, check_rate, InputError};
use crate::percent;
use crate::product::{net_annual_return, ContributionPlan, InsuranceProduct, ProductFamily};
use crate::projection::annuity::future_value_of_annuity;
use crate::projection::series::{
    DeathBenefit, PensionPayout, ScenarioProjection, ScenarioResult, TrajectoryOutcome,
    YearlyProjectionPoint,
};
use crate::tax::{
    final_sale_tax, half_income_taxation, partial_exemption,
    pension::{pension_tax, ErtragsanteilTable},
    TaxSettings, MIN_HOLDING_YEARS,
};

/// Fixed annuitization rate for pension-family payouts, percent of the
/// terminal capital per year. Policy constant, not an actuarial derivation.
pub const PENSION_PAYOUT_RATE_PERCENT: f64 = 4.0;

/// Death benefit never falls below this multiple of the premiums paid in.
pub const DEATH_BENEFIT_FLOOR_FACTOR: f64 = 1.1;

/// Gross return assumptions for the three trajectories, percent per year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnAssumptions {
    pub expected_gross_percent: f64,
    pub optimistic_gross_percent: f64,
}

impl Default for ReturnAssumptions {
    fn default() -> Self {
        Self {
            expected_gross_percent: 6.0,
            optimistic_gross_percent: 8.0,
        }
    }
}

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Gross return assumptions
    pub returns: ReturnAssumptions,

    /// Age at the end of the horizon, used for the half-income rule and
    /// the Ertragsanteil lookup
    pub payout_age: u8,

    /// Personal marginal tax rate for pension income, percent
    pub personal_tax_rate_percent: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            returns: ReturnAssumptions::default(),
            payout_age: 67,
            personal_tax_rate_percent: 30.0,
        }
    }
}

/// Main projection engine for a single product
pub struct ScenarioProjector {
    settings: TaxSettings,
    config: ProjectionConfig,
}

impl ScenarioProjector {
    pub fn new(settings: TaxSettings, config: ProjectionConfig) -> Self {
        Self { settings, config }
    }

    /// Run the three-trajectory projection for one product.
    ///
    /// Invalid input is rejected here, before any computation; every later
    /// branch (zero net rate, zero gains, exhausted allowance) is a normal
    /// path with a well-defined result.
    pub fn project(
        &self,
        plan: &ContributionPlan,
        product: &InsuranceProduct,
    ) -> Result<ScenarioProjection, InputError> {
        plan.validate()?;
        product.validate()?;
        self.settings.validate()?;
        check_age(self.config.payout_age)?;
        check_rate("personal tax rate", self.config.personal_tax_rate_percent)?;
        check_rate("expected gross return", self.config.returns.expected_gross_percent)?;
        check_rate(
            "optimistic gross return",
            self.config.returns.optimistic_gross_percent,
        )?;

        let guaranteed =
            self.project_trajectory(plan, product, product.guaranteed_annual_rate_percent);
        let expected =
            self.project_trajectory(plan, product, self.config.returns.expected_gross_percent);
        let optimistic =
            self.project_trajectory(plan, product, self.config.returns.optimistic_gross_percent);

        let death_benefit = self.death_benefit(plan, product, &expected.series);
        let pension_payout = match product.family {
            ProductFamily::RuerupPension => Some(self.pension_payout(expected.outcome.gross_value)),
            _ => None,
        };

        Ok(ScenarioProjection {
            result: ScenarioResult {
                guaranteed: guaranteed.outcome,
                expected: expected.outcome,
                optimistic: optimistic.outcome,
                death_benefit,
                pension_payout,
            },
            guaranteed_series: guaranteed.series,
            expected_series: expected.series,
            optimistic_series: optimistic.series,
        })
    }

    /// Project one trajectory at a fixed gross return assumption.
    fn project_trajectory(
        &self,
        plan: &ContributionPlan,
        product: &InsuranceProduct,
        gross_rate_percent: f64,
    ) -> Trajectory {
        let net_rate = net_annual_return(gross_rate_percent, &product.costs);
        let guarantee_fraction = product.guarantee.guarantee_fraction();
        let total_contributions = plan.total_contributions();

        let mut series = Vec::with_capacity(plan.horizon_years as usize + 1);
        series.push(YearlyProjectionPoint::origin());

        for year in 1..plan.horizon_years {
            let paid_in = plan.contributions_through_year(year);
            let gross = future_value_of_annuity(plan.monthly_amount, net_rate, year)
                .max(paid_in * guarantee_fraction);
            series.push(YearlyProjectionPoint {
                year,
                contributions_to_date: paid_in,
                gross_value: gross,
                tax_paid_to_date: 0.0,
                net_value: gross,
            });
        }

        // Terminal year: acquisition haircut on the compounded value, with
        // the contractual guarantee floor applied after it.
        let compounded = future_value_of_annuity(plan.monthly_amount, net_rate, plan.horizon_years);
        let after_haircut = compounded - product.costs.acquisition_cost(total_contributions);
        let gross_final = after_haircut.max(total_contributions * guarantee_fraction);

        let tax = self.terminal_tax(product, gross_final, total_contributions, plan.horizon_years);
        let net_final = gross_final - tax;

        series.push(YearlyProjectionPoint {
            year: plan.horizon_years,
            contributions_to_date: total_contributions,
            gross_value: gross_final,
            tax_paid_to_date: tax,
            net_value: net_final,
        });

        let return_percent = if total_contributions > 0.0 {
            (net_final - total_contributions) / total_contributions * 100.0
        } else {
            0.0
        };

        Trajectory {
            outcome: TrajectoryOutcome {
                gross_value: gross_final,
                net_value: net_final,
                return_percent,
            },
            series,
        }
    }

    /// Tax on the terminal payout, routed by product family.
    fn terminal_tax(
        &self,
        product: &InsuranceProduct,
        gross_value: f64,
        total_contributions: f64,
        horizon_years: u32,
    ) -> f64 {
        if product.family.uses_capital_gains_regime() {
            let gains = gross_value - total_contributions;
            if gains <= 0.0 {
                return 0.0;
            }

            // Ordering contract: exemption, half income, allowance, rate.
            let taxable =
                partial_exemption(gains, self.settings.partial_exemption_rate_percent).taxable;
            let half_income_eligible = self.settings.half_income_taxation_enabled
                && product.family == ProductFamily::FundPolicy
                && horizon_years >= MIN_HOLDING_YEARS;
            let halved = half_income_taxation(taxable, self.config.payout_age, half_income_eligible);

            let mut ledger = self.settings.new_ledger();
            final_sale_tax(halved, 0.0, &self.settings, &mut ledger).final_tax
        } else {
            // Pension regime: the Ertragsanteil share of every payout euro
            // is taxed at the personal rate.
            gross_value * self.pension_tax_share()
        }
    }

    fn pension_tax_share(&self) -> f64 {
        let table = ErtragsanteilTable::default();
        percent::fraction(table.percentage(self.config.payout_age))
            * percent::fraction(self.config.personal_tax_rate_percent)
    }

    fn pension_payout(&self, terminal_gross: f64) -> PensionPayout {
        let monthly_gross = terminal_gross * percent::fraction(PENSION_PAYOUT_RATE_PERCENT) / 12.0;
        let taxed = pension_tax(
            monthly_gross,
            self.config.payout_age,
            self.config.personal_tax_rate_percent,
        );

        PensionPayout {
            monthly_gross,
            monthly_net: monthly_gross - taxed.tax / 12.0,
            ertragsanteil_percent: taxed.ertragsanteil_percent,
        }
    }

    /// Death benefit at half the horizon and at the end, each the larger of
    /// the current value times the multiplier and 110% of premiums paid.
    fn death_benefit(
        &self,
        plan: &ContributionPlan,
        product: &InsuranceProduct,
        expected_series: &[YearlyProjectionPoint],
    ) -> DeathBenefit {
        let multiplier = product.guarantee.death_benefit_multiplier;
        let halfway_year = (plan.horizon_years / 2).max(1);

        let at = |year: u32| -> f64 {
            let point = expected_series
                .iter()
                .find(|p| p.year == year)
                .copied()
                .unwrap_or_else(YearlyProjectionPoint::origin);
            let paid_in = plan.contributions_through_year(year);
            (point.gross_value * multiplier).max(paid_in * DEATH_BENEFIT_FLOOR_FACTOR)
        };

        DeathBenefit {
            at_halfway: at(halfway_year),
            at_end: at(plan.horizon_years),
        }
    }
}

struct Trajectory {
    outcome: TrajectoryOutcome,
    series: Vec<YearlyProjectionPoint>,
}
