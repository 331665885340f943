//! Product data structures for the savings vehicles under comparison

use serde::{Deserialize, Serialize};

use crate::error::{check_rate, InputError};
use crate::percent;
use crate::product::costs::CostSchedule;

/// Guarantee levels offered by the insurance products in the catalog.
pub const GUARANTEE_LEVELS: [f64; 5] = [0.0, 50.0, 80.0, 90.0, 100.0];

/// Recurring contribution plan shared by every vehicle in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    /// Monthly contribution in EUR
    pub monthly_amount: f64,

    /// Savings horizon in whole years
    pub horizon_years: u32,
}

impl ContributionPlan {
    pub fn new(monthly_amount: f64, horizon_years: u32) -> Self {
        Self {
            monthly_amount,
            horizon_years,
        }
    }

    /// Total contributions paid in over the full horizon
    pub fn total_contributions(&self) -> f64 {
        self.monthly_amount * 12.0 * self.horizon_years as f64
    }

    /// Contributions paid in through the end of a given year
    pub fn contributions_through_year(&self, year: u32) -> f64 {
        self.monthly_amount * 12.0 * year.min(self.horizon_years) as f64
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.monthly_amount < 0.0 || self.monthly_amount.is_nan() {
            return Err(InputError::NegativeContribution(self.monthly_amount));
        }
        if self.horizon_years < 1 {
            return Err(InputError::InvalidHorizon(self.horizon_years));
        }
        Ok(())
    }
}

/// Product family, determining the tax regime at payout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductFamily {
    /// Insurance-wrapped fund pension (fondsgebundene Rentenversicherung)
    FundPolicy,
    /// Plain ETF savings plan held in a brokerage account
    EtfSavingsPlan,
    /// Rürup basis pension (taxed as pension income at payout)
    RuerupPension,
}

impl ProductFamily {
    /// Whether payout gains run through the capital-gains regime
    /// (as opposed to the Ertragsanteil pension regime)
    pub fn uses_capital_gains_regime(&self) -> bool {
        matches!(self, ProductFamily::FundPolicy | ProductFamily::EtfSavingsPlan)
    }
}

/// Guarantee terms of an insurance product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeTerms {
    /// Guaranteed share of paid-in contributions at maturity, percent.
    /// Must be one of [`GUARANTEE_LEVELS`].
    pub guarantee_level_percent: f64,

    /// Death benefit as a multiple of the current gross value, >= 1.0
    pub death_benefit_multiplier: f64,
}

impl GuaranteeTerms {
    pub fn new(guarantee_level_percent: f64, death_benefit_multiplier: f64) -> Self {
        Self {
            guarantee_level_percent,
            death_benefit_multiplier,
        }
    }

    /// Guarantee level as a fraction of contributions
    pub fn guarantee_fraction(&self) -> f64 {
        percent::fraction(self.guarantee_level_percent)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !GUARANTEE_LEVELS
            .iter()
            .any(|&level| level == self.guarantee_level_percent)
        {
            return Err(InputError::InvalidGuaranteeLevel(self.guarantee_level_percent));
        }
        if self.death_benefit_multiplier < 1.0 || self.death_benefit_multiplier.is_nan() {
            return Err(InputError::InvalidDeathBenefitMultiplier(
                self.death_benefit_multiplier,
            ));
        }
        Ok(())
    }
}

impl Default for GuaranteeTerms {
    fn default() -> Self {
        Self {
            guarantee_level_percent: 80.0,
            death_benefit_multiplier: 1.0,
        }
    }
}

/// An insurance-type retirement product under evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceProduct {
    /// Display name of the tariff
    pub name: String,

    /// Product family, drives the payout tax routing
    pub family: ProductFamily,

    /// Contractually guaranteed gross crediting rate, percent per year
    pub guaranteed_annual_rate_percent: f64,

    /// Cost schedule of the tariff
    pub costs: CostSchedule,

    /// Guarantee and death benefit terms
    pub guarantee: GuaranteeTerms,
}

impl InsuranceProduct {
    pub fn new(
        name: impl Into<String>,
        family: ProductFamily,
        guaranteed_annual_rate_percent: f64,
        costs: CostSchedule,
        guarantee: GuaranteeTerms,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            guaranteed_annual_rate_percent,
            costs,
            guarantee,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        check_rate(
            "guaranteed annual rate",
            self.guaranteed_annual_rate_percent,
        )?;
        self.costs.validate()?;
        self.guarantee.validate()
    }
}

/// Assumptions for the plain ETF savings-plan leg of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundAssumptions {
    /// Flat annual fund fee (TER), percent
    pub annual_fee_percent: f64,
}

impl FundAssumptions {
    pub fn new(annual_fee_percent: f64) -> Self {
        Self { annual_fee_percent }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        check_rate("annual fund fee", self.annual_fee_percent)
    }
}

impl Default for FundAssumptions {
    fn default() -> Self {
        // Broad equity ETF, 0.3% TER
        Self {
            annual_fee_percent: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_totals() {
        let plan = ContributionPlan::new(300.0, 30);
        assert_eq!(plan.total_contributions(), 108_000.0);
        assert_eq!(plan.contributions_through_year(15), 54_000.0);
        // Clamped past the horizon
        assert_eq!(plan.contributions_through_year(40), 108_000.0);
    }

    #[test]
    fn test_plan_validation() {
        assert!(ContributionPlan::new(0.0, 1).validate().is_ok());
        assert_eq!(
            ContributionPlan::new(-1.0, 10).validate(),
            Err(InputError::NegativeContribution(-1.0))
        );
        assert_eq!(
            ContributionPlan::new(100.0, 0).validate(),
            Err(InputError::InvalidHorizon(0))
        );
    }

    #[test]
    fn test_guarantee_levels_closed_set() {
        assert!(GuaranteeTerms::new(80.0, 1.0).validate().is_ok());
        assert!(GuaranteeTerms::new(0.0, 1.0).validate().is_ok());
        assert_eq!(
            GuaranteeTerms::new(75.0, 1.0).validate(),
            Err(InputError::InvalidGuaranteeLevel(75.0))
        );
        assert_eq!(
            GuaranteeTerms::new(80.0, 0.9).validate(),
            Err(InputError::InvalidDeathBenefitMultiplier(0.9))
        );
    }

    #[test]
    fn test_family_tax_regime() {
        assert!(ProductFamily::FundPolicy.uses_capital_gains_regime());
        assert!(ProductFamily::EtfSavingsPlan.uses_capital_gains_regime());
        assert!(!ProductFamily::RuerupPension.uses_capital_gains_regime());
    }
}
