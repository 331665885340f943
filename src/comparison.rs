//! Vehicle comparison and recommendation
//!
//! Runs the ETF savings-plan projection and the insurance projection under
//! the same contribution plan, derives net payouts and their differences,
//! and scores both vehicles against a fixed, overridable weighting policy.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::product::{
    decompose_costs, recurring_cost, ContributionPlan, FundAssumptions, InsuranceProduct,
    ProductFamily,
};
use crate::projection::{
    EtfProjector, ProjectionConfig, ScenarioProjector, ScenarioResult, YearlyProjectionPoint,
};
use crate::tax::{TaxSettings, HALF_INCOME_MIN_AGE, MIN_HOLDING_YEARS};

/// Scoring policy for the recommendation
///
/// The weights and thresholds are design constants, not derived optima;
/// they are fields rather than inlined literals so a host can override
/// them per product line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Points awarded pro rata to the net payout, relative to the better vehicle
    pub return_weight: f64,

    /// Bonus for the fund's liquidity (no surrender period, free sale)
    pub flexibility_bonus: f64,

    /// Bonus for the insurance guarantee, scaled by the guarantee level
    pub guarantee_bonus: f64,

    /// Bonus for the insurance wrapper when the half-income rule applies
    pub tax_advantage_bonus: f64,

    /// Bonus for the insurance death benefit
    pub death_benefit_bonus: f64,

    /// Score distance below which a blended allocation is recommended
    pub blend_threshold: f64,

    /// Fund share of the blended allocation, percent
    pub blend_fund_percent: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            return_weight: 50.0,
            flexibility_bonus: 15.0,
            guarantee_bonus: 15.0,
            tax_advantage_bonus: 10.0,
            death_benefit_bonus: 10.0,
            blend_threshold: 15.0,
            blend_fund_percent: 60.0,
        }
    }
}

/// Recommended vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vehicle {
    Fund,
    Insurance,
    Blend,
}

/// 0-100 score per vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleScore {
    pub fund: f64,
    pub insurance: f64,
}

/// Allocation split of a blended recommendation, percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendRatio {
    pub fund_percent: f64,
    pub insurance_percent: f64,
}

/// Final recommendation of a comparison run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub vehicle: Vehicle,
    pub score: VehicleScore,
    pub blend_ratio: Option<BlendRatio>,
}

/// Scalar differences between the two vehicles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceReport {
    /// Insurance costs minus fund costs over the full period, EUR
    pub cost_difference: f64,

    /// Fund tax minus insurance tax on the expected trajectory, EUR
    pub tax_savings: f64,

    /// Guaranteed maturity amount of the insurance contract, EUR
    pub guarantee_benefit: f64,

    /// Fund net payout minus insurance net payout, EUR
    pub net_difference: f64,
}

/// Per-vehicle summary of the expected trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub gross_value: f64,
    pub net_value: f64,
    pub total_costs: f64,
    pub total_tax: f64,
    pub series: Vec<YearlyProjectionPoint>,
}

/// Full output of a comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub fund: VehicleSummary,
    pub insurance: VehicleSummary,
    /// Full three-trajectory result of the insurance leg
    pub insurance_scenario: ScenarioResult,
    pub difference: DifferenceReport,
    pub recommendation: Recommendation,
}

/// Comparator running both vehicle legs under one contribution plan
pub struct VehicleComparator {
    settings: TaxSettings,
    config: ProjectionConfig,
    weights: ScoringWeights,
}

impl VehicleComparator {
    pub fn new(settings: TaxSettings, config: ProjectionConfig) -> Self {
        Self {
            settings,
            config,
            weights: ScoringWeights::default(),
        }
    }

    /// Override the scoring policy.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Compare the ETF savings plan against the insurance product.
    pub fn compare(
        &self,
        plan: &ContributionPlan,
        fund: &FundAssumptions,
        insurance: &InsuranceProduct,
    ) -> Result<ComparisonResult, InputError> {
        let etf = EtfProjector::new(self.settings.clone()).project(
            plan,
            fund,
            self.config.returns.expected_gross_percent,
        )?;
        let scenario = ScenarioProjector::new(self.settings.clone(), self.config)
            .project(plan, insurance)?;

        let total_contributions = plan.total_contributions();
        let fund_costs = recurring_cost(
            total_contributions,
            fund.annual_fee_percent,
            plan.horizon_years,
        );
        let insurance_costs =
            decompose_costs(&insurance.costs, total_contributions, plan.horizon_years).total_costs;

        let insurance_expected = scenario.result.expected;
        let insurance_tax = insurance_expected.gross_value - insurance_expected.net_value;

        let fund_summary = VehicleSummary {
            gross_value: etf.gross_value,
            net_value: etf.net_value,
            total_costs: fund_costs,
            total_tax: etf.total_tax,
            series: etf.series,
        };
        let insurance_summary = VehicleSummary {
            gross_value: insurance_expected.gross_value,
            net_value: insurance_expected.net_value,
            total_costs: insurance_costs,
            total_tax: insurance_tax,
            series: scenario.expected_series.clone(),
        };

        let difference = DifferenceReport {
            cost_difference: insurance_costs - fund_costs,
            tax_savings: fund_summary.total_tax - insurance_summary.total_tax,
            guarantee_benefit: total_contributions * insurance.guarantee.guarantee_fraction(),
            net_difference: fund_summary.net_value - insurance_summary.net_value,
        };

        let score = self.score(plan, insurance, &fund_summary, &insurance_summary);
        let recommendation = self.recommend(score);

        Ok(ComparisonResult {
            fund: fund_summary,
            insurance: insurance_summary,
            insurance_scenario: scenario.result,
            difference,
            recommendation,
        })
    }

    /// Score both vehicles against the weighting policy, clamped to 0-100.
    fn score(
        &self,
        plan: &ContributionPlan,
        insurance: &InsuranceProduct,
        fund: &VehicleSummary,
        insurance_summary: &VehicleSummary,
    ) -> VehicleScore {
        let w = &self.weights;
        let best_net = fund.net_value.max(insurance_summary.net_value);

        let return_points = |net: f64| -> f64 {
            if best_net > 0.0 {
                w.return_weight * (net / best_net).max(0.0)
            } else {
                0.0
            }
        };

        let mut fund_score = return_points(fund.net_value) + w.flexibility_bonus;

        let mut insurance_score = return_points(insurance_summary.net_value)
            + w.guarantee_bonus * insurance.guarantee.guarantee_fraction()
            + w.death_benefit_bonus;

        let half_income_applies = self.settings.half_income_taxation_enabled
            && insurance.family == ProductFamily::FundPolicy
            && plan.horizon_years >= MIN_HOLDING_YEARS
            && self.config.payout_age >= HALF_INCOME_MIN_AGE;
        if half_income_applies {
            insurance_score += w.tax_advantage_bonus;
        }

        fund_score = fund_score.clamp(0.0, 100.0);
        insurance_score = insurance_score.clamp(0.0, 100.0);

        VehicleScore {
            fund: fund_score,
            insurance: insurance_score,
        }
    }

    /// Blend when the scores are close, otherwise take the higher scorer.
    fn recommend(&self, score: VehicleScore) -> Recommendation {
        let w = &self.weights;
        if (score.fund - score.insurance).abs() < w.blend_threshold {
            Recommendation {
                vehicle: Vehicle::Blend,
                score,
                blend_ratio: Some(BlendRatio {
                    fund_percent: w.blend_fund_percent,
                    insurance_percent: 100.0 - w.blend_fund_percent,
                }),
            }
        } else if score.fund > score.insurance {
            Recommendation {
                vehicle: Vehicle::Fund,
                score,
                blend_ratio: None,
            }
        } else {
            Recommendation {
                vehicle: Vehicle::Insurance,
                score,
                blend_ratio: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{CostSchedule, GuaranteeTerms};

    fn example_plan() -> ContributionPlan {
        ContributionPlan::new(300.0, 30)
    }

    fn example_insurance() -> InsuranceProduct {
        InsuranceProduct::new(
            "Fondspolice Klassik",
            ProductFamily::FundPolicy,
            0.0,
            CostSchedule::new(4.0, 0.8, 1.2, 0.35, 0.2),
            GuaranteeTerms::new(80.0, 1.0),
        )
    }

    fn comparator() -> VehicleComparator {
        VehicleComparator::new(TaxSettings::default_2024(), ProjectionConfig::default())
    }

    #[test]
    fn test_scores_within_bounds() {
        let result = comparator()
            .compare(&example_plan(), &FundAssumptions::default(), &example_insurance())
            .unwrap();

        let score = result.recommendation.score;
        assert!((0.0..=100.0).contains(&score.fund));
        assert!((0.0..=100.0).contains(&score.insurance));
    }

    #[test]
    fn test_cheap_fund_beats_expensive_insurance_on_net() {
        let result = comparator()
            .compare(&example_plan(), &FundAssumptions::default(), &example_insurance())
            .unwrap();

        // 0.3% TER against a 2.55% drag plus 4% acquisition: the fund ends
        // with the higher net payout even after full taxation.
        assert!(result.fund.net_value > result.insurance.net_value);
        assert!(result.difference.net_difference > 0.0);
        assert!(result.difference.cost_difference > 0.0);
    }

    #[test]
    fn test_blend_recommended_when_scores_close() {
        // Force closeness: identical nets through a zero-cost insurance
        // product would still split on the fixed bonuses, so steer the
        // threshold instead.
        let comparator = comparator().with_weights(ScoringWeights {
            blend_threshold: 100.0,
            ..ScoringWeights::default()
        });
        let result = comparator
            .compare(&example_plan(), &FundAssumptions::default(), &example_insurance())
            .unwrap();

        assert_eq!(result.recommendation.vehicle, Vehicle::Blend);
        let ratio = result.recommendation.blend_ratio.unwrap();
        assert_eq!(ratio.fund_percent, 60.0);
        assert_eq!(ratio.insurance_percent, 40.0);
    }

    #[test]
    fn test_clear_winner_when_threshold_tight() {
        let comparator = comparator().with_weights(ScoringWeights {
            blend_threshold: 0.1,
            ..ScoringWeights::default()
        });
        let result = comparator
            .compare(&example_plan(), &FundAssumptions::default(), &example_insurance())
            .unwrap();

        assert_ne!(result.recommendation.vehicle, Vehicle::Blend);
        assert!(result.recommendation.blend_ratio.is_none());
    }

    #[test]
    fn test_guarantee_level_raises_insurance_score() {
        let low = InsuranceProduct {
            guarantee: GuaranteeTerms::new(0.0, 1.0),
            ..example_insurance()
        };
        let high = InsuranceProduct {
            guarantee: GuaranteeTerms::new(100.0, 1.0),
            ..example_insurance()
        };

        let plan = example_plan();
        let fund = FundAssumptions::default();
        let score_low = comparator().compare(&plan, &fund, &low).unwrap();
        let score_high = comparator().compare(&plan, &fund, &high).unwrap();

        assert!(
            score_high.recommendation.score.insurance
                > score_low.recommendation.score.insurance
        );
    }

    #[test]
    fn test_guarantee_benefit_reported() {
        let result = comparator()
            .compare(&example_plan(), &FundAssumptions::default(), &example_insurance())
            .unwrap();
        assert!((result.difference.guarantee_benefit - 86_400.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let bad_plan = ContributionPlan::new(300.0, 0);
        assert!(comparator()
            .compare(&bad_plan, &FundAssumptions::default(), &example_insurance())
            .is_err());
    }

    #[test]
    fn test_shared_plan_drives_both_legs() {
        let result = comparator()
            .compare(&example_plan(), &FundAssumptions::default(), &example_insurance())
            .unwrap();

        let last_fund = result.fund.series.last().unwrap();
        let last_insurance = result.insurance.series.last().unwrap();
        assert_eq!(last_fund.contributions_to_date, 108_000.0);
        assert_eq!(last_insurance.contributions_to_date, 108_000.0);
    }
}
