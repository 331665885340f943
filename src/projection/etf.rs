//! ETF savings-plan projector
//!
//! Unlike the insurance wrapper, a plain savings plan is taxed while it
//! accumulates: every completed holding year is assessed a Vorabpauschale,
//! and the sale at the end of the horizon offsets those advance lump sums
//! against the total gain. The allowance ledger is shared across all of
//! those events in chronological order.

use crate::error::{check_rate, InputError};
use crate::percent;
use crate::product::{ContributionPlan, FundAssumptions};
use crate::projection::series::{EtfProjection, YearlyProjectionPoint};
use crate::tax::{final_sale_tax, partial_exemption, vorabpauschale, TaxSettings};

/// Projection engine for the ETF savings-plan leg
pub struct EtfProjector {
    settings: TaxSettings,
}

impl EtfProjector {
    pub fn new(settings: TaxSettings) -> Self {
        Self { settings }
    }

    /// Project a savings plan at a fixed gross return assumption.
    pub fn project(
        &self,
        plan: &ContributionPlan,
        fund: &FundAssumptions,
        gross_rate_percent: f64,
    ) -> Result<EtfProjection, InputError> {
        plan.validate()?;
        fund.validate()?;
        self.settings.validate()?;
        check_rate("gross return", gross_rate_percent)?;

        let net_rate = gross_rate_percent - fund.annual_fee_percent;
        let monthly_rate = percent::fraction(net_rate) / 12.0;
        let annual_contribution = plan.monthly_amount * 12.0;

        let mut ledger = self.settings.new_ledger();
        let mut value = 0.0;
        let mut tax_paid = 0.0;
        // Advance lump sums on the post-exemption basis, offset at sale
        let mut vorabpauschale_taxed = 0.0;

        let mut series = Vec::with_capacity(plan.horizon_years as usize + 1);
        series.push(YearlyProjectionPoint::origin());

        for year in 1..=plan.horizon_years {
            let value_at_year_start = value;
            for _month in 0..12 {
                value = (value + plan.monthly_amount) * (1.0 + monthly_rate);
            }

            // The sale year is assessed through the sale tax below, not a
            // further advance lump sum.
            if year < plan.horizon_years {
                let gain_of_year = value - value_at_year_start - annual_contribution;
                let advance = vorabpauschale(
                    value_at_year_start,
                    self.settings.vorabpauschale_base_rate_percent,
                    fund.annual_fee_percent,
                    gain_of_year,
                );
                let taxable =
                    partial_exemption(advance, self.settings.partial_exemption_rate_percent)
                        .taxable;
                let slice = ledger.consume(taxable);
                tax_paid += slice.taxable_after_allowance
                    * percent::fraction(self.settings.effective_capital_gains_rate_percent());
                vorabpauschale_taxed += taxable;
            }

            series.push(YearlyProjectionPoint {
                year,
                contributions_to_date: plan.contributions_through_year(year),
                gross_value: value,
                tax_paid_to_date: tax_paid,
                net_value: value - tax_paid,
            });
        }

        // Final sale: exemption first, then the ledger and rate inside
        // final_sale_tax. No half-income rule outside the insurance wrapper.
        let total_gains = value - plan.total_contributions();
        let sale_tax = if total_gains > 0.0 {
            let taxable =
                partial_exemption(total_gains, self.settings.partial_exemption_rate_percent)
                    .taxable;
            final_sale_tax(taxable, vorabpauschale_taxed, &self.settings, &mut ledger).final_tax
        } else {
            0.0
        };
        tax_paid += sale_tax;

        if let Some(last) = series.last_mut() {
            last.tax_paid_to_date = tax_paid;
            last.net_value = value - tax_paid;
        }

        Ok(EtfProjection {
            gross_value: value,
            net_value: value - tax_paid,
            total_tax: tax_paid,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::annuity::future_value_of_annuity;

    fn example_plan() -> ContributionPlan {
        ContributionPlan::new(300.0, 30)
    }

    #[test]
    fn test_gross_value_matches_annuity_closed_form() {
        let projector = EtfProjector::new(TaxSettings::default_2024());
        let fund = FundAssumptions::new(0.3);
        let projection = projector.project(&example_plan(), &fund, 6.0).unwrap();

        // The month loop and the closed form describe the same accumulation
        let closed = future_value_of_annuity(300.0, 5.7, 30);
        assert!(
            (projection.gross_value - closed).abs() / closed < 1e-10,
            "month loop {} vs closed form {}",
            projection.gross_value,
            closed
        );
    }

    #[test]
    fn test_tax_accrues_during_accumulation() {
        let projector = EtfProjector::new(TaxSettings::default_2024());
        let projection = projector
            .project(&example_plan(), &FundAssumptions::default(), 6.0)
            .unwrap();

        // The allowance absorbs the first advance lump sums, then tax
        // accrues year over year and jumps at the sale.
        let taxes: Vec<f64> = projection.series.iter().map(|p| p.tax_paid_to_date).collect();
        assert!(taxes.windows(2).all(|w| w[1] >= w[0]), "tax paid must be monotone");
        assert!(projection.total_tax > 0.0);
        assert_eq!(
            projection.series.last().unwrap().tax_paid_to_date,
            projection.total_tax
        );
        assert!(projection.net_value < projection.gross_value);
    }

    #[test]
    fn test_advance_lump_sums_offset_the_sale() {
        // With and without the Vorabpauschale base rate the total tax may
        // only differ by allowance timing, never double-tax the same gain.
        let with_vorab = EtfProjector::new(TaxSettings::default_2024());
        let without_vorab = EtfProjector::new(TaxSettings {
            vorabpauschale_base_rate_percent: 0.0,
            ..TaxSettings::default_2024()
        });

        let plan = example_plan();
        let fund = FundAssumptions::default();
        let a = with_vorab.project(&plan, &fund, 6.0).unwrap();
        let b = without_vorab.project(&plan, &fund, 6.0).unwrap();

        assert!((a.gross_value - b.gross_value).abs() < 1e-9);
        // Identical taxable base overall: totals agree within a rounding
        // whisker because the advance amounts are fully offset at sale.
        assert!((a.total_tax - b.total_tax).abs() < 1.0);
    }

    #[test]
    fn test_zero_rate_degenerates_to_contribution_sum() {
        let projector = EtfProjector::new(TaxSettings::default_2024());
        let fund = FundAssumptions::new(0.0);
        let projection = projector.project(&example_plan(), &fund, 0.0).unwrap();

        assert_eq!(projection.gross_value, 108_000.0);
        assert_eq!(projection.total_tax, 0.0);
        assert_eq!(projection.net_value, 108_000.0);
    }

    #[test]
    fn test_loss_scenario_pays_no_tax() {
        // Fee above gross: the plan ends below the paid-in sum
        let projector = EtfProjector::new(TaxSettings::default_2024());
        let fund = FundAssumptions::new(2.0);
        let projection = projector.project(&example_plan(), &fund, 1.0).unwrap();

        assert!(projection.gross_value < 108_000.0);
        assert_eq!(projection.total_tax, 0.0);
    }
}
