//! Capital-gains taxation of fund investments
//!
//! Vorabpauschale, Teilfreistellung, Halbeinkünfteverfahren and the final
//! sale tax. Callers must apply the steps in this order:
//! (1) partial exemption, (2) half-income taxation, (3) allowance,
//! (4) tax rate. The allowance and rate steps live in [`final_sale_tax`];
//! reordering changes the taxable base.

use serde::{Deserialize, Serialize};

use crate::percent;
use crate::tax::{AllowanceLedger, TaxSettings};

/// Statutory discount on the base yield: only 70% of it is taxed in advance.
pub const VORABPAUSCHALE_DISCOUNT: f64 = 0.7;

/// Minimum age for the half-income rule on insurance payouts.
pub const HALF_INCOME_MIN_AGE: u8 = 62;

/// Minimum holding period in years for the half-income rule.
pub const MIN_HOLDING_YEARS: u32 = 12;

/// Advance lump-sum taxable amount for one year of an accumulating fund.
///
/// `theoretical = value * max(0, base_rate - fee) / 100 * 0.7`, clamped so
/// the result is never negative and never exceeds the actual gain of the
/// period.
pub fn vorabpauschale(
    investment_value: f64,
    base_rate_percent: f64,
    management_fee_percent: f64,
    actual_gain: f64,
) -> f64 {
    let net_base_percent = (base_rate_percent - management_fee_percent).max(0.0);
    let theoretical =
        investment_value.max(0.0) * percent::fraction(net_base_percent) * VORABPAUSCHALE_DISCOUNT;
    theoretical.min(actual_gain.max(0.0))
}

/// Gains split by the Teilfreistellung ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExemptionSplit {
    /// Statutorily exempted portion
    pub exempted: f64,

    /// Portion remaining in the taxable base
    pub taxable: f64,
}

/// Split gains by the flat partial-exemption ratio (15% for equity funds).
pub fn partial_exemption(gains: f64, exemption_rate_percent: f64) -> ExemptionSplit {
    let exempted = gains * percent::fraction(exemption_rate_percent);
    ExemptionSplit {
        exempted,
        taxable: gains - exempted,
    }
}

/// Halve the taxable amount when the half-income rule applies.
///
/// Hard cutoff at age 62, no phase-in. `eligible` carries the remaining
/// conditions (rule enabled, 12-year minimum holding met).
pub fn half_income_taxation(taxable_amount: f64, age: u8, eligible: bool) -> f64 {
    if eligible && age >= HALF_INCOME_MIN_AGE {
        taxable_amount * 0.5
    } else {
        taxable_amount
    }
}

/// Outcome of the sale-tax computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalSaleTax {
    /// Gains still taxable after offsetting advance lump sums
    pub remaining_taxable_gains: f64,

    /// Tax due on the sale in EUR
    pub final_tax: f64,
}

/// Tax due when the position is sold at the end of the horizon.
///
/// Advance lump sums already taxed in prior years are offset against the
/// total gains; the remainder runs through the allowance ledger and the
/// effective rate (church tax folded in when enabled). Both `total_gains`
/// and `vorabpauschale_already_taxed` must be on the same (post-exemption)
/// basis.
pub fn final_sale_tax(
    total_gains: f64,
    vorabpauschale_already_taxed: f64,
    settings: &TaxSettings,
    ledger: &mut AllowanceLedger,
) -> FinalSaleTax {
    let remaining_taxable_gains = (total_gains - vorabpauschale_already_taxed).max(0.0);
    let slice = ledger.consume(remaining_taxable_gains);
    let final_tax = slice.taxable_after_allowance
        * percent::fraction(settings.effective_capital_gains_rate_percent());

    FinalSaleTax {
        remaining_taxable_gains,
        final_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vorabpauschale_boundedness() {
        // Theoretical below the gain: 10000 * (2.29 - 0.3)% * 0.7 = 139.3
        let v = vorabpauschale(10_000.0, 2.29, 0.3, 800.0);
        assert!((v - 139.3).abs() < 1e-9);

        // Clamped to the actual gain
        assert_eq!(vorabpauschale(10_000.0, 2.29, 0.3, 50.0), 50.0);

        // Loss year yields zero
        assert_eq!(vorabpauschale(10_000.0, 2.29, 0.3, -500.0), 0.0);

        // Fee above the base rate yields zero
        assert_eq!(vorabpauschale(10_000.0, 2.29, 3.0, 800.0), 0.0);
    }

    #[test]
    fn test_partial_exemption_split() {
        let split = partial_exemption(1_000.0, 15.0);
        assert_eq!(split.exempted, 150.0);
        assert_eq!(split.taxable, 850.0);
        assert!((split.exempted + split.taxable - 1_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_half_income_age_cutoff() {
        assert_eq!(half_income_taxation(1_000.0, 62, true), 500.0);
        assert_eq!(half_income_taxation(1_000.0, 61, true), 1_000.0);
        assert_eq!(half_income_taxation(1_000.0, 70, false), 1_000.0);
    }

    #[test]
    fn test_final_sale_offsets_advance_lump_sums() {
        let settings = TaxSettings::default_2024();
        let mut ledger = settings.new_ledger();

        let result = final_sale_tax(10_000.0, 2_500.0, &settings, &mut ledger);
        assert_eq!(result.remaining_taxable_gains, 7_500.0);
        // 1000 allowance consumed, 6500 taxed at 26.375%
        assert!((result.final_tax - 6_500.0 * 0.26375).abs() < 1e-9);
    }

    #[test]
    fn test_final_sale_never_negative() {
        let settings = TaxSettings::default_2024();
        let mut ledger = settings.new_ledger();

        // Advance lump sums exceed the gains of a weak horizon
        let result = final_sale_tax(1_000.0, 2_500.0, &settings, &mut ledger);
        assert_eq!(result.remaining_taxable_gains, 0.0);
        assert_eq!(result.final_tax, 0.0);
        // Nothing consumed for a zero base
        assert_eq!(ledger.remaining(), 1_000.0);
    }

    #[test]
    fn test_final_sale_with_church_tax() {
        let settings = TaxSettings {
            church_tax_enabled: true,
            allowance_amount: 0.0,
            ..TaxSettings::default_2024()
        };
        let mut ledger = settings.new_ledger();

        let result = final_sale_tax(1_000.0, 0.0, &settings, &mut ledger);
        assert!((result.final_tax - 1_000.0 * 0.2874875).abs() < 1e-9);
    }

    #[test]
    fn test_ordering_chain_matches_manual_computation() {
        // Full chain on 20,000 of gains at age 65 with the rule eligible:
        // exemption 15% -> 17,000; half income -> 8,500; allowance 1,000
        // -> 7,500; rate 26.375% -> 1,978.125
        let settings = TaxSettings::default_2024();
        let mut ledger = settings.new_ledger();

        let taxable = partial_exemption(20_000.0, settings.partial_exemption_rate_percent).taxable;
        let halved = half_income_taxation(taxable, 65, true);
        let result = final_sale_tax(halved, 0.0, &settings, &mut ledger);

        assert!((result.final_tax - 1_978.125).abs() < 1e-9);
    }
}
