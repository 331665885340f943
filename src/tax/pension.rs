//! Pension income taxation via the age-indexed Ertragsanteil
//!
//! Pension payments are taxed at the personal marginal rate on the
//! Ertragsanteil share only, a separate regime from the flat capital
//! gains tax.

use serde::{Deserialize, Serialize};

use crate::percent;

/// Ertragsanteil percentages by age at payment start
///
/// An exact lookup table, not an interpolated formula: the statutory
/// schedule is flat at 36% below 47, steps down one percentage point per
/// year through the 47-66 band, and clamps at 17% from age 67 on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErtragsanteilTable {
    /// (age at payment start, percent) rows for the stepped band
    entries: Vec<(u8, f64)>,
}

impl Default for ErtragsanteilTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (47, 36.0),
                (48, 35.0),
                (49, 34.0),
                (50, 33.0),
                (51, 32.0),
                (52, 31.0),
                (53, 30.0),
                (54, 29.0),
                (55, 28.0),
                (56, 27.0),
                (57, 26.0),
                (58, 25.0),
                (59, 24.0),
                (60, 23.0),
                (61, 22.0),
                (62, 21.0),
                (63, 20.0),
                (64, 19.0),
                (65, 18.0),
                (66, 17.0),
            ],
        }
    }
}

impl ErtragsanteilTable {
    /// Taxable share for a pension starting at the given age, percent.
    /// Clamps at 36% below the band and 17% above it.
    pub fn percentage(&self, age_at_payment_start: u8) -> f64 {
        for (age, rate) in &self.entries {
            if *age == age_at_payment_start {
                return *rate;
            }
        }

        if self
            .entries
            .first()
            .is_some_and(|(age, _)| age_at_payment_start < *age)
        {
            self.entries.first().map(|(_, rate)| *rate).unwrap_or(36.0)
        } else {
            self.entries.last().map(|(_, rate)| *rate).unwrap_or(17.0)
        }
    }
}

/// Tax on a pension payment stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionTax {
    /// Taxable share applied, percent
    pub ertragsanteil_percent: f64,

    /// Annual taxable amount in EUR
    pub taxable_amount: f64,

    /// Annual tax in EUR
    pub tax: f64,
}

/// Annual tax on a monthly pension starting at the given age.
pub fn pension_tax(
    monthly_pension: f64,
    age_at_payment_start: u8,
    personal_tax_rate_percent: f64,
) -> PensionTax {
    let table = ErtragsanteilTable::default();
    let ertragsanteil_percent = table.percentage(age_at_payment_start);
    let taxable_amount = monthly_pension * 12.0 * percent::fraction(ertragsanteil_percent);
    let tax = taxable_amount * percent::fraction(personal_tax_rate_percent);

    PensionTax {
        ertragsanteil_percent,
        taxable_amount,
        tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let table = ErtragsanteilTable::default();
        assert_eq!(table.percentage(30), 36.0);
        assert_eq!(table.percentage(46), 36.0);
        assert_eq!(table.percentage(47), 36.0);
        assert_eq!(table.percentage(48), 35.0);
        assert_eq!(table.percentage(65), 18.0);
        assert_eq!(table.percentage(66), 17.0);
        assert_eq!(table.percentage(67), 17.0);
        // Clamps instead of continuing to decrease
        assert_eq!(table.percentage(68), 17.0);
        assert_eq!(table.percentage(90), 17.0);
    }

    #[test]
    fn test_monotonically_non_increasing() {
        let table = ErtragsanteilTable::default();
        let mut previous = table.percentage(18);
        for age in 19..=100 {
            let current = table.percentage(age);
            assert!(
                current <= previous,
                "Ertragsanteil increased between {} and {}",
                age - 1,
                age
            );
            previous = current;
        }
    }

    #[test]
    fn test_pension_tax_at_67() {
        // 1000/month at 67: taxable = 12000 * 17% = 2040, tax at 30% = 612
        let result = pension_tax(1_000.0, 67, 30.0);
        assert_eq!(result.ertragsanteil_percent, 17.0);
        assert!((result.taxable_amount - 2_040.0).abs() < 1e-9);
        assert!((result.tax - 612.0).abs() < 1e-9);
    }

    #[test]
    fn test_pension_tax_zero_rate() {
        let result = pension_tax(1_000.0, 67, 0.0);
        assert_eq!(result.tax, 0.0);
        assert!(result.taxable_amount > 0.0);
    }
}
