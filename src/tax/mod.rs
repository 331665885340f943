//! German tax rules for investment and pension income
//!
//! The rule set is injected as an explicit, year-stamped [`TaxSettings`]
//! value so that several tax years can coexist; nothing in this module
//! reads hidden global state.

mod allowance;
pub mod capital_gains;
pub mod pension;

pub use allowance::{AllowanceLedger, AllowanceSlice};
pub use capital_gains::{
    final_sale_tax, half_income_taxation, partial_exemption, vorabpauschale, ExemptionSplit,
    FinalSaleTax, HALF_INCOME_MIN_AGE, MIN_HOLDING_YEARS,
};
pub use pension::{pension_tax, ErtragsanteilTable, PensionTax};

use serde::{Deserialize, Serialize};

use crate::error::{check_rate, InputError};
use crate::percent;

/// Tax parameters for one assessment year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Flat capital gains rate including solidarity surcharge, percent
    pub capital_gains_rate_percent: f64,

    /// Whether church tax is added on top of the capital gains rate
    pub church_tax_enabled: bool,

    /// Church tax rate, percent of the capital gains tax
    pub church_tax_rate_percent: f64,

    /// Sparer-Pauschbetrag in EUR
    pub allowance_amount: f64,

    /// Basiszins used for the Vorabpauschale, percent
    pub vorabpauschale_base_rate_percent: f64,

    /// Teilfreistellung for equity funds, percent of gains
    pub partial_exemption_rate_percent: f64,

    /// Whether the age-62/12-year half-income rule may apply at all
    pub half_income_taxation_enabled: bool,
}

impl TaxSettings {
    /// Parameters for assessment year 2024
    /// (Basiszins 2.29%, Sparer-Pauschbetrag 1,000 EUR)
    pub fn default_2024() -> Self {
        Self {
            capital_gains_rate_percent: 26.375,
            church_tax_enabled: false,
            church_tax_rate_percent: 9.0,
            allowance_amount: 1_000.0,
            vorabpauschale_base_rate_percent: 2.29,
            partial_exemption_rate_percent: 15.0,
            half_income_taxation_enabled: true,
        }
    }

    /// Parameters for assessment year 2023 (Basiszins 2.55%)
    pub fn default_2023() -> Self {
        Self {
            vorabpauschale_base_rate_percent: 2.55,
            ..Self::default_2024()
        }
    }

    /// Capital gains rate with church tax folded in, percent
    pub fn effective_capital_gains_rate_percent(&self) -> f64 {
        if self.church_tax_enabled {
            self.capital_gains_rate_percent
                * (1.0 + percent::fraction(self.church_tax_rate_percent))
        } else {
            self.capital_gains_rate_percent
        }
    }

    /// Fresh per-run allowance ledger for one scenario evaluation
    pub fn new_ledger(&self) -> AllowanceLedger {
        AllowanceLedger::new(self.allowance_amount)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        check_rate("capital gains rate", self.capital_gains_rate_percent)?;
        check_rate("church tax rate", self.church_tax_rate_percent)?;
        check_rate(
            "Vorabpauschale base rate",
            self.vorabpauschale_base_rate_percent,
        )?;
        check_rate(
            "partial exemption rate",
            self.partial_exemption_rate_percent,
        )?;
        if self.allowance_amount < 0.0 || self.allowance_amount.is_nan() {
            return Err(InputError::NegativeAllowance(self.allowance_amount));
        }
        Ok(())
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self::default_2024()
    }
}
