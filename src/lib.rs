//! Vorsorge Engine - financial projection and German tax engine for retirement products
//!
//! This library provides:
//! - Compound-growth projections of recurring contributions net of fees
//! - German capital-gains taxation of fund investments (Vorabpauschale,
//!   Teilfreistellung, Sparer-Pauschbetrag, half-income rule)
//! - Pension income taxation via the age-indexed Ertragsanteil
//! - Cost decomposition for insurance tariffs
//! - Scored comparison of savings vehicles with a ranked recommendation
//!
//! All computation is synchronous and side-effect-free; per-run state such
//! as the allowance ledger is constructed fresh for every evaluation.

pub mod comparison;
pub mod error;
pub mod product;
pub mod projection;
pub mod tax;

mod percent;

// Re-export commonly used types
pub use comparison::{ComparisonResult, Recommendation, ScoringWeights, Vehicle, VehicleComparator};
pub use error::InputError;
pub use product::{ContributionPlan, CostSchedule, FundAssumptions, GuaranteeTerms, InsuranceProduct, ProductFamily};
pub use projection::{ProjectionConfig, ScenarioProjector, ScenarioResult, YearlyProjectionPoint};
pub use tax::TaxSettings;
