//! Projection engines for the savings phase

pub mod annuity;
mod engine;
mod etf;
mod series;

pub use annuity::future_value_of_annuity;
pub use engine::{
    ProjectionConfig, ReturnAssumptions, ScenarioProjector, DEATH_BENEFIT_FLOOR_FACTOR,
    PENSION_PAYOUT_RATE_PERCENT,
};
pub use etf::EtfProjector;
pub use series::{
    DeathBenefit, EtfProjection, PensionPayout, ScenarioProjection, ScenarioResult,
    TrajectoryOutcome, YearlyProjectionPoint,
};
