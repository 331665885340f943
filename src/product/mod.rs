//! Product definitions: contribution plans, guarantees, and cost schedules

mod costs;
mod data;

pub use costs::{decompose_costs, net_annual_return, CostBreakdown, CostSchedule, AVG_PORTFOLIO_FACTOR};
pub use data::{
    ContributionPlan, FundAssumptions, GuaranteeTerms, InsuranceProduct, ProductFamily,
    GUARANTEE_LEVELS,
};

pub(crate) use costs::recurring_cost;
