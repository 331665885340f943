//! AWS Lambda handler for running vehicle comparisons
//!
//! Accepts one contribution plan plus product and tax parameters via JSON
//! and returns the full comparison result. Every request constructs its own
//! projector and allowance ledger; nothing is cached across invocations.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};

use vorsorge_engine::{
    projection::{ProjectionConfig, ReturnAssumptions},
    ComparisonResult, ContributionPlan, CostSchedule, FundAssumptions, GuaranteeTerms,
    InsuranceProduct, ProductFamily, TaxSettings, VehicleComparator,
};

/// Input configuration for one comparison
#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    /// Monthly contribution in EUR
    pub monthly_amount: f64,

    /// Savings horizon in years
    pub horizon_years: u32,

    /// Guarantee level of the insurance tariff (default: 80%)
    #[serde(default = "default_guarantee_level")]
    pub guarantee_level_percent: f64,

    /// Death benefit multiplier (default: 1.0)
    #[serde(default = "default_death_benefit_multiplier")]
    pub death_benefit_multiplier: f64,

    /// Annual ETF fee, percent (default: 0.3)
    #[serde(default = "default_ter")]
    pub fund_fee_percent: f64,

    /// Age at the end of the horizon (default: 67)
    #[serde(default = "default_payout_age")]
    pub payout_age: u8,

    /// Personal marginal tax rate, percent (default: 30)
    #[serde(default = "default_personal_tax_rate")]
    pub personal_tax_rate_percent: f64,

    /// Expected gross return assumption, percent (default: 6)
    #[serde(default = "default_expected_gross")]
    pub expected_gross_percent: f64,

    /// Optimistic gross return assumption, percent (default: 8)
    #[serde(default = "default_optimistic_gross")]
    pub optimistic_gross_percent: f64,

    /// Add church tax on top of the capital gains rate
    #[serde(default)]
    pub church_tax_enabled: bool,

    /// Insurance cost schedule override
    #[serde(default)]
    pub costs: Option<CostSchedule>,
}

fn default_guarantee_level() -> f64 { 80.0 }
fn default_death_benefit_multiplier() -> f64 { 1.0 }
fn default_ter() -> f64 { 0.3 }
fn default_payout_age() -> u8 { 67 }
fn default_personal_tax_rate() -> f64 { 30.0 }
fn default_expected_gross() -> f64 { 6.0 }
fn default_optimistic_gross() -> f64 { 8.0 }

/// Output wrapper with request metadata
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub result: ComparisonResult,
    pub execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(format!(r#"{{"error":"{}"}}"#, message)))
        .unwrap()
}

fn json_response(body: &ComparisonResponse) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: ComparisonRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    let plan = ContributionPlan::new(request.monthly_amount, request.horizon_years);
    let fund = FundAssumptions::new(request.fund_fee_percent);
    let insurance = InsuranceProduct::new(
        "Fondspolice Klassik",
        ProductFamily::FundPolicy,
        0.0,
        request.costs.unwrap_or_default(),
        GuaranteeTerms::new(
            request.guarantee_level_percent,
            request.death_benefit_multiplier,
        ),
    );

    let settings = TaxSettings {
        church_tax_enabled: request.church_tax_enabled,
        ..TaxSettings::default_2024()
    };
    let config = ProjectionConfig {
        returns: ReturnAssumptions {
            expected_gross_percent: request.expected_gross_percent,
            optimistic_gross_percent: request.optimistic_gross_percent,
        },
        payout_age: request.payout_age,
        personal_tax_rate_percent: request.personal_tax_rate_percent,
    };

    // Fresh comparator per request: per-run state must never be shared
    let comparator = VehicleComparator::new(settings, config);
    let result = match comparator.compare(&plan, &fund, &insurance) {
        Ok(result) => result,
        Err(e) => {
            return Ok(error_response(422, &e.to_string()));
        }
    };

    Ok(json_response(&ComparisonResponse {
        result,
        execution_time_ms: start.elapsed().as_millis() as u64,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
