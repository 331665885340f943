//! Compound-interest primitives shared by every projector

use crate::percent;

/// Future value of a monthly annuity-due after a number of years.
///
/// `c * ((1+r)^n - 1) / r * (1+r)` with `r` the monthly rate derived from
/// the annual net rate and `n` the number of monthly contributions. The
/// zero-rate branch returns the plain contribution sum; that case is
/// reachable whenever the gross assumption equals the cost rate exactly,
/// and must not divide by zero.
pub fn future_value_of_annuity(
    monthly_contribution: f64,
    annual_net_rate_percent: f64,
    years: u32,
) -> f64 {
    let r = percent::fraction(annual_net_rate_percent) / 12.0;
    let n = (years * 12) as f64;

    if r == 0.0 {
        return monthly_contribution * n;
    }

    monthly_contribution * (((1.0 + r).powf(n) - 1.0) / r) * (1.0 + r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_rate_identity() {
        // Degenerate case: linear sum, no compounding
        assert_eq!(future_value_of_annuity(300.0, 0.0, 30), 300.0 * 360.0);
        assert_eq!(future_value_of_annuity(50.0, 0.0, 1), 600.0);
    }

    #[test]
    fn test_closed_form_matches_month_loop() {
        // The closed form is the fixed point of depositing at the start of
        // each month and compounding to month end.
        let monthly = 300.0;
        let annual_net = 3.45;
        let years = 30;

        let r = annual_net / 100.0 / 12.0;
        let mut value = 0.0;
        for _ in 0..years * 12 {
            value = (value + monthly) * (1.0 + r);
        }

        let closed = future_value_of_annuity(monthly, annual_net, years);
        assert_relative_eq!(closed, value, max_relative = 1e-10);
    }

    #[test]
    fn test_negative_net_rate() {
        // Costs above gross: value ends below the paid-in sum, no NaN
        let value = future_value_of_annuity(300.0, -2.55, 30);
        assert!(value.is_finite());
        assert!(value < 300.0 * 360.0);
        assert!(value > 0.0);
    }

    #[test]
    fn test_monotone_in_rate() {
        let low = future_value_of_annuity(300.0, 2.0, 30);
        let high = future_value_of_annuity(300.0, 6.0, 30);
        assert!(high > low);
    }

    #[test]
    fn test_zero_contribution() {
        assert_eq!(future_value_of_annuity(0.0, 5.0, 30), 0.0);
    }
}
