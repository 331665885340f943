//! Input validation errors
//!
//! Invalid inputs are rejected once at the call boundary, before any
//! projection starts. Numeric degenerates (zero net rate, zero gains,
//! exhausted allowance) are not errors and are handled by explicit
//! branches in the computation itself.

use thiserror::Error;

/// A contract violation in the inputs of a top-level call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("monthly contribution must not be negative, got {0}")]
    NegativeContribution(f64),

    #[error("projection horizon must be at least one year, got {0}")]
    InvalidHorizon(u32),

    #[error("guarantee level {0}% is not one of the offered levels (0, 50, 80, 90, 100)")]
    InvalidGuaranteeLevel(f64),

    #[error("death benefit multiplier must be at least 1.0, got {0}")]
    InvalidDeathBenefitMultiplier(f64),

    #[error("{name} must lie in [0, 100], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("age {0} is outside the supported range [18, 100]")]
    AgeOutOfRange(u8),

    #[error("allowance amount must not be negative, got {0}")]
    NegativeAllowance(f64),
}

/// Check a boundary percentage against the [0, 100] contract.
pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<(), InputError> {
    if !(0.0..=100.0).contains(&value) || value.is_nan() {
        return Err(InputError::RateOutOfRange { name, value });
    }
    Ok(())
}

/// Check an age against the supported human range.
pub(crate) fn check_age(age: u8) -> Result<(), InputError> {
    if !(18..=100).contains(&age) {
        return Err(InputError::AgeOutOfRange(age));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_bounds() {
        assert!(check_rate("tax rate", 0.0).is_ok());
        assert!(check_rate("tax rate", 100.0).is_ok());
        assert!(check_rate("tax rate", 100.1).is_err());
        assert!(check_rate("tax rate", -0.5).is_err());
        assert!(check_rate("tax rate", f64::NAN).is_err());
    }

    #[test]
    fn test_age_bounds() {
        assert!(check_age(18).is_ok());
        assert!(check_age(100).is_ok());
        assert_eq!(check_age(17), Err(InputError::AgeOutOfRange(17)));
        assert_eq!(check_age(101), Err(InputError::AgeOutOfRange(101)));
    }
}
