//! Discount eligibility
//!
//! Checks run in a fixed order and the first failing check is reported, so a customer always
//! sees the same reason for the same code.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use super::DiscountTerms;

/// Why a discount code cannot be applied.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Ineligible<'a> {
    /// The code has been switched off.
    #[error("discount code is not active")]
    Inactive,

    /// The code's start time is in the future.
    #[error("discount code is not yet valid")]
    NotStarted,

    /// The code's expiry time has passed.
    #[error("discount code has expired")]
    Expired,

    /// The code has been redeemed the maximum number of times.
    #[error("discount code usage limit reached")]
    UsageLimitReached,

    /// The user has redeemed the code the maximum number of times.
    #[error("discount code already used the maximum number of times by this user")]
    UserLimitReached,

    /// The subtotal is below the code's minimum order amount.
    #[error("order subtotal is below the minimum of {minimum}")]
    BelowMinimum {
        /// Minimum subtotal for the code
        minimum: Money<'a, Currency>,
    },
}

/// When a discount code may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscountWindow {
    /// Whether the code is switched on
    pub is_active: bool,

    /// First moment the code may be used
    pub starts_at: Option<Timestamp>,

    /// Moment after which the code may no longer be used
    pub expires_at: Option<Timestamp>,
}

/// How often a discount code has been used, and how often it may be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscountUsage {
    /// Total redemptions across all users
    pub used_count: u64,

    /// Maximum total redemptions
    pub usage_limit: Option<u64>,

    /// Redemptions by the user checking out
    pub user_used_count: u64,

    /// Maximum redemptions per user
    pub usage_limit_per_user: Option<u64>,
}

/// Check whether a discount code can be applied to `subtotal` at `now`.
///
/// # Errors
///
/// Returns the first [`Ineligible`] reason, checked in this order: inactive, not started,
/// expired, usage limit, per-user limit, minimum order amount.
pub fn check_eligibility<'a>(
    window: &DiscountWindow,
    usage: &DiscountUsage,
    terms: &DiscountTerms<'a>,
    subtotal: &Money<'a, Currency>,
    now: Timestamp,
) -> Result<(), Ineligible<'a>> {
    if !window.is_active {
        return Err(Ineligible::Inactive);
    }

    if window.starts_at.is_some_and(|starts_at| now < starts_at) {
        return Err(Ineligible::NotStarted);
    }

    if window.expires_at.is_some_and(|expires_at| now > expires_at) {
        return Err(Ineligible::Expired);
    }

    if usage
        .usage_limit
        .is_some_and(|limit| usage.used_count >= limit)
    {
        return Err(Ineligible::UsageLimitReached);
    }

    if usage
        .usage_limit_per_user
        .is_some_and(|limit| usage.user_used_count >= limit)
    {
        return Err(Ineligible::UserLimitReached);
    }

    if let Some(minimum) = terms.min_order_amount()
        && subtotal.to_minor_units() < minimum.to_minor_units()
    {
        return Err(Ineligible::BelowMinimum { minimum: *minimum });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::discounts::DiscountKind;

    use super::*;

    fn active() -> DiscountWindow {
        DiscountWindow {
            is_active: true,
            ..DiscountWindow::default()
        }
    }

    fn terms() -> TestResult<DiscountTerms<'static>> {
        Ok(DiscountTerms::new(DiscountKind::fixed_amount(
            Money::from_minor(500, USD),
        )?))
    }

    #[test]
    fn active_code_without_limits_is_eligible() -> TestResult {
        let result = check_eligibility(
            &active(),
            &DiscountUsage::default(),
            &terms()?,
            &Money::from_minor(1_000, USD),
            Timestamp::now(),
        );

        assert_eq!(result, Ok(()));

        Ok(())
    }

    #[test]
    fn inactive_code_is_reported_before_anything_else() -> TestResult {
        let usage = DiscountUsage {
            used_count: 10,
            usage_limit: Some(1),
            ..DiscountUsage::default()
        };

        let result = check_eligibility(
            &DiscountWindow::default(),
            &usage,
            &terms()?,
            &Money::from_minor(1_000, USD),
            Timestamp::now(),
        );

        assert_eq!(result, Err(Ineligible::Inactive));

        Ok(())
    }

    #[test]
    fn code_before_start_is_not_started() -> TestResult {
        let now = Timestamp::now();
        let window = DiscountWindow {
            starts_at: Some(now.checked_add(1.hour())?),
            ..active()
        };

        let result = check_eligibility(
            &window,
            &DiscountUsage::default(),
            &terms()?,
            &Money::from_minor(1_000, USD),
            now,
        );

        assert_eq!(result, Err(Ineligible::NotStarted));

        Ok(())
    }

    #[test]
    fn code_after_expiry_is_expired() -> TestResult {
        let now = Timestamp::now();
        let window = DiscountWindow {
            expires_at: Some(now.checked_sub(1.minute())?),
            ..active()
        };

        let result = check_eligibility(
            &window,
            &DiscountUsage::default(),
            &terms()?,
            &Money::from_minor(1_000, USD),
            now,
        );

        assert_eq!(result, Err(Ineligible::Expired));

        Ok(())
    }

    #[test]
    fn exhausted_code_hits_usage_limit() -> TestResult {
        let usage = DiscountUsage {
            used_count: 3,
            usage_limit: Some(3),
            ..DiscountUsage::default()
        };

        let result = check_eligibility(
            &active(),
            &usage,
            &terms()?,
            &Money::from_minor(1_000, USD),
            Timestamp::now(),
        );

        assert_eq!(result, Err(Ineligible::UsageLimitReached));

        Ok(())
    }

    #[test]
    fn user_who_used_code_hits_user_limit() -> TestResult {
        let usage = DiscountUsage {
            user_used_count: 1,
            usage_limit_per_user: Some(1),
            ..DiscountUsage::default()
        };

        let result = check_eligibility(
            &active(),
            &usage,
            &terms()?,
            &Money::from_minor(1_000, USD),
            Timestamp::now(),
        );

        assert_eq!(result, Err(Ineligible::UserLimitReached));

        Ok(())
    }

    #[test]
    fn small_subtotal_is_below_minimum() -> TestResult {
        let minimum = Money::from_minor(2_500, USD);
        let terms = terms()?.with_min_order_amount(Some(minimum));

        let result = check_eligibility(
            &active(),
            &DiscountUsage::default(),
            &terms,
            &Money::from_minor(2_499, USD),
            Timestamp::now(),
        );

        assert_eq!(result, Err(Ineligible::BelowMinimum { minimum }));

        Ok(())
    }

    #[test]
    fn subtotal_equal_to_minimum_is_eligible() -> TestResult {
        let terms = terms()?.with_min_order_amount(Some(Money::from_minor(2_500, USD)));

        let result = check_eligibility(
            &active(),
            &DiscountUsage::default(),
            &terms,
            &Money::from_minor(2_500, USD),
            Timestamp::now(),
        );

        assert_eq!(result, Ok(()));

        Ok(())
    }
}
