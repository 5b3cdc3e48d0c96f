//! Discount codes
//!
//! A discount code grants either a percentage or a fixed amount off an order subtotal. The
//! computed amount can be capped by a maximum discount, and is never larger than the subtotal it
//! applies to. Whether a code may be used at all is decided by [`eligibility`].

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

pub mod eligibility;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Percentage discounts must be greater than 0% and at most 100%.
    #[error("percentage must be greater than 0 and at most 100")]
    InvalidPercentage,

    /// Fixed amount discounts must be greater than zero.
    #[error("discount amount must be greater than zero")]
    InvalidAmount,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// How a discount code reduces the subtotal.
#[derive(Debug, Copy, Clone)]
pub enum DiscountKind<'a> {
    /// A percentage of the subtotal (e.g., "10% off")
    Percentage(Percentage),

    /// A fixed amount off the subtotal (e.g., "$5 off")
    FixedAmount(Money<'a, Currency>),
}

impl<'a> DiscountKind<'a> {
    /// Create a percentage discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidPercentage`] unless `0 < percent <= 1`.
    pub fn percentage(percent: Percentage) -> Result<Self, DiscountError> {
        let value = percent * Decimal::ONE;

        if value <= Decimal::ZERO || value > Decimal::ONE {
            return Err(DiscountError::InvalidPercentage);
        }

        Ok(Self::Percentage(percent))
    }

    /// Create a fixed amount discount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidAmount`] unless the amount is positive.
    pub fn fixed_amount(amount: Money<'a, Currency>) -> Result<Self, DiscountError> {
        if amount.to_minor_units() <= 0 {
            return Err(DiscountError::InvalidAmount);
        }

        Ok(Self::FixedAmount(amount))
    }

    /// Stable storage name of the discount kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage(_) => "percentage",
            Self::FixedAmount(_) => "fixed",
        }
    }
}

/// The arithmetic terms of a discount code.
#[derive(Debug, Copy, Clone)]
pub struct DiscountTerms<'a> {
    kind: DiscountKind<'a>,
    min_order_amount: Option<Money<'a, Currency>>,
    max_discount_amount: Option<Money<'a, Currency>>,
}

impl<'a> DiscountTerms<'a> {
    /// Create terms with no minimum order and no cap.
    pub fn new(kind: DiscountKind<'a>) -> Self {
        Self {
            kind,
            min_order_amount: None,
            max_discount_amount: None,
        }
    }

    /// Require the subtotal to reach `amount` before the code applies.
    #[must_use]
    pub fn with_min_order_amount(mut self, amount: Option<Money<'a, Currency>>) -> Self {
        self.min_order_amount = amount;
        self
    }

    /// Cap the discount at `amount`.
    #[must_use]
    pub fn with_max_discount_amount(mut self, amount: Option<Money<'a, Currency>>) -> Self {
        self.max_discount_amount = amount;
        self
    }

    /// Return the discount kind
    pub fn kind(&self) -> &DiscountKind<'a> {
        &self.kind
    }

    /// Return the minimum order amount, if any
    pub fn min_order_amount(&self) -> Option<&Money<'a, Currency>> {
        self.min_order_amount.as_ref()
    }

    /// Return the maximum discount amount, if any
    pub fn max_discount_amount(&self) -> Option<&Money<'a, Currency>> {
        self.max_discount_amount.as_ref()
    }

    /// Calculate the amount these terms take off `subtotal`.
    ///
    /// The result is clamped to the maximum discount (when set) and to the subtotal itself, so it
    /// is always between zero and `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the percentage calculation cannot be represented in minor units
    ///   (`DiscountError::PercentConversion`).
    /// - a fixed amount or cap uses a different currency from the subtotal
    ///   (`DiscountError::Money`).
    pub fn amount_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let currency = subtotal.currency();
        let subtotal_minor = subtotal.to_minor_units();

        let mut discount_minor = match &self.kind {
            DiscountKind::Percentage(percent) => percent_of_minor(percent, subtotal_minor)?,
            DiscountKind::FixedAmount(amount) => in_currency(amount, currency)?,
        };

        if let Some(max) = &self.max_discount_amount {
            discount_minor = discount_minor.min(in_currency(max, currency)?);
        }

        Ok(Money::from_minor(
            discount_minor.min(subtotal_minor).max(0),
            currency,
        ))
    }
}

/// Normalise a user-entered discount code for storage and lookup.
#[must_use]
pub fn normalise_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Build a percentage from basis points (1 bp = 0.01%).
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the value cannot be represented.
pub fn percentage_from_basis_points(basis_points: u32) -> Result<Percentage, DiscountError> {
    let fraction = Decimal::new(i64::from(basis_points), 4).normalize();

    Percentage::try_from(fraction.to_string().as_str())
        .map_err(|_conversion| DiscountError::PercentConversion)
}

/// Convert a percentage back to basis points, rounding half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the value cannot be represented.
pub fn basis_points_from_percentage(percent: &Percentage) -> Result<u32, DiscountError> {
    (*percent * Decimal::ONE_THOUSAND * Decimal::TEN)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Minor units of `amount`, failing when it is not in `currency`.
fn in_currency<'a>(
    amount: &Money<'a, Currency>,
    currency: &'a Currency,
) -> Result<i64, DiscountError> {
    Ok(Money::from_minor(0, currency).add(*amount)?.to_minor_units())
}
