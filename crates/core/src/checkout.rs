//! Checkout totals
//!
//! The order total pipeline: subtotal, discount, shipping, tax, total. Cart previews, discount
//! previews and checkout all compute their figures here.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{DiscountError, DiscountTerms},
    lines::Line,
    pricing::{SubtotalError, subtotal},
};

/// Errors that can occur while computing checkout totals.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// The subtotal could not be calculated.
    #[error(transparent)]
    Subtotal(#[from] SubtotalError),

    /// The discount could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Tax rates must not be negative.
    #[error("tax rate must not be negative")]
    InvalidTaxRate,

    /// Tax could not be represented in minor units.
    #[error("tax calculation overflowed")]
    TaxOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Store-wide shipping and tax settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CheckoutPolicy<'a> {
    shipping_fee: Money<'a, Currency>,
    free_shipping_threshold: Option<Money<'a, Currency>>,
    tax_rate: Decimal,
}

impl<'a> CheckoutPolicy<'a> {
    /// Create a checkout policy.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTaxRate`] if `tax_rate` is negative.
    pub fn new(
        shipping_fee: Money<'a, Currency>,
        free_shipping_threshold: Option<Money<'a, Currency>>,
        tax_rate: Decimal,
    ) -> Result<Self, CheckoutError> {
        if tax_rate.is_sign_negative() {
            return Err(CheckoutError::InvalidTaxRate);
        }

        Ok(Self {
            shipping_fee,
            free_shipping_threshold,
            tax_rate,
        })
    }

    /// A policy with no shipping and no tax.
    pub fn free(currency: &'a Currency) -> Self {
        Self {
            shipping_fee: Money::from_minor(0, currency),
            free_shipping_threshold: None,
            tax_rate: Decimal::ZERO,
        }
    }

    /// The currency the store prices in
    pub fn currency(&self) -> &'a Currency {
        self.shipping_fee.currency()
    }

    /// Flat shipping fee
    pub fn shipping_fee(&self) -> &Money<'a, Currency> {
        &self.shipping_fee
    }

    /// Discounted subtotal at which shipping becomes free
    pub fn free_shipping_threshold(&self) -> Option<&Money<'a, Currency>> {
        self.free_shipping_threshold.as_ref()
    }

    /// Tax rate as a fraction
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    fn shipping_for(&self, discounted: &Money<'a, Currency>) -> Money<'a, Currency> {
        let waived = self
            .free_shipping_threshold
            .is_some_and(|threshold| discounted.to_minor_units() >= threshold.to_minor_units());

        if waived {
            Money::from_minor(0, discounted.currency())
        } else {
            self.shipping_fee
        }
    }

    fn tax_for(&self, discounted: &Money<'a, Currency>) -> Result<Money<'a, Currency>, CheckoutError> {
        let minor = Decimal::from_i64(discounted.to_minor_units()).ok_or(CheckoutError::TaxOverflow)?;

        let tax = self
            .tax_rate
            .checked_mul(minor)
            .ok_or(CheckoutError::TaxOverflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(CheckoutError::TaxOverflow)?;

        Ok(Money::from_minor(tax, discounted.currency()))
    }
}

/// Every figure shown to a customer at checkout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CheckoutTotals<'a> {
    /// Sum of line totals
    pub subtotal: Money<'a, Currency>,

    /// Amount taken off by the discount code
    pub discount: Money<'a, Currency>,

    /// Shipping charged
    pub shipping: Money<'a, Currency>,

    /// Tax charged on the discounted subtotal
    pub tax: Money<'a, Currency>,

    /// Amount payable
    pub total: Money<'a, Currency>,
}

impl<'a> CheckoutTotals<'a> {
    /// Compute totals for `lines`, optionally applying a discount.
    ///
    /// Eligibility is not checked here; callers run
    /// [`check_eligibility`](crate::discounts::eligibility::check_eligibility) first.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Subtotal`]: no lines, overflow or mixed currencies.
    /// - [`CheckoutError::Discount`]: the discount could not be calculated.
    /// - [`CheckoutError::TaxOverflow`]: tax could not be represented.
    /// - [`CheckoutError::Money`]: the policy is in a different currency.
    pub fn compute(
        lines: &[Line<'a>],
        discount: Option<&DiscountTerms<'a>>,
        policy: &CheckoutPolicy<'a>,
    ) -> Result<Self, CheckoutError> {
        let subtotal = subtotal(lines)?;

        let discount = match discount {
            Some(terms) => terms.amount_for(&subtotal)?,
            None => Money::from_minor(0, subtotal.currency()),
        };

        let discounted = subtotal.sub(discount)?;
        let shipping = policy.shipping_for(&discounted);
        let tax = policy.tax_for(&discounted)?;
        let total = discounted.add(shipping)?.add(tax)?;

        Ok(Self {
            subtotal,
            discount,
            shipping,
            tax,
            total,
        })
    }
}
