//! Store pricing
//!
//! Bridges stored minor-unit amounts and the pricing rules in [`bookshelf`].

use std::num::TryFromIntError;

use bookshelf::{
    checkout::{CheckoutError, CheckoutPolicy, CheckoutTotals},
    discounts::DiscountError,
    lines::Line,
    pricing::{SubtotalError, subtotal},
};
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised while building store pricing from configuration.
#[derive(Debug, Error)]
pub enum PricingSettingsError {
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("amount is out of range")]
    Amount(#[from] TryFromIntError),

    #[error(transparent)]
    Policy(#[from] CheckoutError),
}

/// Errors raised while pricing stored data.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("amount is out of range")]
    Amount(#[from] TryFromIntError),

    #[error(transparent)]
    Subtotal(#[from] SubtotalError),

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Currency, shipping and tax settings for the store.
#[derive(Debug, Clone, Copy)]
pub struct StorePricing {
    currency: &'static Currency,
    policy: CheckoutPolicy<'static>,
}

impl StorePricing {
    /// Build store pricing from configured values.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown currency, out of range amounts or a negative tax rate.
    pub fn new(
        currency_code: &str,
        shipping_fee: u64,
        free_shipping_threshold: Option<u64>,
        tax_rate: Decimal,
    ) -> Result<Self, PricingSettingsError> {
        let currency = iso::find(&currency_code.to_uppercase())
            .ok_or_else(|| PricingSettingsError::UnknownCurrency(currency_code.to_string()))?;

        let shipping_fee = Money::from_minor(i64::try_from(shipping_fee)?, currency);

        let free_shipping_threshold = free_shipping_threshold
            .map(|threshold| i64::try_from(threshold).map(|minor| Money::from_minor(minor, currency)))
            .transpose()?;

        let policy = CheckoutPolicy::new(shipping_fee, free_shipping_threshold, tax_rate)?;

        Ok(Self { currency, policy })
    }

    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    #[must_use]
    pub fn policy(&self) -> &CheckoutPolicy<'static> {
        &self.policy
    }

    /// Wrap a stored amount in the store currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount does not fit in signed minor units.
    pub fn money(&self, minor: u64) -> Result<Money<'static, Currency>, TryFromIntError> {
        Ok(Money::from_minor(i64::try_from(minor)?, self.currency))
    }

    /// Build a priced line in the store currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit price does not fit in signed minor units.
    pub fn line(&self, unit_price: u64, quantity: u32) -> Result<Line<'static>, TryFromIntError> {
        Ok(Line::new(self.money(unit_price)?, quantity))
    }

    /// Sum of `lines`, zero when there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtotal overflows.
    pub fn subtotal(&self, lines: &[Line<'static>]) -> Result<u64, PricingError> {
        if lines.is_empty() {
            return Ok(0);
        }

        Ok(minor_units(&subtotal(lines)?)?)
    }
}

impl Default for StorePricing {
    fn default() -> Self {
        Self {
            currency: iso::USD,
            policy: CheckoutPolicy::free(iso::USD),
        }
    }
}

/// Checkout figures in minor units of the store currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: u64,
    pub discount: u64,
    pub shipping: u64,
    pub tax: u64,
    pub total: u64,
}

impl TryFrom<&CheckoutTotals<'_>> for Totals {
    type Error = TryFromIntError;

    fn try_from(totals: &CheckoutTotals<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            subtotal: minor_units(&totals.subtotal)?,
            discount: minor_units(&totals.discount)?,
            shipping: minor_units(&totals.shipping)?,
            tax: minor_units(&totals.tax)?,
            total: minor_units(&totals.total)?,
        })
    }
}

/// Minor units of a non-negative amount.
///
/// # Errors
///
/// Returns an error if the amount is negative.
pub fn minor_units(money: &Money<'_, Currency>) -> Result<u64, TryFromIntError> {
    u64::try_from(money.to_minor_units())
}
