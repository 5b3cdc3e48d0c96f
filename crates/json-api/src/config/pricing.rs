//! Pricing Config

use bookshelf_app::pricing::{PricingSettingsError, StorePricing};
use clap::Args;
use rust_decimal::Decimal;

/// Checkout pricing settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// ISO 4217 currency code for prices and orders
    #[arg(long, env = "CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Flat shipping fee in minor units
    #[arg(long, env = "SHIPPING_FEE", default_value_t = 0)]
    pub shipping_fee: u64,

    /// Discounted subtotal (minor units) from which shipping is free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD")]
    pub free_shipping_threshold: Option<u64>,

    /// Tax rate applied to the discounted subtotal, e.g. `0.1` for 10%
    #[arg(long, env = "TAX_RATE", default_value = "0")]
    pub tax_rate: Decimal,
}

impl PricingConfig {
    /// Build the store pricing these settings describe.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown currency, out of range amounts or a negative tax rate.
    pub fn store_pricing(&self) -> Result<StorePricing, PricingSettingsError> {
        StorePricing::new(
            &self.currency,
            self.shipping_fee,
            self.free_shipping_threshold,
            self.tax_rate,
        )
    }
}
