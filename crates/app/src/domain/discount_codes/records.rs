//! Discount Code Records

use std::{fmt, str::FromStr};

use bookshelf::discounts::{
    DiscountKind, DiscountTerms,
    eligibility::{DiscountUsage, DiscountWindow},
    percentage_from_basis_points,
};
use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::carts::records::CartUuid,
    pricing::{PricingError, StorePricing, Totals},
    uuids::TypedUuid,
};

/// Discount Code UUID
pub type DiscountCodeUuid = TypedUuid<DiscountCodeRecord>;

/// What a discount code takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountValue {
    /// Hundredths of a percent: 1250 is 12.5%
    Percentage { basis_points: u32 },

    /// Minor units of the store currency
    Fixed { amount: u64 },
}

/// A discount kind that is neither `percentage` nor `fixed`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown discount kind: {0}")]
pub struct UnknownDiscountKind(pub String);

/// Storage name of a discount kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountValueKind {
    Percentage,
    Fixed,
}

impl DiscountValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountValueKind {
    type Err = UnknownDiscountKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownDiscountKind(other.to_string())),
        }
    }
}

impl DiscountValue {
    #[must_use]
    pub const fn kind(self) -> DiscountValueKind {
        match self {
            Self::Percentage { .. } => DiscountValueKind::Percentage,
            Self::Fixed { .. } => DiscountValueKind::Fixed,
        }
    }

    /// The stored number: basis points or minor units.
    #[must_use]
    pub fn amount(self) -> u64 {
        match self {
            Self::Percentage { basis_points } => u64::from(basis_points),
            Self::Fixed { amount } => amount,
        }
    }

    /// Rebuild a value from its stored kind and number.
    ///
    /// # Errors
    ///
    /// Returns an error if a percentage does not fit in basis points.
    pub fn from_parts(
        kind: DiscountValueKind,
        amount: u64,
    ) -> Result<Self, std::num::TryFromIntError> {
        Ok(match kind {
            DiscountValueKind::Percentage => Self::Percentage {
                basis_points: u32::try_from(amount)?,
            },
            DiscountValueKind::Fixed => Self::Fixed { amount },
        })
    }

    /// The pricing rule for this value in the store currency.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero or out of range value.
    pub fn discount_kind(
        self,
        pricing: &StorePricing,
    ) -> Result<DiscountKind<'static>, PricingError> {
        Ok(match self {
            Self::Percentage { basis_points } => {
                DiscountKind::percentage(percentage_from_basis_points(basis_points)?)?
            }
            Self::Fixed { amount } => DiscountKind::fixed_amount(pricing.money(amount)?)?,
        })
    }
}

/// Discount Code Record
#[derive(Debug, Clone)]
pub struct DiscountCodeRecord {
    pub uuid: DiscountCodeUuid,
    pub code: String,
    pub description: Option<String>,
    pub value: DiscountValue,
    pub min_order_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    pub used_count: u32,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl DiscountCodeRecord {
    /// Pricing terms of the code in the store currency.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored amount cannot be priced.
    pub fn terms(&self, pricing: &StorePricing) -> Result<DiscountTerms<'static>, PricingError> {
        let min_order_amount = self
            .min_order_amount
            .map(|amount| pricing.money(amount))
            .transpose()?;

        let max_discount_amount = self
            .max_discount_amount
            .map(|amount| pricing.money(amount))
            .transpose()?;

        Ok(DiscountTerms::new(self.value.discount_kind(pricing)?)
            .with_min_order_amount(min_order_amount)
            .with_max_discount_amount(max_discount_amount))
    }

    #[must_use]
    pub fn window(&self) -> DiscountWindow {
        DiscountWindow {
            is_active: self.is_active,
            starts_at: self.starts_at,
            expires_at: self.expires_at,
        }
    }

    /// Usage of the code, given how often the current user has redeemed it.
    #[must_use]
    pub fn usage(&self, user_used_count: u64) -> DiscountUsage {
        DiscountUsage {
            used_count: u64::from(self.used_count),
            usage_limit: self.usage_limit.map(u64::from),
            user_used_count,
            usage_limit_per_user: self.usage_limit_per_user.map(u64::from),
        }
    }
}

/// The effect of applying a discount code to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountPreview {
    pub discount_code_uuid: DiscountCodeUuid,
    pub code: String,
    pub cart_uuid: CartUuid,
    pub totals: Totals,
}
