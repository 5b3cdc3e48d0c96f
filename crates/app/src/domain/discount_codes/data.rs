//! Discount Code Data

use jiff::Timestamp;

use crate::domain::discount_codes::records::{DiscountCodeUuid, DiscountValue};

/// New Discount Code Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiscountCode {
    pub uuid: DiscountCodeUuid,
    /// Stored uppercase; lookups ignore case
    pub code: String,
    pub description: Option<String>,
    pub value: DiscountValue,
    pub min_order_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
}

/// Discount Code Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountCodeUpdate {
    pub code: String,
    pub description: Option<String>,
    pub value: DiscountValue,
    pub min_order_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
}

impl From<NewDiscountCode> for DiscountCodeUpdate {
    fn from(code: NewDiscountCode) -> Self {
        Self {
            code: code.code,
            description: code.description,
            value: code.value,
            min_order_amount: code.min_order_amount,
            max_discount_amount: code.max_discount_amount,
            usage_limit: code.usage_limit,
            usage_limit_per_user: code.usage_limit_per_user,
            starts_at: code.starts_at,
            expires_at: code.expires_at,
            is_active: code.is_active,
        }
    }
}

impl DiscountCodeUpdate {
    /// Whether every number fits its column: amounts are `BIGINT`, limits `INTEGER`.
    #[must_use]
    pub fn fits_columns(&self) -> bool {
        let amounts = [
            Some(self.value.amount()),
            self.min_order_amount,
            self.max_discount_amount,
        ];
        let limits = [self.usage_limit, self.usage_limit_per_user];

        amounts
            .into_iter()
            .flatten()
            .all(|amount| i64::try_from(amount).is_ok())
            && limits
                .into_iter()
                .flatten()
                .all(|limit| i32::try_from(limit).is_ok())
    }
}
