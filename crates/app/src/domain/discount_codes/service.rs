//! Discount codes service.

use async_trait::async_trait;
use bookshelf::{
    checkout::CheckoutTotals,
    discounts::{eligibility::check_eligibility, normalise_code},
    lines::Line,
    pricing::subtotal,
};
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        books::data::normalise_optional,
        carts::service::load_cart,
        discount_codes::{
            data::{DiscountCodeUpdate, NewDiscountCode},
            errors::{DiscountCodesServiceError, IneligibleReason},
            records::{DiscountCodeRecord, DiscountCodeUuid, DiscountPreview},
            repository::PgDiscountCodesRepository,
        },
        users::records::UserUuid,
    },
    pagination::{Page, PageRequest},
    pricing::{PricingError, StorePricing, Totals},
};

#[derive(Debug, Clone)]
pub struct PgDiscountCodesService {
    db: Db,
    pricing: StorePricing,
    repository: PgDiscountCodesRepository,
}

impl PgDiscountCodesService {
    #[must_use]
    pub fn new(db: Db, pricing: StorePricing) -> Self {
        Self {
            db,
            pricing,
            repository: PgDiscountCodesRepository::new(),
        }
    }

    fn validate(
        &self,
        code: DiscountCodeUpdate,
    ) -> Result<DiscountCodeUpdate, DiscountCodesServiceError> {
        if !code.fits_columns() {
            return Err(DiscountCodesServiceError::InvalidData);
        }

        code.value
            .discount_kind(&self.pricing)
            .map_err(|_error| DiscountCodesServiceError::InvalidData)?;

        if let (Some(starts_at), Some(expires_at)) = (code.starts_at, code.expires_at)
            && starts_at >= expires_at
        {
            return Err(DiscountCodesServiceError::InvalidData);
        }

        Ok(DiscountCodeUpdate {
            code: normalise_code(&code.code),
            description: normalise_optional(code.description),
            ..code
        })
    }
}

/// Price `lines` with `code` applied, after checking the code may be used.
///
/// Cart previews and checkout both go through here so a previewed total is the total charged.
pub(crate) fn evaluate<E>(
    code: &DiscountCodeRecord,
    user_used_count: u64,
    lines: &[Line<'static>],
    pricing: &StorePricing,
    now: Timestamp,
) -> Result<Totals, E>
where
    E: From<IneligibleReason> + From<PricingError>,
{
    let terms = code.terms(pricing)?;
    let subtotal = subtotal(lines).map_err(PricingError::from)?;

    check_eligibility(
        &code.window(),
        &code.usage(user_used_count),
        &terms,
        &subtotal,
        now,
    )
    .map_err(IneligibleReason::from)?;

    let totals =
        CheckoutTotals::compute(lines, Some(&terms), pricing.policy()).map_err(PricingError::from)?;

    Ok(Totals::try_from(&totals).map_err(PricingError::from)?)
}

#[async_trait]
impl DiscountCodesService for PgDiscountCodesService {
    async fn list_discount_codes(
        &self,
        page: PageRequest,
    ) -> Result<Page<DiscountCodeRecord>, DiscountCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let (codes, total) = self.repository.list_discount_codes(&mut tx, page).await?;

        tx.commit().await?;

        Ok(Page::new(codes, total, page))
    }

    async fn get_discount_code(
        &self,
        code: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, DiscountCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let code = self.repository.get_discount_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(code)
    }

    #[tracing::instrument(
        name = "discount_codes.service.create_discount_code",
        skip(self, code),
        fields(discount_code_uuid = %code.uuid),
        err
    )]
    async fn create_discount_code(
        &self,
        code: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, DiscountCodesServiceError> {
        let uuid = code.uuid;
        let fields = self.validate(code.into())?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_discount_code(&mut tx, uuid, &fields)
            .await?;

        tx.commit().await?;

        info!(code = %created.code, kind = %created.value.kind(), "created discount code");

        Ok(created)
    }

    #[tracing::instrument(
        name = "discount_codes.service.update_discount_code",
        skip(self, update),
        fields(discount_code_uuid = %code),
        err
    )]
    async fn update_discount_code(
        &self,
        code: DiscountCodeUuid,
        update: DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, DiscountCodesServiceError> {
        let fields = self.validate(update)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_discount_code(&mut tx, code, &fields)
            .await?;

        tx.commit().await?;

        info!(code = %updated.code, "updated discount code");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "discount_codes.service.delete_discount_code",
        skip(self),
        fields(discount_code_uuid = %code),
        err
    )]
    async fn delete_discount_code(
        &self,
        code: DiscountCodeUuid,
    ) -> Result<(), DiscountCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_discount_code(&mut tx, code).await?;

        if rows_affected == 0 {
            return Err(DiscountCodesServiceError::NotFound);
        }

        tx.commit().await?;

        info!("deleted discount code");

        Ok(())
    }

    async fn preview(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<DiscountPreview, DiscountCodesServiceError> {
        let code = normalise_code(code);

        let mut tx = self.db.begin().await?;

        let cart = load_cart::<DiscountCodesServiceError>(&mut tx, user, &self.pricing).await?;

        if cart.is_empty() {
            return Err(DiscountCodesServiceError::EmptyCart);
        }

        let record = self
            .repository
            .find_discount_code(&mut tx, &code)
            .await?
            .ok_or(DiscountCodesServiceError::NotFound)?;

        let user_used_count = self
            .repository
            .count_user_redemptions(&mut tx, record.uuid, user)
            .await?;

        tx.commit().await?;

        let lines = cart.lines(&self.pricing).map_err(PricingError::from)?;

        let totals = evaluate::<DiscountCodesServiceError>(
            &record,
            user_used_count,
            &lines,
            &self.pricing,
            Timestamp::now(),
        )?;

        Ok(DiscountPreview {
            discount_code_uuid: record.uuid,
            code: record.code,
            cart_uuid: cart.uuid,
            totals,
        })
    }
}

#[automock]
#[async_trait]
pub trait DiscountCodesService: Send + Sync {
    /// List live discount codes, newest first.
    async fn list_discount_codes(
        &self,
        page: PageRequest,
    ) -> Result<Page<DiscountCodeRecord>, DiscountCodesServiceError>;

    /// Retrieve a single discount code.
    async fn get_discount_code(
        &self,
        code: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, DiscountCodesServiceError>;

    /// Create a discount code. The code text is trimmed and uppercased.
    async fn create_discount_code(
        &self,
        code: NewDiscountCode,
    ) -> Result<DiscountCodeRecord, DiscountCodesServiceError>;

    /// Replace the settings of a discount code. Its usage count is kept.
    async fn update_discount_code(
        &self,
        code: DiscountCodeUuid,
        update: DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, DiscountCodesServiceError>;

    /// Soft-delete a discount code.
    async fn delete_discount_code(
        &self,
        code: DiscountCodeUuid,
    ) -> Result<(), DiscountCodesServiceError>;

    /// Price the user's cart with `code` applied, without redeeming it.
    async fn preview(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<DiscountPreview, DiscountCodesServiceError>;
}
