//! Orders service.

use async_trait::async_trait;
use bookshelf::{
    checkout::CheckoutTotals,
    discounts::normalise_code,
    orders::{OrderStatus, PaymentStatus},
    pricing::SubtotalError,
};
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        books::data::normalise_optional,
        carts::{PgCartsRepository, records::CartUuid},
        discount_codes::{PgDiscountCodesRepository, service::evaluate},
        orders::{
            data::{CheckoutLine, NewOrder},
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid, order_number},
            repository::{OrderInsert, PgOrdersRepository},
        },
        users::records::UserUuid,
    },
    pagination::{Page, PageRequest},
    pricing::{PricingError, StorePricing, Totals, minor_units},
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    pricing: StorePricing,
    repository: PgOrdersRepository,
    carts_repository: PgCartsRepository,
    discount_codes_repository: PgDiscountCodesRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, pricing: StorePricing) -> Self {
        Self {
            db,
            pricing,
            repository: PgOrdersRepository::new(),
            carts_repository: PgCartsRepository::new(),
            discount_codes_repository: PgDiscountCodesRepository::new(),
        }
    }

    fn order_items(
        &self,
        order: OrderUuid,
        lines: &[CheckoutLine],
    ) -> Result<Vec<OrderItemRecord>, PricingError> {
        lines
            .iter()
            .map(|line| -> Result<OrderItemRecord, PricingError> {
                let total = self
                    .pricing
                    .line(line.unit_price, line.quantity)?
                    .total()
                    .map_err(SubtotalError::from)?;

                Ok(OrderItemRecord {
                    uuid: OrderItemUuid::new(),
                    order_uuid: order,
                    book_uuid: line.book_uuid,
                    title: line.title.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_total: minor_units(&total)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self, order),
        fields(user_uuid = %user, order_uuid = %order.uuid),
        err
    )]
    async fn checkout(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let shipping_address = order.shipping_address.trim();

        if shipping_address.is_empty() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let code = normalise_optional(order.discount_code).map(|code| normalise_code(&code));

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .ensure_cart(&mut tx, user, CartUuid::new())
            .await?;

        let lines = self.repository.lock_cart_lines(&mut tx, cart.uuid).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        if let Some(line) = lines.iter().find(|line| line.quantity > line.available) {
            return Err(OrdersServiceError::InsufficientStock {
                book: line.book_uuid,
                available: line.available,
            });
        }

        let priced = lines
            .iter()
            .map(|line| self.pricing.line(line.unit_price, line.quantity))
            .collect::<Result<Vec<_>, _>>()
            .map_err(PricingError::from)?;

        let (discount_code, totals) = match code {
            Some(code) => {
                let record = self
                    .discount_codes_repository
                    .lock_discount_code(&mut tx, &code)
                    .await?
                    .ok_or(OrdersServiceError::UnknownDiscountCode)?;

                let user_used_count = self
                    .discount_codes_repository
                    .count_user_redemptions(&mut tx, record.uuid, user)
                    .await?;

                let totals = evaluate::<OrdersServiceError>(
                    &record,
                    user_used_count,
                    &priced,
                    &self.pricing,
                    Timestamp::now(),
                )?;

                (Some(record), totals)
            }
            None => {
                let totals = CheckoutTotals::compute(&priced, None, self.pricing.policy())
                    .map_err(PricingError::from)?;

                (None, Totals::try_from(&totals).map_err(PricingError::from)?)
            }
        };

        let number = order_number(order.uuid, Timestamp::now());

        self.repository
            .create_order(
                &mut tx,
                &OrderInsert {
                    uuid: order.uuid,
                    number: &number,
                    user_uuid: user,
                    currency: self.pricing.currency().iso_alpha_code,
                    totals: &totals,
                    discount_code_uuid: discount_code.as_ref().map(|code| code.uuid),
                    discount_code: discount_code.as_ref().map(|code| code.code.as_str()),
                    shipping_address,
                },
            )
            .await?;

        for item in self.order_items(order.uuid, &lines)? {
            self.repository.create_order_item(&mut tx, &item).await?;
            self.repository
                .adjust_stock(&mut tx, item.book_uuid, -i64::from(item.quantity))
                .await?;
        }

        if let Some(code) = &discount_code {
            self.discount_codes_repository
                .record_redemption(&mut tx, code.uuid, user, order.uuid, totals.discount)
                .await?;
        }

        self.carts_repository.clear_cart(&mut tx, cart.uuid).await?;

        let placed = self.repository.get_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        info!(
            number = %placed.number,
            total = placed.totals.total,
            discount_code = ?placed.discount_code,
            "placed order"
        );

        Ok(placed)
    }

    async fn list_orders(
        &self,
        actor: Principal,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let user = (!actor.is_admin()).then_some(actor.user_uuid);

        let mut tx = self.db.begin().await?;

        let (mut orders, total) = self.repository.list_orders(&mut tx, user, page).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();
        let items = self.repository.list_order_items(&mut tx, &uuids).await?;

        tx.commit().await?;

        let mut grouped: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in items {
            grouped.entry(item.order_uuid).or_default().push(item);
        }

        for order in &mut orders {
            order.items = grouped.remove(&order.uuid).unwrap_or_default();
        }

        Ok(Page::new(orders, total, page))
    }

    async fn get_order(
        &self,
        actor: Principal,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        if !actor.can_act_for(order.user_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, actor),
        fields(user_uuid = %actor.user_uuid, order_uuid = %order, to = %status),
        err
    )]
    async fn update_status(
        &self,
        actor: Principal,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if !actor.is_admin() {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;
        let next = current.status.transition_to(status)?;
        let payment_status: PaymentStatus = next.payment_status(Some(current.status));

        self.repository
            .update_order_status(&mut tx, order, next, payment_status)
            .await?;

        if next == OrderStatus::Cancelled {
            for item in &current.items {
                self.repository
                    .adjust_stock(&mut tx, item.book_uuid, i64::from(item.quantity))
                    .await?;
            }
        }

        let updated = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        info!(
            from = %current.status,
            to = %updated.status,
            payment_status = %updated.payment_status,
            "updated order status"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into an order.
    ///
    /// Stock is taken, the discount code (if any) is redeemed and the cart is emptied, all in one
    /// transaction.
    async fn checkout(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// List orders, newest first. Admins see every order, everyone else their own.
    async fn list_orders(
        &self,
        actor: Principal,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order belonging to the caller, or any order for admins.
    async fn get_order(
        &self,
        actor: Principal,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Move an order through its lifecycle. Cancelling returns its items to stock.
    async fn update_status(
        &self,
        actor: Principal,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
