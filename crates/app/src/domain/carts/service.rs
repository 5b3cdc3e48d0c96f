//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemUuid, CartRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        users::records::UserUuid,
    },
    pricing::{PricingError, StorePricing},
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    pricing: StorePricing,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, pricing: StorePricing) -> Self {
        Self {
            db,
            pricing,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    async fn finish(
        &self,
        mut tx: Transaction<'_, Postgres>,
        cart: CartRecord,
    ) -> Result<CartRecord, CartsServiceError> {
        self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

        let cart = priced_cart::<CartsServiceError>(&mut tx, cart, &self.pricing).await?;

        tx.commit().await?;

        Ok(cart)
    }
}

/// Load the user's cart with its items and subtotal, creating an empty cart if needed. The cart
/// row stays locked until `tx` ends.
pub(crate) async fn load_cart<E>(
    tx: &mut Transaction<'_, Postgres>,
    user: UserUuid,
    pricing: &StorePricing,
) -> Result<CartRecord, E>
where
    E: From<sqlx::Error> + From<PricingError>,
{
    let cart = PgCartsRepository::new()
        .ensure_cart(tx, user, CartUuid::new())
        .await?;

    priced_cart(tx, cart, pricing).await
}

async fn priced_cart<E>(
    tx: &mut Transaction<'_, Postgres>,
    mut cart: CartRecord,
    pricing: &StorePricing,
) -> Result<CartRecord, E>
where
    E: From<sqlx::Error> + From<PricingError>,
{
    cart.items = PgCartItemsRepository::new()
        .list_cart_items(tx, cart.uuid)
        .await?;

    let lines = cart.lines(pricing).map_err(PricingError::from)?;

    cart.subtotal = pricing.subtotal(&lines)?;

    Ok(cart)
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = load_cart::<CartsServiceError>(&mut tx, user, &self.pricing).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(user_uuid = %user, book_uuid = %item.book_uuid, quantity = item.quantity),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .ensure_cart(&mut tx, user, CartUuid::new())
            .await?;

        let available = self
            .items_repository
            .lock_book_stock(&mut tx, item.book_uuid)
            .await?
            .ok_or(CartsServiceError::InvalidReference)?;

        let in_cart = self
            .items_repository
            .item_quantity(&mut tx, cart.uuid, item.book_uuid)
            .await?;

        let wanted = in_cart.checked_add(item.quantity);

        if wanted.is_none_or(|wanted| wanted > available) {
            return Err(CartsServiceError::InsufficientStock { available });
        }

        self.items_repository
            .add_cart_item(&mut tx, cart.uuid, &item)
            .await?;

        info!(cart_uuid = %cart.uuid, "added cart item");

        self.finish(tx, cart).await
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        if quantity == 0 {
            return self.remove_item(user, item).await;
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .ensure_cart(&mut tx, user, CartUuid::new())
            .await?;

        let book = self
            .items_repository
            .lock_cart_item(&mut tx, cart.uuid, item)
            .await?;

        let available = self
            .items_repository
            .lock_book_stock(&mut tx, book)
            .await?
            .unwrap_or_default();

        if quantity > available {
            return Err(CartsServiceError::InsufficientStock { available });
        }

        self.items_repository
            .update_cart_item(&mut tx, cart.uuid, item, quantity)
            .await?;

        info!(cart_uuid = %cart.uuid, quantity, "updated cart item");

        self.finish(tx, cart).await
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .ensure_cart(&mut tx, user, CartUuid::new())
            .await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        info!(cart_uuid = %cart.uuid, "removed cart item");

        self.finish(tx, cart).await
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .ensure_cart(&mut tx, user, CartUuid::new())
            .await?;

        let removed = self.carts_repository.clear_cart(&mut tx, cart.uuid).await?;

        info!(cart_uuid = %cart.uuid, removed, "cleared cart");

        self.finish(tx, cart).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating an empty one on first use.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add a book to the cart. Adding a book already in the cart increases its quantity.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set the quantity of a cart item. A quantity of zero removes it.
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove an item from the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every item from the cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;
}
