//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        books::{BooksService, PgBooksService},
        carts::{CartsService, PgCartsService},
        discount_codes::{DiscountCodesService, PgDiscountCodesService},
        genres::{GenresService, PgGenresService},
        orders::{OrdersService, PgOrdersService},
        reports::{PgReportsService, ReportsService},
        reviews::{PgReviewsService, ReviewsService},
        users::{PgUsersService, UsersService},
    },
    pricing::StorePricing,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub pricing: StorePricing,
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub genres: Arc<dyn GenresService>,
    pub books: Arc<dyn BooksService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub carts: Arc<dyn CartsService>,
    pub discount_codes: Arc<dyn DiscountCodesService>,
    pub orders: Arc<dyn OrdersService>,
    pub reports: Arc<dyn ReportsService>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(
        url: &str,
        pricing: StorePricing,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            pricing,
            auth: Arc::new(PgAuthService::new(pool)),
            users: Arc::new(PgUsersService::new(db.clone())),
            genres: Arc::new(PgGenresService::new(db.clone())),
            books: Arc::new(PgBooksService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone(), pricing)),
            discount_codes: Arc::new(PgDiscountCodesService::new(db.clone(), pricing)),
            orders: Arc::new(PgOrdersService::new(db.clone(), pricing)),
            reports: Arc::new(PgReportsService::new(db)),
        })
    }
}
