//! Test context for service-level integration tests.

use rust_decimal::Decimal;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        books::PgBooksService, carts::PgCartsService, discount_codes::PgDiscountCodesService,
        genres::PgGenresService, orders::PgOrdersService, reports::PgReportsService,
        reviews::PgReviewsService, users::PgUsersService,
    },
    pricing::StorePricing,
};

use super::db::TestDb;

/// Flat 5.00 shipping, free from 50.00, 10% tax.
pub(crate) fn test_pricing() -> StorePricing {
    StorePricing::new("USD", 500, Some(5_000), Decimal::new(10, 2))
        .expect("test pricing should be valid")
}

pub struct TestContext {
    pub db: TestDb,
    pub pricing: StorePricing,
    pub users: PgUsersService,
    pub auth: PgAuthService,
    pub genres: PgGenresService,
    pub books: PgBooksService,
    pub reviews: PgReviewsService,
    pub carts: PgCartsService,
    pub discount_codes: PgDiscountCodesService,
    pub orders: PgOrdersService,
    pub reports: PgReportsService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let pricing = test_pricing();

        Self {
            pricing,
            users: PgUsersService::new(db.clone()),
            auth: PgAuthService::new(test_db.pool().clone()),
            genres: PgGenresService::new(db.clone()),
            books: PgBooksService::new(db.clone()),
            reviews: PgReviewsService::new(db.clone()),
            carts: PgCartsService::new(db.clone(), pricing),
            discount_codes: PgDiscountCodesService::new(db.clone(), pricing),
            orders: PgOrdersService::new(db.clone(), pricing),
            reports: PgReportsService::new(db),
            db: test_db,
        }
    }
}
