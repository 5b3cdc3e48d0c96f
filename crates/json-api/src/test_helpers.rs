//! Test helpers.

use std::sync::Arc;

use bookshelf_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        books::MockBooksService,
        carts::MockCartsService,
        discount_codes::MockDiscountCodesService,
        genres::MockGenresService,
        orders::MockOrdersService,
        reports::MockReportsService,
        reviews::MockReviewsService,
        users::{
            MockUsersService,
            records::{Role, UserUuid},
        },
    },
    pricing::StorePricing,
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const CUSTOMER: Principal =
    Principal::new(UserUuid::from_uuid(Uuid::from_u128(1)), Role::Customer);

pub(crate) const AUTHOR: Principal =
    Principal::new(UserUuid::from_uuid(Uuid::from_u128(2)), Role::Author);

pub(crate) const ADMIN: Principal =
    Principal::new(UserUuid::from_uuid(Uuid::from_u128(3)), Role::Admin);

/// Hoop that authenticates every request as a fixed principal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectPrincipal(pub(crate) Principal);

#[salvo::handler]
impl InjectPrincipal {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_principal(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

/// App state built from mocks.
///
/// Every service starts as a mock with no expectations, so any call that a test did not set up
/// fails it.
pub(crate) struct TestApp {
    context: AppContext,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self {
            context: AppContext {
                pricing: StorePricing::default(),
                auth: Arc::new(MockAuthService::new()),
                users: Arc::new(MockUsersService::new()),
                genres: Arc::new(MockGenresService::new()),
                books: Arc::new(MockBooksService::new()),
                reviews: Arc::new(MockReviewsService::new()),
                carts: Arc::new(MockCartsService::new()),
                discount_codes: Arc::new(MockDiscountCodesService::new()),
                orders: Arc::new(MockOrdersService::new()),
                reports: Arc::new(MockReportsService::new()),
            },
        }
    }

    pub(crate) fn with_auth(mut self, auth: MockAuthService) -> Self {
        self.context.auth = Arc::new(auth);
        self
    }

    pub(crate) fn with_users(mut self, users: MockUsersService) -> Self {
        self.context.users = Arc::new(users);
        self
    }

    pub(crate) fn with_genres(mut self, genres: MockGenresService) -> Self {
        self.context.genres = Arc::new(genres);
        self
    }

    pub(crate) fn with_books(mut self, books: MockBooksService) -> Self {
        self.context.books = Arc::new(books);
        self
    }

    pub(crate) fn with_reviews(mut self, reviews: MockReviewsService) -> Self {
        self.context.reviews = Arc::new(reviews);
        self
    }

    pub(crate) fn with_carts(mut self, carts: MockCartsService) -> Self {
        self.context.carts = Arc::new(carts);
        self
    }

    pub(crate) fn with_discount_codes(mut self, discount_codes: MockDiscountCodesService) -> Self {
        self.context.discount_codes = Arc::new(discount_codes);
        self
    }

    pub(crate) fn with_orders(mut self, orders: MockOrdersService) -> Self {
        self.context.orders = Arc::new(orders);
        self
    }

    pub(crate) fn with_reports(mut self, reports: MockReportsService) -> Self {
        self.context.reports = Arc::new(reports);
        self
    }

    pub(crate) fn state(self) -> Arc<State> {
        State::from_app_context(self.context)
    }

    /// Serve `route` as `principal`; `None` serves it anonymously.
    pub(crate) fn service(self, principal: Option<Principal>, route: Router) -> Service {
        let mut router = Router::new().hoop(inject(self.state()));

        if let Some(principal) = principal {
            router = router.hoop(InjectPrincipal(principal));
        }

        Service::new(router.push(route))
    }
}

/// A storage failure for services to report.
pub(crate) fn storage_error() -> sqlx::Error {
    sqlx::Error::PoolClosed
}
