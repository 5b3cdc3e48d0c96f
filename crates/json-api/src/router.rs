//! App Router

use salvo::Router;

use crate::{
    auth::{
        self,
        guards::{admin_only, publishers_only},
    },
    books, cart, discount_codes, genres, orders, reports, reviews, users,
};

/// All API routes.
///
/// Catalogue reads are public. Everything else needs a bearer token, and publishing or store
/// administration additionally needs the matching role.
pub fn app_router() -> Router {
    Router::new()
        .push(public_router())
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(customer_router())
                .push(publisher_router())
                .push(admin_router()),
        )
}

fn public_router() -> Router {
    Router::new()
        .push(Router::with_path("genres").get(genres::index::handler))
        .push(
            Router::with_path("books")
                .get(books::index::handler)
                .push(
                    Router::with_path("{book}")
                        .get(books::get::handler)
                        .push(Router::with_path("reviews").get(reviews::index::handler)),
                ),
        )
}

fn customer_router() -> Router {
    Router::new()
        .push(Router::with_path("me").get(users::me::handler))
        .push(Router::with_path("books/{book}/reviews").post(reviews::create::handler))
        .push(Router::with_path("reviews/{review}").delete(reviews::delete::handler))
        .push(
            Router::with_path("cart")
                .get(cart::get::handler)
                .delete(cart::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(cart::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(cart::items::update::handler)
                                .delete(cart::items::delete::handler),
                        ),
                )
                .push(Router::with_path("discount").post(discount_codes::preview::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}

fn publisher_router() -> Router {
    Router::new()
        .hoop(publishers_only)
        .push(
            Router::with_path("books")
                .post(books::create::handler)
                .push(
                    Router::with_path("{book}")
                        .put(books::update::handler)
                        .delete(books::delete::handler),
                ),
        )
        .push(Router::with_path("reports/author").get(reports::author::handler))
}

fn admin_router() -> Router {
    Router::new()
        .hoop(admin_only)
        .push(
            Router::with_path("genres")
                .post(genres::create::handler)
                .push(
                    Router::with_path("{genre}")
                        .put(genres::update::handler)
                        .delete(genres::delete::handler),
                ),
        )
        .push(Router::with_path("orders/{order}/status").put(orders::status::handler))
        .push(
            Router::with_path("discount-codes")
                .get(discount_codes::index::handler)
                .post(discount_codes::create::handler)
                .push(
                    Router::with_path("{code}")
                        .get(discount_codes::get::handler)
                        .put(discount_codes::update::handler)
                        .delete(discount_codes::delete::handler),
                ),
        )
        .push(Router::with_path("reports/admin").get(reports::admin::handler))
}

#[cfg(test)]
mod tests {
    use salvo::{affix_state::inject, http::header::AUTHORIZATION, prelude::*, test::TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use bookshelf_app::auth::{AuthServiceError, MockAuthService};

    use crate::test_helpers::{CUSTOMER, TestApp};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        let state = TestApp::new().with_auth(auth).state();

        Service::new(Router::new().hoop(inject(state)).push(app_router()))
    }

    #[tokio::test]
    async fn test_cart_requires_token() -> TestResult {
        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(MockAuthService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_create_genres() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "customer-token")
            .return_once(|_| Ok(CUSTOMER));

        let res = TestClient::post("http://example.com/genres")
            .add_header(AUTHORIZATION, "Bearer customer-token", true)
            .json(&json!({ "uuid": Uuid::now_v7(), "name": "Poetry" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_publish_books() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Ok(CUSTOMER));

        let res = TestClient::delete(format!("http://example.com/books/{}", Uuid::now_v7()))
            .add_header(AUTHORIZATION, "Bearer customer-token", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com/orders")
            .add_header(AUTHORIZATION, "Bearer stale-token", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
