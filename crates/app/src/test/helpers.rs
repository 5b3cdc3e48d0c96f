//! Test Helpers

use crate::{
    auth::Principal,
    domain::{
        books::{
            BooksService, BooksServiceError,
            data::NewBook,
            records::{BookRecord, BookUuid},
        },
        carts::{
            CartsService, CartsServiceError,
            data::NewCartItem,
            records::{CartItemUuid, CartRecord},
        },
        discount_codes::{
            data::NewDiscountCode,
            records::{DiscountCodeUuid, DiscountValue},
        },
        genres::{
            GenresService, GenresServiceError,
            data::NewGenre,
            records::{GenreRecord, GenreUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{Role, UserRecord, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) fn principal(user: &UserRecord) -> Principal {
    Principal::new(user.uuid, user.role)
}

pub(crate) async fn create_user(
    ctx: &TestContext,
    role: Role,
) -> Result<UserRecord, UsersServiceError> {
    let uuid = UserUuid::new();

    ctx.users
        .create_user(NewUser {
            uuid,
            name: format!("{role} {uuid}"),
            email: format!("{uuid}@example.com"),
            role,
        })
        .await
}

pub(crate) async fn create_genre(
    ctx: &TestContext,
    name: &str,
) -> Result<GenreRecord, GenresServiceError> {
    ctx.genres
        .create_genre(NewGenre {
            uuid: GenreUuid::new(),
            name: name.to_string(),
        })
        .await
}

/// Create a book owned by `author`, who must be able to publish.
pub(crate) async fn create_book(
    ctx: &TestContext,
    author: &UserRecord,
    genre: &GenreRecord,
    price: u64,
    stock: u32,
) -> Result<BookRecord, BooksServiceError> {
    let uuid = BookUuid::new();

    ctx.books
        .create_book(
            principal(author),
            NewBook {
                uuid,
                title: format!("Book {uuid}"),
                author_uuid: None,
                genre_uuid: genre.uuid,
                isbn: None,
                description: None,
                price,
                stock,
            },
        )
        .await
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    user: &UserRecord,
    book: &BookRecord,
    quantity: u32,
) -> Result<CartRecord, CartsServiceError> {
    ctx.carts
        .add_item(
            user.uuid,
            NewCartItem {
                uuid: CartItemUuid::new(),
                book_uuid: book.uuid,
                quantity,
            },
        )
        .await
}

/// An active, unlimited code with no window.
pub(crate) fn new_discount_code(code: &str, value: DiscountValue) -> NewDiscountCode {
    NewDiscountCode {
        uuid: DiscountCodeUuid::new(),
        code: code.to_string(),
        description: None,
        value,
        min_order_amount: None,
        max_discount_amount: None,
        usage_limit: None,
        usage_limit_per_user: None,
        starts_at: None,
        expires_at: None,
        is_active: true,
    }
}
