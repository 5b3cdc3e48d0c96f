//! Books Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::try_column,
    domain::{
        books::{
            data::{BookFilter, BookUpdate, NewBook},
            records::{BookRecord, BookUuid},
        },
        genres::records::GenreUuid,
        users::records::UserUuid,
    },
};

const GET_BOOK_SQL: &str = include_str!("sql/get_book.sql");
const LIST_BOOKS_SQL: &str = include_str!("sql/list_books.sql");
const COUNT_BOOKS_SQL: &str = include_str!("sql/count_books.sql");
const LOCK_BOOK_OWNER_SQL: &str = include_str!("sql/lock_book_owner.sql");
const CREATE_BOOK_SQL: &str = include_str!("sql/create_book.sql");
const UPDATE_BOOK_SQL: &str = include_str!("sql/update_book.sql");
const DELETE_BOOK_SQL: &str = include_str!("sql/delete_book.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBooksRepository;

impl PgBooksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<BookRecord, sqlx::Error> {
        query_as::<Postgres, BookRecord>(GET_BOOK_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_books(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &BookFilter,
    ) -> Result<(Vec<BookRecord>, u64), sqlx::Error> {
        let genre = filter.genre.map(GenreUuid::into_uuid);
        let author = filter.author.map(UserUuid::into_uuid);
        let search = filter.search.as_deref().map(contains_pattern);

        let books = query_as::<Postgres, BookRecord>(LIST_BOOKS_SQL)
            .bind(genre)
            .bind(author)
            .bind(search.as_deref())
            .bind(filter.page.limit())
            .bind(filter.page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_BOOKS_SQL)
            .bind(genre)
            .bind(author)
            .bind(search.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        Ok((books, try_column("total", total)?))
    }

    /// Lock a live book and return its author.
    pub(crate) async fn lock_book_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<UserUuid, sqlx::Error> {
        let author: Uuid = query_scalar(LOCK_BOOK_OWNER_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(UserUuid::from_uuid(author))
    }

    pub(crate) async fn create_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        author: UserUuid,
        book: &NewBook,
    ) -> Result<BookRecord, sqlx::Error> {
        query(CREATE_BOOK_SQL)
            .bind(book.uuid.into_uuid())
            .bind(&book.title)
            .bind(author.into_uuid())
            .bind(book.genre_uuid.into_uuid())
            .bind(book.isbn.as_deref())
            .bind(book.description.as_deref())
            .bind(try_column::<i64, _>("price", book.price)?)
            .bind(try_column::<i32, _>("stock", book.stock)?)
            .execute(&mut **tx)
            .await?;

        self.get_book(tx, book.uuid).await
    }

    pub(crate) async fn update_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        update: &BookUpdate,
    ) -> Result<BookRecord, sqlx::Error> {
        query(UPDATE_BOOK_SQL)
            .bind(book.into_uuid())
            .bind(&update.title)
            .bind(update.genre_uuid.into_uuid())
            .bind(update.isbn.as_deref())
            .bind(update.description.as_deref())
            .bind(try_column::<i64, _>("price", update.price)?)
            .bind(try_column::<i32, _>("stock", update.stock)?)
            .execute(&mut **tx)
            .await?;

        self.get_book(tx, book).await
    }

    pub(crate) async fn delete_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_BOOK_SQL)
            .bind(book.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// An `ILIKE` pattern matching `text` anywhere, with its own wildcards taken literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);

    pattern.push('%');

    for character in text.chars() {
        if matches!(character, '%' | '_' | '\\') {
            pattern.push('\\');
        }

        pattern.push(character);
    }

    pattern.push('%');

    pattern
}

impl<'r> FromRow<'r, PgRow> for BookRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BookUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            author_uuid: UserUuid::from_uuid(row.try_get("author_uuid")?),
            author_name: row.try_get("author_name")?,
            genre_uuid: GenreUuid::from_uuid(row.try_get("genre_uuid")?),
            genre_name: row.try_get("genre_name")?,
            isbn: row.try_get("isbn")?,
            description: row.try_get("description")?,
            price: try_column("price", row.try_get::<i64, _>("price")?)?,
            stock: try_column("stock", row.try_get::<i32, _>("stock")?)?,
            average_rating: row.try_get("average_rating")?,
            review_count: try_column("review_count", row.try_get::<i64, _>("review_count")?)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
