//! Books service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        books::{
            data::{BookFilter, BookUpdate, NewBook, normalise_optional},
            errors::BooksServiceError,
            records::{BookRecord, BookUuid},
            repository::PgBooksRepository,
        },
        users::records::{Role, UserUuid},
    },
    pagination::Page,
};

#[derive(Debug, Clone)]
pub struct PgBooksService {
    db: Db,
    repository: PgBooksRepository,
}

impl PgBooksService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBooksRepository::new(),
        }
    }
}

/// Resolve who will own a new book.
fn resolve_author(
    actor: &Principal,
    requested: Option<UserUuid>,
) -> Result<UserUuid, BooksServiceError> {
    match (actor.role, requested) {
        (Role::Admin, requested) => Ok(requested.unwrap_or(actor.user_uuid)),
        (Role::Author, None) => Ok(actor.user_uuid),
        (Role::Author, Some(requested)) if requested == actor.user_uuid => Ok(requested),
        _ => Err(BooksServiceError::Forbidden),
    }
}

fn ensure_can_manage(actor: &Principal, owner: UserUuid) -> Result<(), BooksServiceError> {
    if actor.role.can_publish() && actor.can_act_for(owner) {
        Ok(())
    } else {
        Err(BooksServiceError::Forbidden)
    }
}

fn clean_title(title: &str) -> Result<String, BooksServiceError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(BooksServiceError::InvalidData);
    }

    Ok(title.to_string())
}

/// Price is stored as `BIGINT`, stock as `INTEGER`.
fn check_columns(price: u64, stock: u32) -> Result<(), BooksServiceError> {
    if i64::try_from(price).is_err() || i32::try_from(stock).is_err() {
        return Err(BooksServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl BooksService for PgBooksService {
    async fn list_books(&self, filter: BookFilter) -> Result<Page<BookRecord>, BooksServiceError> {
        let filter = BookFilter {
            search: normalise_optional(filter.search),
            ..filter
        };

        let mut tx = self.db.begin().await?;

        let (books, total) = self.repository.list_books(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(Page::new(books, total, filter.page))
    }

    async fn get_book(&self, book: BookUuid) -> Result<BookRecord, BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let book = self.repository.get_book(&mut tx, book).await?;

        tx.commit().await?;

        Ok(book)
    }

    #[tracing::instrument(
        name = "books.service.create_book",
        skip(self, actor, book),
        fields(actor_uuid = %actor.user_uuid, book_uuid = %book.uuid),
        err
    )]
    async fn create_book(
        &self,
        actor: Principal,
        book: NewBook,
    ) -> Result<BookRecord, BooksServiceError> {
        let author = resolve_author(&actor, book.author_uuid)?;

        check_columns(book.price, book.stock)?;

        let book = NewBook {
            title: clean_title(&book.title)?,
            isbn: normalise_optional(book.isbn),
            description: normalise_optional(book.description),
            ..book
        };

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_book(&mut tx, author, &book).await?;

        tx.commit().await?;

        info!(book_uuid = %created.uuid, author_uuid = %author, "created book");

        Ok(created)
    }

    #[tracing::instrument(
        name = "books.service.update_book",
        skip(self, actor, update),
        fields(actor_uuid = %actor.user_uuid, book_uuid = %book),
        err
    )]
    async fn update_book(
        &self,
        actor: Principal,
        book: BookUuid,
        update: BookUpdate,
    ) -> Result<BookRecord, BooksServiceError> {
        check_columns(update.price, update.stock)?;

        let update = BookUpdate {
            title: clean_title(&update.title)?,
            isbn: normalise_optional(update.isbn),
            description: normalise_optional(update.description),
            ..update
        };

        let mut tx = self.db.begin().await?;

        let owner = self.repository.lock_book_owner(&mut tx, book).await?;

        ensure_can_manage(&actor, owner)?;

        let updated = self.repository.update_book(&mut tx, book, &update).await?;

        tx.commit().await?;

        info!(book_uuid = %book, "updated book");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "books.service.delete_book",
        skip(self, actor),
        fields(actor_uuid = %actor.user_uuid, book_uuid = %book),
        err
    )]
    async fn delete_book(&self, actor: Principal, book: BookUuid) -> Result<(), BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.repository.lock_book_owner(&mut tx, book).await?;

        ensure_can_manage(&actor, owner)?;

        let rows_affected = self.repository.delete_book(&mut tx, book).await?;

        if rows_affected == 0 {
            return Err(BooksServiceError::NotFound);
        }

        tx.commit().await?;

        info!(book_uuid = %book, "deleted book");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait BooksService: Send + Sync {
    /// List live books matching the filter, newest first.
    async fn list_books(&self, filter: BookFilter) -> Result<Page<BookRecord>, BooksServiceError>;

    /// Retrieve a single live book.
    async fn get_book(&self, book: BookUuid) -> Result<BookRecord, BooksServiceError>;

    /// Publish a book. Authors publish for themselves; admins for anyone.
    async fn create_book(
        &self,
        actor: Principal,
        book: NewBook,
    ) -> Result<BookRecord, BooksServiceError>;

    /// Replace a book's details. Only its author or an admin may do this.
    async fn update_book(
        &self,
        actor: Principal,
        book: BookUuid,
        update: BookUpdate,
    ) -> Result<BookRecord, BooksServiceError>;

    /// Soft-delete a book. Only its author or an admin may do this.
    async fn delete_book(&self, actor: Principal, book: BookUuid) -> Result<(), BooksServiceError>;
}
