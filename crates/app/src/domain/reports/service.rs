//! Reports service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        reports::{
            errors::ReportsServiceError,
            records::{AdminSummary, AuthorSummary},
            repository::PgReportsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    async fn author_summary(
        &self,
        actor: Principal,
        author: UserUuid,
    ) -> Result<AuthorSummary, ReportsServiceError> {
        if !actor.role.can_publish() || !actor.can_act_for(author) {
            return Err(ReportsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let summary = self.repository.author_summary(&mut tx, author).await?;

        tx.commit().await?;

        Ok(summary)
    }

    async fn admin_summary(&self, actor: Principal) -> Result<AdminSummary, ReportsServiceError> {
        if !actor.is_admin() {
            return Err(ReportsServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let summary = self.repository.admin_summary(&mut tx).await?;

        tx.commit().await?;

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Sales of an author's books. Authors see their own, admins anyone's.
    async fn author_summary(
        &self,
        actor: Principal,
        author: UserUuid,
    ) -> Result<AuthorSummary, ReportsServiceError>;

    /// Store-wide counts and revenue.
    async fn admin_summary(&self, actor: Principal) -> Result<AdminSummary, ReportsServiceError>;
}
