//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, AuthServiceError, BearerToken, IssuedApiToken, Principal,
        models::NewApiToken, repository::PgAuthRepository,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let presented: BearerToken =
            bearer_token.parse().map_err(|_error| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token(presented.token_uuid, presented.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !presented.matches(token.user_uuid, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self.repository.touch_api_token(presented.token_uuid).await {
            warn!(error = %error, token_uuid = %presented.token_uuid, "failed to record token use");
        }

        Ok(Principal::new(token.user_uuid, token.role))
    }

    #[tracing::instrument(
        name = "auth.service.issue_api_token",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token = BearerToken::generate(Uuid::now_v7());

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token.token_uuid,
                user_uuid: user,
                version: token.version,
                token_hash: token.verifier(user),
                expires_at,
            })
            .await?;

        info!(token_uuid = %metadata.uuid, "issued api token");

        Ok(IssuedApiToken {
            token: token.to_string(),
            metadata,
        })
    }

    async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens(user).await?)
    }

    #[tracing::instrument(name = "auth.service.revoke_api_token", skip(self), err)]
    async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let revoked = self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some();

        if revoked {
            info!(%token_uuid, "revoked api token");
        }

        Ok(revoked)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;

    /// Issue a new API token for the given user. The raw token is only returned here.
    async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError>;

    /// List all tokens for the given user, newest first.
    async fn list_api_tokens(&self, user: UserUuid)
    -> Result<Vec<ApiTokenMetadata>, AuthServiceError>;

    /// Revoke a token by UUID. Returns `true` if the token was active.
    async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError>;
}
