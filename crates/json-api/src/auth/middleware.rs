//! Bearer token authentication.
//!
//! Resolves `Authorization: Bearer <token>` to a [`Principal`] and stores it in the depot for
//! handlers and role guards.

use std::sync::Arc;

use bookshelf_app::auth::{AuthServiceError, Principal};
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match authenticate(req, depot).await {
        Ok(principal) => {
            depot.insert_principal(principal);

            ctrl.call_next(req, depot, res).await;
        }
        Err(status) => res.render(status),
    }
}

async fn authenticate(req: &Request, depot: &Depot) -> Result<Principal, StatusError> {
    let token = bearer_token(req)
        .ok_or_else(|| StatusError::unauthorized().brief("Missing bearer token"))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .auth
        .authenticate_bearer(token)
        .await
        .map_err(|auth_error| match auth_error {
            AuthServiceError::NotFound | AuthServiceError::UnknownUser => {
                StatusError::unauthorized().brief("Invalid API token")
            }
            AuthServiceError::Sql(source) => {
                error!("failed to look up api token: {source}");

                StatusError::internal_server_error()
            }
        })
}

fn bearer_token(req: &Request) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
