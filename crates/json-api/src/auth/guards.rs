//! Role guards.
//!
//! Mounted after [`super::middleware::handler`]; a caller without the required role gets 403.

use salvo::prelude::*;

use crate::extensions::*;

/// Only admins may continue.
#[salvo::handler]
pub(crate) async fn admin_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.principal_or_401() {
        Ok(principal) if principal.is_admin() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_principal) => res.render(StatusError::forbidden().brief("Admin role required")),
        Err(error) => res.render(error),
    }
}

/// Only authors and admins may continue.
#[salvo::handler]
pub(crate) async fn publishers_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.principal_or_401() {
        Ok(principal) if principal.role.can_publish() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_principal) => res.render(StatusError::forbidden().brief("Author role required")),
        Err(error) => res.render(error),
    }
}
