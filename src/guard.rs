use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::PermissionCatalog;
use crate::types::{Decision, DenialReason, Principal, RoleClaim};

/// Decides whether protected content may render for a principal and a path.
///
/// States are checked in a fixed order and the first match wins:
/// no principal, missing role claim, denied, granted. Nothing is cached; every
/// call re-evaluates against the catalog it was built with.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    catalog: Arc<PermissionCatalog>,
}

impl RouteGuard {
    pub fn new(catalog: Arc<PermissionCatalog>) -> Self {
        RouteGuard { catalog }
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    pub fn evaluate(&self, principal: Option<&Principal>, path: &str) -> Decision {
        let login = self.catalog.login_route();

        let Some(principal) = principal else {
            debug!(event = "Guard", phase = "NoPrincipal", path = path);
            return Decision::NoPrincipal {
                redirect_to: login.to_string(),
            };
        };

        let role = match principal.role_claim() {
            RoleClaim::Missing => {
                // No fallback role is ever assumed.
                warn!(event = "Guard", phase = "MissingRole", path = path);
                return Decision::MissingRole {
                    redirect_to: login.to_string(),
                };
            }
            RoleClaim::Unknown(raw) => {
                info!(
                    event = "Guard",
                    phase = "Denied",
                    role = raw,
                    path = path,
                    reason = %DenialReason::UnknownRole
                );
                return Decision::Denied {
                    role: raw.to_string(),
                    reason: DenialReason::UnknownRole,
                    default_route: login.to_string(),
                };
            }
            RoleClaim::Known(role) => role,
        };

        let access = self.catalog.route_access(&role, path);
        match access.denial_reason() {
            None => {
                debug!(
                    event = "Guard",
                    phase = "Granted",
                    role = %role,
                    path = path,
                    access = ?access
                );
                Decision::Granted
            }
            Some(reason) => {
                let default_route = self.catalog.default_route(&role).to_string();
                info!(
                    event = "Guard",
                    phase = "Denied",
                    role = %role,
                    path = path,
                    reason = %reason,
                    default_route = default_route.as_str()
                );
                Decision::Denied {
                    role: role.to_string(),
                    reason,
                    default_route,
                }
            }
        }
    }
}
