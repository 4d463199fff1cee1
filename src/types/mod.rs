//! Data model types for the permission catalog and the route guard.
//!
//! Canonical string forms:
//! - Role: lowercase name, e.g. `profesor`
//! - Module: identifier, e.g. `finance_reports`
//! - Action: identifier, e.g. `viewChildren`
//! - Route: absolute path, e.g. `/alumnos/detalle/42`

mod action;
mod decision;
mod menu;
mod module;
mod principal;
mod role;
mod route;

pub use action::Action;
pub use decision::{Decision, DenialReason, GuardState, PolicyVersion};
pub use menu::{MenuItem, MenuSection};
pub use module::ModuleId;
pub use principal::{Principal, RoleClaim};
pub use role::Role;
pub use route::{RouteBinding, RoutePattern, has_dot_segment, normalize_path};
