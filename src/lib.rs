//! Role-based access control for the Aula school console.
//!
//! A [`PermissionCatalog`] maps `(module, action)` pairs to the roles allowed
//! to perform them and binds application routes to modules. A [`RouteGuard`]
//! turns a principal and a path into a [`Decision`], and
//! [`filter_menu_by_role`] trims navigation to what a role can open.
//! [`AccessEngine`] holds the live catalog and swaps it atomically on reload.
//!
//! ```rust
//! use aula_rbac::{AccessEngine, GuardState, Principal, Role};
//!
//! let engine = AccessEngine::school().unwrap();
//! let decision = engine.evaluate(Some(&Principal::with_role(Role::Profesor)), "/usuarios");
//! assert_eq!(decision.state(), GuardState::Denied);
//! assert_eq!(decision.default_route(), Some("/calificaciones"));
//! ```
pub use catalog::{CatalogBuilder, PermissionCatalog, RouteAccess};
pub use engine::{AccessEngine, CatalogSnapshot};
pub use error::PolicyError;
pub use guard::RouteGuard;
pub use loader::{
    CatalogDocument, ModuleDocument, OverrideDocument, RouteDocument, SCHOOL_POLICY,
    compile_catalog,
};
pub use menu::filter_menu_by_role;
pub use types::*;

mod catalog;
mod engine;
mod error;
mod guard;
mod loader;
mod menu;
pub mod types;

#[cfg(feature = "observability")]
pub mod metrics;
#[cfg(feature = "observability")]
mod timers;
