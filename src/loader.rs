use std::collections::BTreeMap;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::catalog::PermissionCatalog;
use crate::error::PolicyError;
use crate::types::Role;

/// The built-in catalog for the school console.
pub const SCHOOL_POLICY: &str = include_str!("../policies/school.json");

/// On-disk form of a catalog. Roles stay strings here so an unknown one is
/// reported as [`PolicyError::UnknownRole`] instead of a generic parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_actions: Option<Vec<String>>,
    pub modules: BTreeMap<String, ModuleDocument>,
    #[serde(default)]
    pub routes: Vec<RouteDocument>,
    #[serde(default)]
    pub overrides: Vec<OverrideDocument>,
    #[serde(default)]
    pub default_routes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDocument {
    pub actions: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_actions: Option<Vec<String>>,
}

/// Exactly one of `exact`, `prefix` or `pattern` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub module: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideDocument {
    pub path: String,
    pub roles: Vec<String>,
}

/// Compile catalog JSON into a validated `PermissionCatalog`.
///
/// Example:
/// ```rust
/// use aula_rbac::{Role, compile_catalog};
/// let catalog = compile_catalog(r#"{
///     "modules": { "users": { "actions": { "view": ["admin"] } } },
///     "routes": [ { "exact": "/usuarios", "module": "users" } ]
/// }"#).unwrap();
/// assert!(catalog.can_access_route(&Role::Admin, "/usuarios"));
/// assert!(!catalog.can_access_route(&Role::Profesor, "/usuarios"));
/// ```
pub fn compile_catalog(text: &str) -> Result<PermissionCatalog, PolicyError> {
    let document: CatalogDocument = serde_json::from_str(text)?;
    document.into_catalog()
}

impl CatalogDocument {
    pub fn into_catalog(self) -> Result<PermissionCatalog, PolicyError> {
        let mut builder = PermissionCatalog::builder();

        if let Some(login_route) = &self.login_route {
            builder = builder.login_route(login_route);
        }
        if let Some(actions) = &self.read_actions {
            builder = builder.read_actions(&as_strs(actions));
        }

        for (module, doc) in &self.modules {
            if doc.actions.is_empty() {
                return Err(PolicyError::InvalidFormat(format!(
                    "module '{module}' declares no actions"
                )));
            }
            for (action, roles) in &doc.actions {
                builder = builder.permit(module, action, &parse_roles(roles)?);
            }
            if let Some(actions) = &doc.read_actions {
                builder = builder.module_read_actions(module, &as_strs(actions));
            }
        }

        for route in &self.routes {
            builder = match (&route.exact, &route.prefix, &route.pattern) {
                (Some(path), None, None) => builder.exact(path, &route.module),
                (None, Some(prefix), None) => builder.prefix(prefix, &route.module),
                (None, None, Some(regex)) => builder.pattern(regex, &route.module),
                _ => {
                    return Err(PolicyError::InvalidFormat(format!(
                        "route for module '{}' must set exactly one of exact, prefix or pattern (got [{}])",
                        route.module,
                        route.matchers().join(", ")
                    )));
                }
            };
        }

        for entry in &self.overrides {
            builder = builder.override_route(&entry.path, &parse_roles(&entry.roles)?);
        }

        for (role, path) in &self.default_routes {
            builder = builder.default_route(parse_role(role)?, path);
        }

        builder.build()
    }
}

impl RouteDocument {
    fn matchers(&self) -> impl Iterator<Item = &'static str> {
        [
            ("exact", self.exact.is_some()),
            ("prefix", self.prefix.is_some()),
            ("pattern", self.pattern.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
    }
}

fn parse_role(role: &str) -> Result<Role, PolicyError> {
    Role::from_str(role).map_err(|_| PolicyError::UnknownRole(role.to_string()))
}

fn parse_roles(roles: &[String]) -> Result<Vec<Role>, PolicyError> {
    roles.iter().map(|r| parse_role(r)).collect()
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}
