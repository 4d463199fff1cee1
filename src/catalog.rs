use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use tracing::debug;

use crate::error::PolicyError;
use crate::types::{
    Action, DenialReason, ModuleId, Role, RouteBinding, RoutePattern, has_dot_segment,
    normalize_path,
};


#[derive(Debug, Clone, Default)]
struct ModuleRules {
    actions: BTreeMap<Action, BTreeSet<Role>>,
    /// Replaces the catalog-wide read-equivalent set for this module.
    read_actions: Option<Vec<Action>>,
}

/// How a route evaluation was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Granted by a literal override route.
    Override,
    /// Granted by the first read-equivalent action the role holds on `module`.
    Module { module: ModuleId, via: Action },
    /// The path is an override route and the role is not on its list.
    OverrideRestricted,
    /// The path resolves to no module.
    UnknownModule,
    /// The path has `.` or `..` segments and is not resolved at all.
    InvalidPath,
    /// None of the module's read-equivalent actions list the role.
    NotPermitted { module: ModuleId },
}

impl RouteAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, RouteAccess::Override | RouteAccess::Module { .. })
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            RouteAccess::Override | RouteAccess::Module { .. } => None,
            RouteAccess::OverrideRestricted => Some(DenialReason::OverrideRestricted),
            RouteAccess::UnknownModule => Some(DenialReason::UnknownModule),
            RouteAccess::InvalidPath => Some(DenialReason::InvalidPath),
            RouteAccess::NotPermitted { .. } => Some(DenialReason::NotPermitted),
        }
    }
}

/// The immutable permission matrix plus the route tables that feed it.
///
/// Every query is a pure function of its inputs. Anything the catalog does
/// not know about (module, action, role, path) is denied.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    modules: BTreeMap<ModuleId, ModuleRules>,
    exact_routes: HashMap<String, ModuleId>,
    /// Prefix and pattern bindings, in priority order.
    fallback_routes: Vec<RouteBinding>,
    // TODO: fold the two grade overrides into per-role read actions on
    // `grades` once no console route depends on the literal paths.
    overrides: BTreeMap<String, BTreeSet<Role>>,
    read_actions: Vec<Action>,
    default_routes: BTreeMap<Role, String>,
    login_route: String,
}

impl PermissionCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// `true` only if `module` declares `action` and lists `role` for it.
    pub fn is_allowed(&self, role: &Role, module: &str, action: &str) -> bool {
        self.modules
            .get(module)
            .and_then(|rules| rules.actions.get(action))
            .is_some_and(|roles| roles.contains(role))
    }

    /// The declared actions of `module` that `role` holds. For UI affordances only.
    pub fn allowed_actions(&self, role: &Role, module: &str) -> BTreeSet<Action> {
        self.modules
            .get(module)
            .map(|rules| {
                rules
                    .actions
                    .iter()
                    .filter(|(_, roles)| roles.contains(role))
                    .map(|(action, _)| action.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn declared_actions(&self, module: &str) -> Option<BTreeSet<Action>> {
        self.modules
            .get(module)
            .map(|rules| rules.actions.keys().cloned().collect())
    }

    /// Resolve a path to its module: exact table first, then prefix and
    /// pattern bindings in declaration order. Paths with dot segments resolve
    /// to nothing.
    pub fn resolve_module(&self, path: &str) -> Option<&ModuleId> {
        let path = normalize_path(path);
        if has_dot_segment(path) {
            return None;
        }
        if let Some(module) = self.exact_routes.get(path) {
            return Some(module);
        }
        self.fallback_routes
            .iter()
            .find(|binding| binding.pattern.matches(path))
            .map(|binding| &binding.module)
    }

    /// The read-equivalent actions for `module`, in evaluation order.
    pub fn read_actions(&self, module: &str) -> &[Action] {
        self.modules
            .get(module)
            .and_then(|rules| rules.read_actions.as_deref())
            .unwrap_or(self.read_actions.as_slice())
    }

    pub fn route_access(&self, role: &Role, path: &str) -> RouteAccess {
        let path = normalize_path(path);
        if has_dot_segment(path) {
            return RouteAccess::InvalidPath;
        }

        if let Some(roles) = self.overrides.get(path) {
            return if roles.contains(role) {
                RouteAccess::Override
            } else {
                RouteAccess::OverrideRestricted
            };
        }

        let Some(module) = self.resolve_module(path) else {
            return RouteAccess::UnknownModule;
        };

        match self
            .read_actions(module.as_str())
            .iter()
            .find(|action| self.is_allowed(role, module.as_str(), action.as_str()))
        {
            Some(action) => RouteAccess::Module {
                module: module.clone(),
                via: action.clone(),
            },
            None => RouteAccess::NotPermitted {
                module: module.clone(),
            },
        }
    }

    pub fn can_access_route(&self, role: &Role, path: &str) -> bool {
        self.route_access(role, path).is_granted()
    }

    /// Landing route for `role`; roles without one fall back to the login route.
    pub fn default_route(&self, role: &Role) -> &str {
        self.default_routes
            .get(role)
            .map(String::as_str)
            .unwrap_or(self.login_route.as_str())
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.keys()
    }

    pub fn override_roles(&self, path: &str) -> Option<&BTreeSet<Role>> {
        self.overrides.get(normalize_path(path))
    }
}

/// Collects catalog definitions and validates them as a whole in [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    permits: Vec<(String, String, Vec<Role>)>,
    module_read_actions: Vec<(String, Vec<String>)>,
    routes: Vec<(RouteSpec, String)>,
    overrides: Vec<(String, Vec<Role>)>,
    read_actions: Option<Vec<String>>,
    default_routes: Vec<(Role, String)>,
    login_route: Option<String>,
}

#[derive(Debug, Clone)]
enum RouteSpec {
    Exact(String),
    Prefix(String),
    Pattern(String),
}

impl CatalogBuilder {
    /// Declare `action` on `module` for `roles`. Repeated calls extend the set.
    pub fn permit(mut self, module: &str, action: &str, roles: &[Role]) -> Self {
        self.permits
            .push((module.to_string(), action.to_string(), roles.to_vec()));
        self
    }

    pub fn module_read_actions(mut self, module: &str, actions: &[&str]) -> Self {
        self.module_read_actions.push((
            module.to_string(),
            actions.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }

    pub fn exact(mut self, path: &str, module: &str) -> Self {
        self.routes
            .push((RouteSpec::Exact(path.to_string()), module.to_string()));
        self
    }

    pub fn prefix(mut self, prefix: &str, module: &str) -> Self {
        self.routes
            .push((RouteSpec::Prefix(prefix.to_string()), module.to_string()));
        self
    }

    pub fn pattern(mut self, regex: &str, module: &str) -> Self {
        self.routes
            .push((RouteSpec::Pattern(regex.to_string()), module.to_string()));
        self
    }

    pub fn override_route(mut self, path: &str, roles: &[Role]) -> Self {
        self.overrides.push((path.to_string(), roles.to_vec()));
        self
    }

    pub fn read_actions(mut self, actions: &[&str]) -> Self {
        self.read_actions = Some(actions.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn default_route(mut self, role: Role, path: &str) -> Self {
        self.default_routes.push((role, path.to_string()));
        self
    }

    pub fn login_route(mut self, path: &str) -> Self {
        self.login_route = Some(path.to_string());
        self
    }

    pub fn build(self) -> Result<PermissionCatalog, PolicyError> {
        let mut modules: BTreeMap<ModuleId, ModuleRules> = BTreeMap::new();
        for (module, action, roles) in self.permits {
            if roles.is_empty() {
                return Err(PolicyError::EmptyRoleSet { module, action });
            }
            let module = ModuleId::from_str(&module)?;
            let action = Action::from_str(&action)?;
            modules
                .entry(module)
                .or_default()
                .actions
                .entry(action)
                .or_default()
                .extend(roles);
        }

        for (module, actions) in self.module_read_actions {
            let actions = parse_read_actions(&actions)?;
            let Some(rules) = modules.get_mut(module.as_str()) else {
                return Err(PolicyError::InvalidFormat(format!(
                    "read actions declared for undeclared module '{module}'"
                )));
            };
            rules.read_actions = Some(actions);
        }

        let mut exact_routes = HashMap::new();
        let mut fallback_routes = Vec::new();
        for (spec, module) in self.routes {
            let route = match &spec {
                RouteSpec::Exact(p) | RouteSpec::Prefix(p) | RouteSpec::Pattern(p) => p.clone(),
            };
            let Some((module_id, _)) = modules.get_key_value(module.as_str()) else {
                return Err(PolicyError::UnknownModule { route, module });
            };
            let module_id = module_id.clone();
            match spec {
                RouteSpec::Exact(path) => {
                    validate_route(&path)?;
                    let path = normalize_path(&path).to_string();
                    if exact_routes.insert(path.clone(), module_id).is_some() {
                        return Err(PolicyError::DuplicateRoute(path));
                    }
                }
                RouteSpec::Prefix(prefix) => {
                    validate_route(&prefix)?;
                    fallback_routes
                        .push(RouteBinding::new(RoutePattern::Prefix(prefix), module_id));
                }
                RouteSpec::Pattern(regex) => {
                    let re = regex::Regex::new(&anchor(&regex))?;
                    fallback_routes.push(RouteBinding::new(RoutePattern::Pattern(re), module_id));
                }
            }
        }

        let mut overrides = BTreeMap::new();
        for (path, roles) in self.overrides {
            validate_route(&path)?;
            if roles.is_empty() {
                return Err(PolicyError::EmptyRoleSet {
                    module: format!("override {path}"),
                    action: Action::VIEW.to_string(),
                });
            }
            let path = normalize_path(&path).to_string();
            let roles: BTreeSet<Role> = roles.into_iter().collect();
            if overrides.insert(path.clone(), roles).is_some() {
                return Err(PolicyError::DuplicateRoute(path));
            }
        }

        let read_actions = match self.read_actions {
            Some(actions) => parse_read_actions(&actions)?,
            None => Action::read_equivalents(),
        };

        let login_route = self.login_route.unwrap_or_else(|| "/login".to_string());
        validate_route(&login_route)?;

        let mut default_routes = BTreeMap::new();
        for (role, path) in self.default_routes {
            validate_route(&path)?;
            default_routes.insert(role, path);
        }

        debug!(
            event = "Catalog",
            phase = "Built",
            modules = modules.len(),
            exact_routes = exact_routes.len(),
            fallback_routes = fallback_routes.len(),
            overrides = overrides.len()
        );

        Ok(PermissionCatalog {
            modules,
            exact_routes,
            fallback_routes,
            overrides,
            read_actions,
            default_routes,
            login_route,
        })
    }
}

fn parse_read_actions(actions: &[String]) -> Result<Vec<Action>, PolicyError> {
    if actions.is_empty() {
        return Err(PolicyError::InvalidFormat(
            "read action list must not be empty".to_string(),
        ));
    }
    actions.iter().map(|a| Action::from_str(a)).collect()
}

fn validate_route(path: &str) -> Result<(), PolicyError> {
    if !path.starts_with('/') {
        return Err(PolicyError::InvalidFormat(format!(
            "route '{path}' must start with '/'"
        )));
    }
    Ok(())
}

/// Patterns match whole paths, including every branch of a top-level alternation.
fn anchor(regex: &str) -> String {
    format!("^(?:{regex})$")
}
