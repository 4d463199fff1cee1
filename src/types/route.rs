//! Route bindings: how a navigation path maps to a module.

use std::fmt::{Display, Formatter, Result as FmtResult};

use regex::Regex;

use super::module::ModuleId;

/// A fallback path matcher. Exact routes live in their own table and are
/// consulted before any of these.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// The path must start with this literal, e.g. `/alumnos/detalle/`.
    Prefix(String),
    /// The whole path must match this anchored regex, e.g. `^/cursos/\d+/alumnos$`.
    Pattern(Regex),
}

impl RoutePattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
            RoutePattern::Pattern(re) => re.is_match(path),
        }
    }
}

impl Display for RoutePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RoutePattern::Prefix(prefix) => write!(f, "prefix:{prefix}*"),
            RoutePattern::Pattern(re) => write!(f, "pattern:{}", re.as_str()),
        }
    }
}

/// Binds a route pattern to the module whose permissions govern it.
#[derive(Debug, Clone)]
pub struct RouteBinding {
    pub pattern: RoutePattern,
    pub module: ModuleId,
}

impl RouteBinding {
    pub fn new(pattern: RoutePattern, module: ModuleId) -> Self {
        RouteBinding { pattern, module }
    }
}

/// Strip query and fragment, then any trailing slash (the root stays `/`).
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `true` if any segment of `path` is `.` or `..`. Such paths are never resolved.
pub fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "." || segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        plain = { "/usuarios", "/usuarios" },
        trailing_slash = { "/usuarios/", "/usuarios" },
        query = { "/usuarios?page=2", "/usuarios" },
        fragment = { "/usuarios#top", "/usuarios" },
        query_and_slash = { "/alumnos/detalle/42/?tab=notas", "/alumnos/detalle/42" },
        root = { "/", "/" },
        root_query = { "/?x=1", "/" },
        empty = { "", "/" },
    )]
    fn test_normalize_path(input: &str, expected: &str) {
        assert_eq!(normalize_path(input), expected);
    }

    #[parameterized(
        parent = { "/alumnos/detalle/../../usuarios", true },
        current = { "/alumnos/./detalle/4", true },
        trailing_parent = { "/alumnos/..", true },
        dotted_name = { "/reportes/2026.pdf", false },
        triple_dot = { "/alumnos/...", false },
        plain = { "/alumnos/detalle/4", false },
    )]
    fn test_has_dot_segment(path: &str, expected: bool) {
        assert_eq!(has_dot_segment(path), expected);
    }

    #[parameterized(
        id_42 = { "/alumnos/detalle/42" },
        id_7 = { "/alumnos/detalle/7" },
        slug = { "/alumnos/detalle/ana-perez" },
    )]
    fn test_prefix_pattern_is_parameter_agnostic(path: &str) {
        let pattern = RoutePattern::Prefix("/alumnos/detalle/".to_string());
        assert!(pattern.matches(path));
    }

    #[test]
    fn test_regex_pattern() {
        let pattern = RoutePattern::Pattern(Regex::new(r"^/cursos/\d+/alumnos$").unwrap());
        assert!(pattern.matches("/cursos/12/alumnos"));
        assert!(!pattern.matches("/cursos/abc/alumnos"));
        assert_eq!(pattern.to_string(), r"pattern:^/cursos/\d+/alumnos$");
    }
}
