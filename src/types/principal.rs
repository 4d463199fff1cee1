//! The authenticated caller as handed over by the auth layer.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::role::Role;

/// A principal for a guard evaluation.
///
/// The role is kept as the raw claim string so that a broken account (no
/// role) can be told apart from a role we do not know. Extra claims are not
/// used by the engine and are passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Principal {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub claims: BTreeMap<String, Value>,
}

/// The outcome of interpreting a principal's role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClaim<'a> {
    /// No role, or a blank one.
    Missing,
    Known(Role),
    /// A role string outside the fixed enumeration.
    Unknown(&'a str),
}

impl Principal {
    pub fn new<T: Into<String>>(role: T) -> Self {
        Principal {
            role: Some(role.into()),
            claims: BTreeMap::new(),
        }
    }

    pub fn with_role(role: Role) -> Self {
        Principal::new(role.as_ref())
    }

    /// A principal that authenticated but carries no role claim.
    pub fn without_role() -> Self {
        Principal::default()
    }

    pub fn with_claim<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    pub fn role_claim(&self) -> RoleClaim<'_> {
        match self.role.as_deref() {
            None => RoleClaim::Missing,
            Some(raw) if raw.trim().is_empty() => RoleClaim::Missing,
            Some(raw) => match Role::from_str(raw) {
                Ok(role) => RoleClaim::Known(role),
                Err(_) => RoleClaim::Unknown(raw),
            },
        }
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.role {
            Some(role) => write!(f, "Principal(role={role})"),
            None => write!(f, "Principal(role=<none>)"),
        }
    }
}
