//! Module identifiers, the unit of permission granularity.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PolicyError;

use super::action::validate_identifier;

/// A named capability domain such as `students`, `grades` or `finance_reports`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String)]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a module id without validating it. Use `FromStr` for untrusted input.
    pub fn new<T: Into<String>>(id: T) -> Self {
        ModuleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for ModuleId {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier("module", s)?;
        Ok(ModuleId(s.to_string()))
    }
}

impl TryFrom<String> for ModuleId {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_identifier("module", &value)?;
        Ok(ModuleId(value))
    }
}

impl From<ModuleId> for String {
    fn from(module: ModuleId) -> Self {
        module.0
    }
}
