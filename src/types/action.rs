//! Actions (verbs) declared within a module.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PolicyError;

/// A verb within a module, e.g. `view`, `delete` or `viewChildren`.
///
/// An action that a module does not declare is always denied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String)]
pub struct Action(String);

impl Action {
    pub const VIEW: &'static str = "view";
    pub const CREATE: &'static str = "create";
    pub const EDIT: &'static str = "edit";
    pub const DELETE: &'static str = "delete";
    pub const EXPORT: &'static str = "export";
    /// The caller's own records.
    pub const VIEW_OWN: &'static str = "viewOwn";
    /// The caller's own grades.
    pub const VIEW_PROPIAS: &'static str = "viewPropias";
    /// Records of the caller's dependents.
    pub const VIEW_CHILDREN: &'static str = "viewChildren";

    /// Create an action without validating it. Use `FromStr` for untrusted input.
    pub fn new<T: Into<String>>(verb: T) -> Self {
        Action(verb.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default read-equivalent verbs, in evaluation order.
    pub fn read_equivalents() -> Vec<Action> {
        [
            Self::VIEW,
            Self::VIEW_OWN,
            Self::VIEW_PROPIAS,
            Self::VIEW_CHILDREN,
        ]
        .into_iter()
        .map(Action::new)
        .collect()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for Action {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for Action {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier("action", s)?;
        Ok(Action(s.to_string()))
    }
}

impl TryFrom<String> for Action {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_identifier("action", &value)?;
        Ok(Action(value))
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.0
    }
}

/// Identifiers are non-empty and limited to ASCII alphanumerics, `_` and `-`.
pub(crate) fn validate_identifier(kind: &str, s: &str) -> Result<(), PolicyError> {
    if s.is_empty() {
        return Err(PolicyError::InvalidFormat(format!("empty {kind} identifier")));
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(PolicyError::InvalidFormat(format!(
            "invalid character {c:?} in {kind} identifier '{s}'"
        )));
    }
    Ok(())
}
