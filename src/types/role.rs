//! The closed set of roles handed to us by the authentication layer.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// A school role. Roles are assigned externally; the engine never creates one.
///
/// Parsing is exact: `"admin"` is a role, `"Admin"` is not.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Director,
    /// Teacher.
    Profesor,
    /// Student.
    Alumno,
    /// Guardian of one or more students.
    Apoderado,
    /// Registrar / front office.
    Secretaria,
}
