//! Guard decisions and catalog version metadata.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay};
use utoipa::ToSchema;

/// Version metadata for the catalog a decision was computed against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub struct PolicyVersion {
    /// SHA-256 of the catalog source text.
    pub hash: String,
    /// When this catalog was loaded into the engine (RFC 3339).
    pub loaded_at: String,
}

impl Display for PolicyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} @ {}", self.hash, self.loaded_at)
    }
}

/// Why a principal with a role was refused.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, StrumDisplay, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DenialReason {
    /// The role string is not one of the known roles.
    UnknownRole,
    /// The path resolves to no module.
    UnknownModule,
    /// The path contains `.` or `..` segments.
    InvalidPath,
    /// The module exists but none of its read actions list the role.
    NotPermitted,
    /// The path is an override route that does not list the role.
    OverrideRestricted,
}

/// The four guard states, strongest failure first.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema, StrumDisplay, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardState {
    NoPrincipal,
    MissingRole,
    Denied,
    Granted,
}

/// What the rendering layer must do for a navigation target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// No principal reached the guard. Redirect, render nothing.
    NoPrincipal { redirect_to: String },
    /// The principal has no role claim. Render the authentication error
    /// surface; its only recovery is to clear the session and go to `redirect_to`.
    MissingRole { redirect_to: String },
    /// Render the access-denied surface with the caller's role and a link to
    /// their default route.
    Denied {
        role: String,
        reason: DenialReason,
        default_route: String,
    },
    /// Render the protected content unchanged.
    Granted,
}

impl Decision {
    pub fn state(&self) -> GuardState {
        match self {
            Decision::NoPrincipal { .. } => GuardState::NoPrincipal,
            Decision::MissingRole { .. } => GuardState::MissingRole,
            Decision::Denied { .. } => GuardState::Denied,
            Decision::Granted => GuardState::Granted,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted)
    }

    /// The route the "go to my default route" action points at, only for denials.
    pub fn default_route(&self) -> Option<&str> {
        match self {
            Decision::Denied { default_route, .. } => Some(default_route.as_str()),
            _ => None,
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Decision::NoPrincipal { redirect_to } => {
                write!(f, "NoPrincipal(redirect={redirect_to})")
            }
            Decision::MissingRole { redirect_to } => {
                write!(f, "MissingRole(redirect={redirect_to})")
            }
            Decision::Denied {
                role,
                reason,
                default_route,
            } => write!(f, "Denied(role={role}; reason={reason}; default={default_route})"),
            Decision::Granted => write!(f, "Granted"),
        }
    }
}
