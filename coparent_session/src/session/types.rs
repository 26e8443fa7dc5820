use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::session::errors::SessionError;
use crate::session::token::{self, TokenStatus};

/// The UI mode a session presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Parent,
    Professional,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Role::Parent),
            "professional" => Ok(Role::Professional),
            other => Err(SessionError::InvalidRole(other.to_string())),
        }
    }
}

/// Back-references from a subject to its role entities in the document store.
///
/// A subject may be linked to a parent entity, a professional entity, both
/// (a dual-role account) or neither.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "StoredRoleEntities", into = "StoredRoleEntities")]
pub enum RoleEntities {
    #[default]
    Unlinked,
    Parent(String),
    Professional(String),
    Dual {
        parent: String,
        professional: String,
    },
}

impl RoleEntities {
    pub fn from_parts(parent: Option<String>, professional: Option<String>) -> Self {
        match (parent, professional) {
            (None, None) => RoleEntities::Unlinked,
            (Some(parent), None) => RoleEntities::Parent(parent),
            (None, Some(professional)) => RoleEntities::Professional(professional),
            (Some(parent), Some(professional)) => RoleEntities::Dual {
                parent,
                professional,
            },
        }
    }

    pub fn is_dual_role(&self) -> bool {
        matches!(self, RoleEntities::Dual { .. })
    }

    pub fn entity_for(&self, role: Role) -> Option<&str> {
        match (self, role) {
            (RoleEntities::Parent(id), Role::Parent)
            | (RoleEntities::Professional(id), Role::Professional) => Some(id),
            (RoleEntities::Dual { parent, .. }, Role::Parent) => Some(parent),
            (RoleEntities::Dual { professional, .. }, Role::Professional) => Some(professional),
            _ => None,
        }
    }
}

/// On-disk shape of [`RoleEntities`]: two independent nullable ids plus the
/// derived `dualRole` flag, which is written for readers that expect it and
/// ignored on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRoleEntities {
    #[serde(default)]
    parent_entity_id: Option<String>,
    #[serde(default)]
    professional_entity_id: Option<String>,
    #[serde(default)]
    dual_role: bool,
}

impl From<StoredRoleEntities> for RoleEntities {
    fn from(stored: StoredRoleEntities) -> Self {
        RoleEntities::from_parts(stored.parent_entity_id, stored.professional_entity_id)
    }
}

impl From<RoleEntities> for StoredRoleEntities {
    fn from(entities: RoleEntities) -> Self {
        let dual_role = entities.is_dual_role();
        let (parent_entity_id, professional_entity_id) = match entities {
            RoleEntities::Unlinked => (None, None),
            RoleEntities::Parent(parent) => (Some(parent), None),
            RoleEntities::Professional(professional) => (None, Some(professional)),
            RoleEntities::Dual {
                parent,
                professional,
            } => (Some(parent), Some(professional)),
        };
        Self {
            parent_entity_id,
            professional_entity_id,
            dual_role,
        }
    }
}

/// The single locally persisted session record.
///
/// Serialized as camelCase JSON with millisecond timestamps. Fields added after
/// the first release carry `#[serde(default)]` so older records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub subject_id: String,
    #[serde(default)]
    pub contact_address: String,
    pub credential: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_activity_at: DateTime<Utc>,
    #[serde(default)]
    pub active_role: Role,
    #[serde(flatten)]
    pub role_entities: RoleEntities,
    #[serde(default)]
    pub entitled_roles: BTreeSet<String>,
    #[serde(default)]
    pub family_memberships: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_entitled_to(&self, role: Role) -> bool {
        self.entitled_roles.contains(role.as_str())
    }

    /// Decode the embedded credential and check it belongs to this subject.
    pub fn credential_status(&self, now: DateTime<Utc>) -> TokenStatus {
        let status = token::decode_at(&self.credential, now);
        match &status.claims {
            Some(claims) if claims.subject_id != self.subject_id => TokenStatus::invalid(),
            _ => status,
        }
    }
}

/// Profile data pulled from the document store when a session is created.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileSnapshot {
    pub entitled_roles: BTreeSet<String>,
    pub family_memberships: Vec<String>,
    pub role_entities: RoleEntities,
}
