//! Profile documents in the remote document store.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::session::types::{ProfileSnapshot, Role, RoleEntities};
use crate::storage::Document;

pub(super) const FIELD_EMAIL: &str = "email";
pub(super) const FIELD_ROLES: &str = "roles";
pub(super) const FIELD_FAMILY_IDS: &str = "familyIds";
pub(super) const FIELD_PARENT_ID: &str = "parentId";
pub(super) const FIELD_PROFESSIONAL_ID: &str = "professionalId";
pub(super) const FIELD_LAST_LOGIN_AT: &str = "lastLoginAt";
pub(super) const FIELD_LAST_ACTIVITY_AT: &str = "lastActivityAt";
pub(super) const FIELD_ACTIVE_ROLE: &str = "activeRole";
pub(super) const FIELD_CREATED_AT: &str = "createdAt";

/// Read the parts of a profile document a session carries. Fields of the
/// wrong type are treated as absent.
pub(super) fn parse_profile(document: &Document) -> ProfileSnapshot {
    let strings = |field: &str| -> Vec<String> {
        document
            .get(field)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };
    let id = |field: &str| -> Option<String> {
        document
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    ProfileSnapshot {
        entitled_roles: strings(FIELD_ROLES).into_iter().collect(),
        family_memberships: strings(FIELD_FAMILY_IDS),
        role_entities: RoleEntities::from_parts(id(FIELD_PARENT_ID), id(FIELD_PROFESSIONAL_ID)),
    }
}

/// Profile written for a subject that has none yet.
pub(super) fn default_profile(contact_address: &str, now: DateTime<Utc>) -> Document {
    fields(json!({
        FIELD_EMAIL: contact_address,
        FIELD_ROLES: [],
        FIELD_FAMILY_IDS: [],
        FIELD_PARENT_ID: null,
        FIELD_PROFESSIONAL_ID: null,
        FIELD_CREATED_AT: now.timestamp_millis(),
    }))
}

pub(super) fn login_marker(now: DateTime<Utc>, role: Role) -> Document {
    fields(json!({
        FIELD_LAST_LOGIN_AT: now.timestamp_millis(),
        FIELD_LAST_ACTIVITY_AT: now.timestamp_millis(),
        FIELD_ACTIVE_ROLE: role.as_str(),
    }))
}

pub(super) fn activity_marker(last_activity_at: DateTime<Utc>) -> Document {
    fields(json!({
        FIELD_LAST_ACTIVITY_AT: last_activity_at.timestamp_millis(),
    }))
}

pub(super) fn role_marker(role: Role) -> Document {
    fields(json!({
        FIELD_ACTIVE_ROLE: role.as_str(),
    }))
}

fn fields(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}
