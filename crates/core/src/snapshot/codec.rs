use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    error::SnapshotError,
    import::role_for_column,
    model::{AssignmentTable, Project, ProjectId, Resource, ResourceId, Role, StaffingModel},
};

/// Encoded form written to the blob store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotBlob<'a> {
    programmers: &'a [Resource],
    qas: &'a [Resource],
    project_managers: &'a [Resource],
    project_leads: &'a [Resource],
    projects: &'a [Project],
    assignments: &'a AssignmentTable,
}

/// Stored entity, tolerant of a missing id (older blobs keyed on name only).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntity {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    project_lead_id: Option<String>,
}

const POOL_FIELDS: [(&str, Role); 4] = [
    ("programmers", Role::Programmer),
    ("qas", Role::Qa),
    ("projectManagers", Role::ProjectManager),
    ("projectLeads", Role::ProjectLead),
];

/// Serialize the full model to a JSON blob.
pub fn encode(model: &StaffingModel) -> Result<String, SnapshotError> {
    let blob = SnapshotBlob {
        programmers: model.pool(Role::Programmer),
        qas: model.pool(Role::Qa),
        project_managers: model.pool(Role::ProjectManager),
        project_leads: model.pool(Role::ProjectLead),
        projects: model.projects(),
        assignments: model.assignments(),
    };
    serde_json::to_string_pretty(&blob).map_err(SnapshotError::Encode)
}

/// Rebuild a model from a JSON blob.
///
/// Only a blob that is not JSON at all fails. Valid JSON of the wrong shape,
/// absent fields and malformed entries decode as empty, and bucket entries
/// naming unknown resources or projects are dropped. Names are kept exactly
/// as stored.
pub fn decode(blob: &str) -> Result<StaffingModel, SnapshotError> {
    let root = match serde_json::from_str::<Value>(blob).map_err(SnapshotError::Corrupt)? {
        Value::Object(root) => root,
        other => {
            warn!(kind = json_kind(&other), "snapshot is not an object; loading empty state");
            Map::new()
        }
    };
    let mut model = StaffingModel::new();

    for (field, role) in POOL_FIELDS {
        for entity in entities(&root, field) {
            let id = entity
                .id
                .filter(|id| !id.trim().is_empty())
                .map(ResourceId::from_raw)
                .or_else(|| ResourceId::from_name(&entity.name));
            if let Some(id) = id {
                model.register_resource(
                    role,
                    Resource {
                        id,
                        name: entity.name,
                    },
                );
            }
        }
    }

    let mut legacy_leads = Vec::new();
    for entity in entities(&root, "projects") {
        let id = entity
            .id
            .filter(|id| !id.trim().is_empty())
            .map(ProjectId::from_raw)
            .or_else(|| ProjectId::from_name(&entity.name));
        let Some(id) = id else { continue };
        if let Some(lead) = entity.project_lead_id.filter(|lead| !lead.is_empty()) {
            legacy_leads.push((id.clone(), ResourceId::from_raw(lead)));
        }
        model.register_project(Project {
            id,
            name: entity.name,
        });
    }

    let mut dropped = 0usize;
    if let Some(table) = root.get("assignments").and_then(Value::as_object) {
        for (project_key, buckets) in table {
            let project = ProjectId::from_raw(project_key.as_str());
            if model.project(&project).is_none() {
                dropped += 1;
                continue;
            }
            let Some(buckets) = buckets.as_object() else {
                continue;
            };
            for (role_key, ids) in buckets {
                let Some(role) = role_for_key(role_key) else {
                    warn!(key = %role_key, "unknown role bucket in snapshot");
                    continue;
                };
                for raw in ids.as_array().into_iter().flatten().filter_map(Value::as_str) {
                    let id = ResourceId::from_raw(raw);
                    if model.resource(&id).is_none() {
                        dropped += 1;
                        continue;
                    }
                    model.assignments_mut().insert(&project, role, &id);
                }
            }
        }
    }

    for (project, lead) in legacy_leads {
        if model.resource(&lead).is_some() {
            model
                .assignments_mut()
                .insert(&project, Role::ProjectLead, &lead);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!(dropped, "dropped dangling references while decoding snapshot");
    }
    Ok(model)
}

fn entities(root: &Map<String, Value>, field: &str) -> Vec<StoredEntity> {
    let Some(items) = root.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match StoredEntity::deserialize(item) {
            Ok(entity) => Some(entity),
            Err(err) => {
                warn!(field, "skipping malformed snapshot entry: {err}");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn role_for_key(key: &str) -> Option<Role> {
    match key {
        "programmer" | "PROGRAMMER" => Some(Role::Programmer),
        "qas" | "QA" => Some(Role::Qa),
        "projectManager" | "projectManagers" | "PROJECT_MANAGER" => Some(Role::ProjectManager),
        "projectLead" | "projectLeads" | "PROJECT_LEAD" => Some(Role::ProjectLead),
        other => role_for_column(other),
    }
}
