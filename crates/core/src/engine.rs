#![allow(missing_docs)]

//! Assignment engine: validates move requests and derives the next model.
//!
//! Dropping a resource onto a project only adds it to the target bucket; the
//! source project keeps its assignment. Dropping back onto the unassigned
//! pool is the only way an assignment is removed.

use thiserror::Error;
use tracing::debug;

use crate::model::{ProjectId, ResourceId, Role, StaffingModel};

/// A single drag-and-drop gesture, expressed as data.
///
/// `None` for a project means the unassigned pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub resource_id: ResourceId,
    pub dragged_role: Role,
    pub source_project: Option<ProjectId>,
    pub target_project: Option<ProjectId>,
    pub target_role: Role,
}

impl MoveRequest {
    /// Drop a pooled resource onto `project` under `role`.
    pub fn assign(resource_id: ResourceId, role: Role, project: ProjectId) -> Self {
        Self {
            resource_id,
            dragged_role: role,
            source_project: None,
            target_project: Some(project),
            target_role: role,
        }
    }

    /// Drag a resource out of `project` back onto the unassigned pool.
    pub fn unassign(resource_id: ResourceId, role: Role, project: ProjectId) -> Self {
        Self {
            resource_id,
            dragged_role: role,
            source_project: Some(project),
            target_project: None,
            target_role: role,
        }
    }
}

/// Why a move request left the model untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("a {dragged:?} cannot be dropped into a {target:?} slot")]
    RoleMismatch { dragged: Role, target: Role },
    #[error("unknown resource '{0}'")]
    UnknownResource(ResourceId),
    #[error("unknown project '{0}'")]
    UnknownProject(ProjectId),
    #[error("'{resource}' is not assigned to '{project}' as {role:?}")]
    NotAssigned {
        resource: ResourceId,
        project: ProjectId,
        role: Role,
    },
    #[error("move names neither a target project nor a source project")]
    NoLocation,
}

/// What a request did to the assignment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Added {
        project: ProjectId,
        role: Role,
        resource: ResourceId,
    },
    Removed {
        project: ProjectId,
        role: Role,
        resource: ResourceId,
    },
    /// Valid request whose fact was already present.
    AlreadyAssigned,
    /// Rejected request; silently ignored by callers.
    Ignored(InvalidMove),
}

impl MoveOutcome {
    /// `true` when the resulting model differs from the input.
    pub fn changed(&self) -> bool {
        matches!(self, MoveOutcome::Added { .. } | MoveOutcome::Removed { .. })
    }
}

/// Result of applying a request: the next model and what happened.
#[derive(Debug, Clone)]
pub struct Transition {
    pub model: StaffingModel,
    pub outcome: MoveOutcome,
}

/// Apply `request` to `model`, returning the next model.
///
/// The input model is never modified; invalid requests yield an equal copy.
pub fn apply_move(model: &StaffingModel, request: &MoveRequest) -> StaffingModel {
    transition(model, request).model
}

/// Like [`apply_move`], also reporting the outcome.
pub fn transition(model: &StaffingModel, request: &MoveRequest) -> Transition {
    let outcome = plan(model, request);
    let mut next = model.clone();
    match &outcome {
        MoveOutcome::Added {
            project,
            role,
            resource,
        } => {
            next.assignments_mut().insert(project, *role, resource);
        }
        MoveOutcome::Removed {
            project,
            role,
            resource,
        } => {
            next.assignments_mut().remove(project, *role, resource);
        }
        MoveOutcome::AlreadyAssigned => {}
        MoveOutcome::Ignored(reason) => {
            debug!(resource = %request.resource_id, %reason, "move ignored");
        }
    }
    Transition {
        model: next,
        outcome,
    }
}

fn plan(model: &StaffingModel, request: &MoveRequest) -> MoveOutcome {
    if request.dragged_role != request.target_role {
        return MoveOutcome::Ignored(InvalidMove::RoleMismatch {
            dragged: request.dragged_role,
            target: request.target_role,
        });
    }
    let role = request.target_role;
    let resource = &request.resource_id;

    match (&request.target_project, &request.source_project) {
        (Some(target), _) => {
            if model.resource(resource).is_none() {
                return MoveOutcome::Ignored(InvalidMove::UnknownResource(resource.clone()));
            }
            if model.project(target).is_none() {
                return MoveOutcome::Ignored(InvalidMove::UnknownProject(target.clone()));
            }
            if model.assignments().contains(target, role, resource) {
                return MoveOutcome::AlreadyAssigned;
            }
            MoveOutcome::Added {
                project: target.clone(),
                role,
                resource: resource.clone(),
            }
        }
        (None, Some(source)) => {
            if !model.assignments().contains(source, role, resource) {
                return MoveOutcome::Ignored(InvalidMove::NotAssigned {
                    resource: resource.clone(),
                    project: source.clone(),
                    role,
                });
            }
            MoveOutcome::Removed {
                project: source.clone(),
                role,
                resource: resource.clone(),
            }
        }
        (None, None) => MoveOutcome::Ignored(InvalidMove::NoLocation),
    }
}
