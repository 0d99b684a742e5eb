//! Keyboard pick-up/drop gestures translated into move requests.

use staffboard_core::{MoveRequest, ProjectId, ResourceId, Role};

/// A resource picked up and not yet dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Held {
    pub resource: ResourceId,
    pub name: String,
    pub role: Role,
    /// Project the resource was picked up from; `None` for the pool.
    pub source: Option<ProjectId>,
}

/// Where a held resource is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropZone {
    /// A role slot on a project roster.
    Project { project: ProjectId, role: Role },
    /// The unassigned pool currently shown for `role`.
    Pool { role: Role },
}

impl Held {
    /// Build the request the engine receives for dropping onto `zone`.
    pub fn drop_on(&self, zone: &DropZone) -> MoveRequest {
        let (target_project, target_role) = match zone {
            DropZone::Project { project, role } => (Some(project.clone()), *role),
            DropZone::Pool { role } => (None, *role),
        };
        MoveRequest {
            resource_id: self.resource.clone(),
            dragged_role: self.role,
            source_project: self.source.clone(),
            target_project,
            target_role,
        }
    }
}
