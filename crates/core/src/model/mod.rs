#![allow(missing_docs)]

//! Entity model: resources, projects and the assignment table.

mod ids;
mod table;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub use ids::{derive_id, ProjectId, ResourceId};
pub use table::{AssignmentTable, RoleBuckets};

/// Capacity in which a resource is attached to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Software developer.
    Programmer,
    /// Quality assurance engineer.
    Qa,
    /// Project manager.
    ProjectManager,
    /// Project lead.
    ProjectLead,
}

impl Role {
    /// Every role in display order.
    pub const ALL: [Role; 4] = [
        Role::Programmer,
        Role::Qa,
        Role::ProjectManager,
        Role::ProjectLead,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Role::Programmer => "Programmer",
            Role::Qa => "QA",
            Role::ProjectManager => "Project Manager",
            Role::ProjectLead => "Project Lead",
        }
    }

    /// Plural label used for pool headings.
    pub fn pool_label(self) -> &'static str {
        match self {
            Role::Programmer => "Programmers",
            Role::Qa => "QA",
            Role::ProjectManager => "Project Managers",
            Role::ProjectLead => "Project Leads",
        }
    }
}

/// A person, identified by a name-derived id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Slug derived from `name`.
    pub id: ResourceId,
    /// Display name as first seen.
    pub name: String,
}

impl Resource {
    /// Build a resource from a display name, or `None` when the name is blank.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let id = ResourceId::from_name(name)?;
        Some(Self {
            id,
            name: name.to_string(),
        })
    }
}

/// A project, identified by a name-derived id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Slug derived from `name`.
    pub id: ProjectId,
    /// Display name as first seen.
    pub name: String,
}

impl Project {
    /// Build a project from a display name, or `None` when the name is blank.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let id = ProjectId::from_name(name)?;
        Some(Self {
            id,
            name: name.to_string(),
        })
    }
}

/// The full in-memory staffing model.
///
/// Resources live in one pool per role; the same resource id may sit in
/// several pools. Projects keep import order, which is also display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffingModel {
    pools: BTreeMap<Role, Vec<Resource>>,
    projects: Vec<Project>,
    assignments: AssignmentTable,
}

impl StaffingModel {
    /// Empty model with every pool present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource in the pool for `role`. Returns `false` when the
    /// id is already in that pool.
    pub fn register_resource(&mut self, role: Role, resource: Resource) -> bool {
        let pool = self.pools.entry(role).or_default();
        if pool.iter().any(|existing| existing.id == resource.id) {
            return false;
        }
        pool.push(resource);
        true
    }

    /// Register a project and give it an empty bucket for every role.
    /// Returns `false` when a project with the same id already exists.
    pub fn register_project(&mut self, project: Project) -> bool {
        if self.project(&project.id).is_some() {
            return false;
        }
        self.assignments.ensure_project(&project.id);
        self.projects.push(project);
        true
    }

    /// Resources registered in the pool for `role`, in registration order.
    pub fn pool(&self, role: Role) -> &[Resource] {
        self.pools.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every distinct resource across all pools, first occurrence wins.
    pub fn resources(&self) -> Vec<&Resource> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for role in Role::ALL {
            for resource in self.pool(role) {
                if seen.insert(&resource.id) {
                    result.push(resource);
                }
            }
        }
        result
    }

    pub fn resource(&self, id: &ResourceId) -> Option<&Resource> {
        Role::ALL
            .iter()
            .flat_map(|role| self.pool(*role))
            .find(|resource| &resource.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| &project.id == id)
    }

    pub fn assignments(&self) -> &AssignmentTable {
        &self.assignments
    }

    pub(crate) fn assignments_mut(&mut self) -> &mut AssignmentTable {
        &mut self.assignments
    }

    /// Resource ids in the `(project, role)` bucket that still resolve to a
    /// known resource.
    pub fn bucket(&self, project: &ProjectId, role: Role) -> Vec<&Resource> {
        self.assignments
            .bucket(project, role)
            .iter()
            .filter_map(|id| self.resource(id))
            .collect()
    }

    /// Roles whose pool contains `id`.
    pub fn roles_of(&self, id: &ResourceId) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.pool(*role).iter().any(|resource| &resource.id == id))
            .collect()
    }

    /// Number of `(project, role)` buckets containing each known resource.
    ///
    /// Always derived from the current table; every known resource has an
    /// entry, including those with a count of zero.
    pub fn assignment_counts(&self) -> HashMap<ResourceId, usize> {
        let mut counts: HashMap<ResourceId, usize> = self
            .resources()
            .into_iter()
            .map(|resource| (resource.id.clone(), 0))
            .collect();
        for (_, buckets) in self.assignments.iter() {
            for (_, ids) in buckets.iter() {
                for id in ids {
                    if let Some(count) = counts.get_mut(id) {
                        *count += 1;
                    }
                }
            }
        }
        counts
    }

    /// Assignment count for a single resource.
    pub fn assignment_count(&self, id: &ResourceId) -> usize {
        self.assignments
            .iter()
            .flat_map(|(_, buckets)| buckets.iter())
            .filter(|(_, ids)| ids.contains(id))
            .count()
    }

    /// Total number of assignment facts in the table.
    pub fn assignment_total(&self) -> usize {
        self.assignments
            .iter()
            .flat_map(|(_, buckets)| buckets.iter())
            .map(|(_, ids)| ids.len())
            .sum()
    }
}
