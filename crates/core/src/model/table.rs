use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ProjectId, ResourceId, Role};

/// Ordered, duplicate-free resource ids per role for a single project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleBuckets(BTreeMap<Role, Vec<ResourceId>>);

impl RoleBuckets {
    /// Buckets with an empty entry for every role.
    pub fn empty() -> Self {
        Self(Role::ALL.into_iter().map(|role| (role, Vec::new())).collect())
    }

    pub fn get(&self, role: Role) -> &[ResourceId] {
        self.0.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, role: Role, id: &ResourceId) -> bool {
        self.get(role).contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &[ResourceId])> + '_ {
        self.0.iter().map(|(role, ids)| (*role, ids.as_slice()))
    }

    /// Append `id` to the bucket unless already present.
    pub(crate) fn insert(&mut self, role: Role, id: ResourceId) -> bool {
        let bucket = self.0.entry(role).or_default();
        if bucket.contains(&id) {
            return false;
        }
        bucket.push(id);
        true
    }

    pub(crate) fn remove(&mut self, role: Role, id: &ResourceId) -> bool {
        match self.0.get_mut(&role) {
            Some(bucket) => {
                let before = bucket.len();
                bucket.retain(|existing| existing != id);
                bucket.len() != before
            }
            None => false,
        }
    }
}

/// Mapping of project id to its role buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentTable(BTreeMap<ProjectId, RoleBuckets>);

impl AssignmentTable {
    pub fn project(&self, id: &ProjectId) -> Option<&RoleBuckets> {
        self.0.get(id)
    }

    /// Resource ids in the `(project, role)` bucket; empty for unknown projects.
    pub fn bucket(&self, project: &ProjectId, role: Role) -> &[ResourceId] {
        self.0
            .get(project)
            .map(|buckets| buckets.get(role))
            .unwrap_or(&[])
    }

    pub fn contains(&self, project: &ProjectId, role: Role, id: &ResourceId) -> bool {
        self.bucket(project, role).contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectId, &RoleBuckets)> + '_ {
        self.0.iter()
    }

    pub(crate) fn ensure_project(&mut self, project: &ProjectId) -> &mut RoleBuckets {
        self.0
            .entry(project.clone())
            .or_insert_with(RoleBuckets::empty)
    }

    /// Idempotent add of a `(project, role, resource)` fact.
    pub(crate) fn insert(&mut self, project: &ProjectId, role: Role, id: &ResourceId) -> bool {
        self.ensure_project(project).insert(role, id.clone())
    }

    pub(crate) fn remove(&mut self, project: &ProjectId, role: Role, id: &ResourceId) -> bool {
        self.0
            .get_mut(project)
            .map(|buckets| buckets.remove(role, id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent_and_ordered() {
        let mut table = AssignmentTable::default();
        let apollo = ProjectId::from_raw("apollo");
        let carol = ResourceId::from_raw("carol");
        let alice = ResourceId::from_raw("alice");

        assert!(table.insert(&apollo, Role::Programmer, &carol));
        assert!(table.insert(&apollo, Role::Programmer, &alice));
        assert!(!table.insert(&apollo, Role::Programmer, &carol));

        assert_eq!(
            table.bucket(&apollo, Role::Programmer),
            &[carol.clone(), alice.clone()]
        );
        assert!(table.bucket(&apollo, Role::Qa).is_empty());
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut table = AssignmentTable::default();
        let apollo = ProjectId::from_raw("apollo");
        let alice = ResourceId::from_raw("alice");
        table.insert(&apollo, Role::Qa, &alice);

        assert!(!table.remove(&apollo, Role::Programmer, &alice));
        assert!(table.remove(&apollo, Role::Qa, &alice));
        assert!(!table.remove(&apollo, Role::Qa, &alice));
        assert!(!table.remove(&ProjectId::from_raw("gemini"), Role::Qa, &alice));
    }
}
