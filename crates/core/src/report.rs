#![allow(missing_docs)]

//! Read-only report projection consumed by renderers.

use crate::model::{ProjectId, Resource, Role, StaffingModel};

/// Assignment count above which a resource is flagged as over-utilized.
pub const OVER_UTILIZED_THRESHOLD: usize = 3;

/// Placeholder shown for an empty bucket.
pub const EMPTY_BUCKET: &str = "N/A";

/// Resolved roster for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSection {
    pub id: ProjectId,
    pub name: String,
    /// Names per role in bucket order; every role is present.
    pub roster: Vec<(Role, Vec<String>)>,
}

impl ProjectSection {
    /// Names assigned under `role`.
    pub fn names(&self, role: Role) -> &[String] {
        self.roster
            .iter()
            .find(|(candidate, _)| *candidate == role)
            .map(|(_, names)| names.as_slice())
            .unwrap_or(&[])
    }

    /// Names joined for display, or [`EMPTY_BUCKET`].
    pub fn display(&self, role: Role) -> String {
        let names = self.names(role);
        if names.is_empty() {
            EMPTY_BUCKET.to_string()
        } else {
            names.join(", ")
        }
    }

    /// The designated manager: first entry of the project manager bucket.
    pub fn manager(&self) -> Option<&str> {
        self.names(Role::ProjectManager).first().map(String::as_str)
    }

    /// The designated lead: first entry of the project lead bucket.
    pub fn lead(&self) -> Option<&str> {
        self.names(Role::ProjectLead).first().map(String::as_str)
    }

    /// Programmers and QA paired row by row; the shorter side is padded
    /// with `None`.
    pub fn paired_rows(&self) -> Vec<(Option<&str>, Option<&str>)> {
        let programmers = self.names(Role::Programmer);
        let qa = self.names(Role::Qa);
        (0..programmers.len().max(qa.len()))
            .map(|index| {
                (
                    programmers.get(index).map(String::as_str),
                    qa.get(index).map(String::as_str),
                )
            })
            .collect()
    }
}

/// A resource together with its assignment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilizationEntry {
    pub resource: Resource,
    pub count: usize,
}

/// Summary view derived from the current model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub sections: Vec<ProjectSection>,
    /// Sorted by descending count; ties keep resource order.
    pub over_utilized: Vec<UtilizationEntry>,
    pub unassigned: Vec<Resource>,
}

impl Report {
    /// Project `model` with the default threshold.
    pub fn project(model: &StaffingModel) -> Self {
        Self::project_with(model, OVER_UTILIZED_THRESHOLD)
    }

    /// Project `model`, flagging resources with more than `threshold`
    /// assignments.
    pub fn project_with(model: &StaffingModel, threshold: usize) -> Self {
        let sections = model
            .projects()
            .iter()
            .map(|project| ProjectSection {
                id: project.id.clone(),
                name: project.name.clone(),
                roster: Role::ALL
                    .into_iter()
                    .map(|role| {
                        let names = model
                            .bucket(&project.id, role)
                            .into_iter()
                            .map(|resource| resource.name.clone())
                            .collect();
                        (role, names)
                    })
                    .collect(),
            })
            .collect();

        let counts = model.assignment_counts();
        let mut unassigned = Vec::new();
        let mut over_utilized = Vec::new();
        for resource in model.resources() {
            let count = counts.get(&resource.id).copied().unwrap_or(0);
            if count == 0 {
                unassigned.push(resource.clone());
            } else if count > threshold {
                over_utilized.push(UtilizationEntry {
                    resource: resource.clone(),
                    count,
                });
            }
        }
        over_utilized.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            sections,
            over_utilized,
            unassigned,
        }
    }
}

/// Report generation gate: unassigned resources need an explicit go-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportGate {
    Ready(Report),
    NeedsConfirmation(Report),
}

impl ReportGate {
    pub fn new(report: Report) -> Self {
        if report.unassigned.is_empty() {
            ReportGate::Ready(report)
        } else {
            ReportGate::NeedsConfirmation(report)
        }
    }

    /// Proceed past the gate.
    pub fn confirm(self) -> Report {
        match self {
            ReportGate::Ready(report) | ReportGate::NeedsConfirmation(report) => report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{apply_move, MoveRequest},
        import::{ImportResolver, RawTable},
        model::ResourceId,
    };
    use anyhow::Result;

    fn model() -> Result<StaffingModel> {
        let table = RawTable::parse(
            "projects,programmers,qa,pm,project_lead\n\
             Apollo,Alice,Bob,Dan,\n\
             Apollo,Carol,,,\n\
             Gemini,Alice,,,\n\
             Mercury,Alice,Alice,,\n\
             Vostok,Bob,Bob,,\n\
             ,Erin,,,\n",
            ',',
        );
        Ok(ImportResolver::default().resolve(&table)?)
    }

    #[test]
    fn sections_follow_project_order() -> Result<()> {
        let report = Report::project(&model()?);
        let names: Vec<&str> = report.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Apollo", "Gemini", "Mercury", "Vostok"]);

        let apollo = &report.sections[0];
        assert_eq!(apollo.names(Role::Programmer), &["Alice", "Carol"]);
        assert_eq!(apollo.display(Role::Qa), "Bob");
        assert_eq!(apollo.display(Role::ProjectLead), EMPTY_BUCKET);
        assert_eq!(apollo.manager(), Some("Dan"));
        assert_eq!(apollo.lead(), None);
        assert_eq!(
            apollo.paired_rows(),
            vec![(Some("Alice"), Some("Bob")), (Some("Carol"), None)]
        );
        Ok(())
    }

    #[test]
    fn flags_unassigned_and_over_utilized() -> Result<()> {
        let report = Report::project(&model()?);
        let unassigned: Vec<&str> = report.unassigned.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(unassigned, vec!["Erin"]);

        // Alice: Apollo, Gemini, Mercury programmer + Mercury QA = 4.
        assert_eq!(report.over_utilized.len(), 1);
        assert_eq!(report.over_utilized[0].resource.name, "Alice");
        assert_eq!(report.over_utilized[0].count, 4);
        Ok(())
    }

    #[test]
    fn over_utilized_sorted_descending() -> Result<()> {
        let report = Report::project_with(&model()?, 1);
        let ranked: Vec<(&str, usize)> = report
            .over_utilized
            .iter()
            .map(|entry| (entry.resource.name.as_str(), entry.count))
            .collect();
        assert_eq!(ranked, vec![("Alice", 4), ("Bob", 3)]);
        Ok(())
    }

    #[test]
    fn gate_requires_confirmation_only_with_gaps() -> Result<()> {
        let model = model()?;
        let gate = ReportGate::new(Report::project(&model));
        assert!(matches!(gate, ReportGate::NeedsConfirmation(_)));

        let staffed = apply_move(
            &model,
            &MoveRequest::assign(
                ResourceId::from_raw("erin"),
                Role::Programmer,
                crate::model::ProjectId::from_raw("vostok"),
            ),
        );
        let gate = ReportGate::new(Report::project(&staffed));
        assert!(matches!(gate, ReportGate::Ready(_)));
        assert!(gate.confirm().unassigned.is_empty());
        Ok(())
    }
}
