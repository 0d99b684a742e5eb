use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::ImportError,
    model::{Project, Resource, Role, StaffingModel},
};

use super::table::{RawRow, RawTable};

/// Header name carrying the project for a row.
pub const PROJECT_COLUMN: &str = "projects";

/// Columns the strict schema requires in the header.
pub const STRICT_REQUIRED_COLUMNS: [&str; 4] = [PROJECT_COLUMN, "programmers", "qa", "pm"];

/// How strictly the header is validated before resolving rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSchema {
    /// Any non-empty header is accepted.
    #[default]
    Lenient,
    /// Every column in [`STRICT_REQUIRED_COLUMNS`] must be declared.
    Strict,
}

/// Map a header name to the role it carries people for.
pub fn role_for_column(column: &str) -> Option<Role> {
    match column.trim().to_lowercase().as_str() {
        "programmers" => Some(Role::Programmer),
        "qa" => Some(Role::Qa),
        "pm" | "project_manager" => Some(Role::ProjectManager),
        "project_leads" | "project_lead" => Some(Role::ProjectLead),
        _ => None,
    }
}

/// Turns raw tabular rows into a populated [`StaffingModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportResolver {
    schema: ImportSchema,
}

impl ImportResolver {
    /// Resolver validating headers against `schema`.
    pub fn new(schema: ImportSchema) -> Self {
        Self { schema }
    }

    /// Build a fresh model from `table`.
    ///
    /// Resources and projects are deduplicated by derived id across the
    /// whole table; assignments are appended idempotently in row order.
    pub fn resolve(&self, table: &RawTable) -> Result<StaffingModel, ImportError> {
        if !table.has_header() {
            return Err(ImportError::MissingHeader);
        }
        if self.schema == ImportSchema::Strict {
            let declared: Vec<String> = table
                .header()
                .iter()
                .map(|column| column.trim().to_lowercase())
                .collect();
            let missing: Vec<String> = STRICT_REQUIRED_COLUMNS
                .iter()
                .filter(|required| !declared.iter().any(|column| column == *required))
                .map(|required| required.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(ImportError::MissingColumns { missing });
            }
        }

        let mut model = StaffingModel::new();
        let mut skipped = 0usize;
        for (index, row) in table.rows().iter().enumerate() {
            if !resolve_row(&mut model, row) {
                warn!(row = index + 1, "row has no projects column; skipped");
                skipped += 1;
            }
        }

        info!(
            rows = table.rows().len(),
            skipped,
            resources = model.resources().len(),
            projects = model.projects().len(),
            assignments = model.assignment_total(),
            "import resolved"
        );
        Ok(model)
    }
}

/// Apply one row to `model`. Returns `false` when the row was skipped.
fn resolve_row(model: &mut StaffingModel, row: &RawRow) -> bool {
    let mut project_value = None;
    let mut people = Vec::new();
    for (column, value) in row {
        let column = column.trim().to_lowercase();
        if column == PROJECT_COLUMN {
            project_value = Some(value.as_str());
        } else if let Some(role) = role_for_column(&column) {
            people.push((role, column, value.as_str()));
        }
    }

    let Some(project_value) = project_value else {
        return false;
    };

    // Row maps are unordered; pools fill in role order.
    people.sort();

    let project = Project::from_name(project_value);
    if let Some(project) = project.clone() {
        model.register_project(project);
    }

    for (role, _, value) in people {
        let Some(resource) = Resource::from_name(value) else {
            continue;
        };
        if let Some(project) = project.as_ref() {
            model
                .assignments_mut()
                .insert(&project.id, role, &resource.id);
        }
        model.register_resource(role, resource);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectId, ResourceId};
    use anyhow::Result;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn header(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|column| column.to_string()).collect()
    }

    fn ids(model: &StaffingModel, project: &str, role: Role) -> Vec<String> {
        model
            .assignments()
            .bucket(&ProjectId::from_name(project).unwrap(), role)
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn resolves_apollo_scenario() -> Result<()> {
        let table = RawTable::new(
            header(&["projects", "programmers", "qa"]),
            vec![
                row(&[("projects", "Apollo"), ("programmers", "Alice"), ("qa", "Bob")]),
                row(&[("projects", "Apollo"), ("programmers", "Carol")]),
            ],
        );
        let model = ImportResolver::default().resolve(&table)?;

        let names: Vec<&str> = model.resources().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol", "Bob"]);
        assert_eq!(model.projects().len(), 1);
        assert_eq!(model.projects()[0].name, "Apollo");
        assert_eq!(ids(&model, "Apollo", Role::Programmer), vec!["alice", "carol"]);
        assert_eq!(ids(&model, "Apollo", Role::Qa), vec!["bob"]);
        assert!(ids(&model, "Apollo", Role::ProjectLead).is_empty());
        Ok(())
    }

    #[test]
    fn names_differing_by_case_and_spacing_merge() -> Result<()> {
        let table = RawTable::parse(
            "PROJECTS,Programmers,PM\nApollo,Mary  Ann,Dan\n apollo ,mary ann,dan\n",
            ',',
        );
        let model = ImportResolver::default().resolve(&table)?;

        assert_eq!(model.projects().len(), 1);
        assert_eq!(model.pool(Role::Programmer).len(), 1);
        assert_eq!(model.pool(Role::Programmer)[0].name, "Mary  Ann");
        assert_eq!(ids(&model, "Apollo", Role::Programmer), vec!["mary-ann"]);
        assert_eq!(ids(&model, "Apollo", Role::ProjectManager), vec!["dan"]);
        Ok(())
    }

    #[test]
    fn lead_and_manager_aliases_are_recognised() -> Result<()> {
        let table = RawTable::parse(
            "project_lead,project_manager,projects\nLena,Max,Apollo\n",
            ',',
        );
        let model = ImportResolver::default().resolve(&table)?;
        assert_eq!(ids(&model, "Apollo", Role::ProjectLead), vec!["lena"]);
        assert_eq!(ids(&model, "Apollo", Role::ProjectManager), vec!["max"]);
        Ok(())
    }

    #[test]
    fn empty_project_contributes_only_resources() -> Result<()> {
        let table = RawTable::parse("projects,programmers,qa\n,Alice,Bob\n", ',');
        let model = ImportResolver::default().resolve(&table)?;
        assert!(model.projects().is_empty());
        assert_eq!(model.resources().len(), 2);
        assert_eq!(model.assignment_total(), 0);
        Ok(())
    }

    #[test]
    fn rows_without_project_column_are_skipped() -> Result<()> {
        let table = RawTable::parse("programmers,qa\nAlice,Bob\n", ',');
        let model = ImportResolver::default().resolve(&table)?;
        assert!(model.resources().is_empty());
        assert!(model.projects().is_empty());
        Ok(())
    }

    #[test]
    fn skipped_rows_are_logged_as_warnings() -> Result<()> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || LogBuffer(writer.clone()))
            .finish();

        let table = RawTable::parse("programmers,qa\nAlice,Bob\n", ',');
        tracing::subscriber::with_default(subscriber, || {
            ImportResolver::default().resolve(&table)
        })?;

        let logged = String::from_utf8(buffer.lock().unwrap().clone())?;
        assert!(logged.contains("WARN"), "log output: {logged}");
        assert!(logged.contains("row has no projects column"));
        Ok(())
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = ImportResolver::default()
            .resolve(&RawTable::parse("", ','))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader));
    }

    #[test]
    fn strict_schema_requires_fixed_columns() {
        let table = RawTable::parse("projects,programmers\nApollo,Alice\n", ',');
        let err = ImportResolver::new(ImportSchema::Strict)
            .resolve(&table)
            .unwrap_err();
        match err {
            ImportError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["qa".to_string(), "pm".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }

        let table = RawTable::parse("PM,qa,Programmers,projects\nDan,Bob,Alice,Apollo\n", ',');
        let model = ImportResolver::new(ImportSchema::Strict)
            .resolve(&table)
            .expect("strict header satisfied");
        assert!(model
            .resource(&ResourceId::from_name("dan").unwrap())
            .is_some());
    }
}
