#![allow(missing_docs)]

//! Owner of the current staffing model.
//!
//! Import and snapshot restore build a complete model aside and swap it in
//! only on success, so a failure leaves the session exactly as it was.

use std::path::Path;

use tracing::info;

use crate::{
    engine::{self, MoveOutcome, MoveRequest},
    error::{ImportError, SnapshotError},
    import::{ImportResolver, RawTable},
    model::StaffingModel,
    report::{Report, ReportGate},
    snapshot::{self, BlobStore},
};

/// Number of transitions kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Single-owner holder of the current model with move history.
#[derive(Debug, Clone)]
pub struct StaffingSession {
    model: StaffingModel,
    undo: Vec<StaffingModel>,
    redo: Vec<StaffingModel>,
    history_limit: usize,
}

impl Default for StaffingSession {
    fn default() -> Self {
        Self::new(StaffingModel::new())
    }
}

impl StaffingSession {
    pub fn new(model: StaffingModel) -> Self {
        Self {
            model,
            undo: Vec::new(),
            redo: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn model(&self) -> &StaffingModel {
        &self.model
    }

    /// Replace the model with one resolved from `table`.
    pub fn import(
        &mut self,
        resolver: &ImportResolver,
        table: &RawTable,
    ) -> Result<&StaffingModel, ImportError> {
        let model = resolver.resolve(table)?;
        self.replace(model);
        Ok(&self.model)
    }

    /// Read a delimited file and replace the model with its contents.
    pub fn import_file(
        &mut self,
        resolver: &ImportResolver,
        path: impl AsRef<Path>,
        delimiter: char,
    ) -> Result<&StaffingModel, ImportError> {
        let path = path.as_ref();
        let table = RawTable::read(path, delimiter)?;
        let model = resolver.resolve(&table)?;
        info!(path = %path.display(), "imported staffing sheet");
        self.replace(model);
        Ok(&self.model)
    }

    /// Replace the model with the stored snapshot. Returns `false` when the
    /// store holds nothing, leaving the model untouched.
    pub fn restore(&mut self, store: &dyn BlobStore) -> Result<bool, SnapshotError> {
        match snapshot::load(store)? {
            Some(model) => {
                info!(projects = model.projects().len(), "snapshot restored");
                self.replace(model);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the current model.
    pub fn persist(&self, store: &dyn BlobStore) -> Result<(), SnapshotError> {
        snapshot::save(store, &self.model)
    }

    /// Apply a move request. Only changing transitions enter the history.
    pub fn dispatch(&mut self, request: &MoveRequest) -> MoveOutcome {
        let transition = engine::transition(&self.model, request);
        if transition.outcome.changed() {
            let previous = std::mem::replace(&mut self.model, transition.model);
            self.push_undo(previous);
            self.redo.clear();
        }
        transition.outcome
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Step back one transition; `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.model, previous);
        self.redo.push(current);
        true
    }

    /// Re-apply an undone transition; `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.model, next);
        self.push_undo(current);
        true
    }

    pub fn report(&self, threshold: usize) -> Report {
        Report::project_with(&self.model, threshold)
    }

    pub fn report_gate(&self, threshold: usize) -> ReportGate {
        ReportGate::new(self.report(threshold))
    }

    fn replace(&mut self, model: StaffingModel) {
        self.model = model;
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, model: StaffingModel) {
        self.undo.push(model);
        if self.undo.len() > self.history_limit {
            let overflow = self.undo.len() - self.history_limit;
            self.undo.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ProjectId, ResourceId, Role},
        snapshot::{MemoryStore, STATE_KEY},
    };
    use anyhow::Result;

    fn apollo() -> RawTable {
        RawTable::parse(
            "projects,programmers,qa\nApollo,Alice,Bob\nApollo,Carol,\n",
            ',',
        )
    }

    fn alice_onto(project: &str) -> MoveRequest {
        MoveRequest::assign(
            ResourceId::from_raw("alice"),
            Role::Programmer,
            ProjectId::from_raw(project),
        )
    }

    #[test]
    fn failed_import_keeps_model() -> Result<()> {
        let mut session = StaffingSession::default();
        session.import(&ImportResolver::default(), &apollo())?;
        let before = session.model().clone();

        let err = session
            .import(&ImportResolver::default(), &RawTable::parse("", ','))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader));
        assert_eq!(session.model(), &before);
        Ok(())
    }

    #[test]
    fn failed_restore_keeps_model() -> Result<()> {
        let mut session = StaffingSession::default();
        session.import(&ImportResolver::default(), &apollo())?;
        let before = session.model().clone();

        let store = MemoryStore::new();
        assert!(!session.restore(&store)?);
        store.put(STATE_KEY, "{{{")?;
        assert!(session.restore(&store).is_err());
        assert_eq!(session.model(), &before);
        Ok(())
    }

    #[test]
    fn persist_and_restore_replace_wholesale() -> Result<()> {
        let store = MemoryStore::new();
        let mut saved = StaffingSession::default();
        saved.import(&ImportResolver::default(), &apollo())?;
        saved.persist(&store)?;

        let mut other = StaffingSession::default();
        other.import(
            &ImportResolver::default(),
            &RawTable::parse("projects,qa\nGemini,Zed\n", ','),
        )?;
        assert!(other.restore(&store)?);
        assert_eq!(other.model(), saved.model());
        assert!(!other.can_undo());
        Ok(())
    }

    #[test]
    fn dispatch_records_history() -> Result<()> {
        let mut session = StaffingSession::default();
        session.import(&ImportResolver::default(), &apollo())?;
        let imported = session.model().clone();

        // Already present: no history entry.
        assert_eq!(session.dispatch(&alice_onto("apollo")), MoveOutcome::AlreadyAssigned);
        assert!(!session.can_undo());

        let removal = MoveRequest::unassign(
            ResourceId::from_raw("alice"),
            Role::Programmer,
            ProjectId::from_raw("apollo"),
        );
        assert!(session.dispatch(&removal).changed());
        let removed = session.model().clone();

        assert!(session.undo());
        assert_eq!(session.model(), &imported);
        assert!(session.redo());
        assert_eq!(session.model(), &removed);
        assert!(!session.redo());
        Ok(())
    }

    #[test]
    fn history_is_bounded() -> Result<()> {
        let mut session = StaffingSession::default().with_history_limit(1);
        session.import(&ImportResolver::default(), &apollo())?;
        let removal = MoveRequest::unassign(
            ResourceId::from_raw("alice"),
            Role::Programmer,
            ProjectId::from_raw("apollo"),
        );
        session.dispatch(&removal);
        session.dispatch(&alice_onto("apollo"));

        assert!(session.undo());
        assert!(!session.undo());
        Ok(())
    }

    #[test]
    fn import_file_reads_from_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("staff.csv");
        std::fs::write(&path, "projects;qa\nApollo;Bob\n")?;

        let mut session = StaffingSession::default();
        session.import_file(&ImportResolver::default(), &path, ';')?;
        assert_eq!(session.model().projects().len(), 1);
        assert!(session.report(3).unassigned.is_empty());
        Ok(())
    }
}
