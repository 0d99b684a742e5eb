#![warn(clippy::all, missing_docs)]

//! Core domain logic for staffboard.
//!
//! This crate hosts the staffing model, the sheet importer, the
//! assignment engine that applies move requests, snapshot persistence
//! and the report projection used by the terminal UI and any future
//! frontends.

pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod model;
pub mod report;
pub mod session;
pub mod snapshot;

pub use config::AppConfig;
pub use engine::{apply_move, InvalidMove, MoveOutcome, MoveRequest};
pub use error::{ImportError, SnapshotError};
pub use import::{ImportResolver, ImportSchema, RawTable};
pub use model::{Project, ProjectId, Resource, ResourceId, Role, StaffingModel};
pub use report::{Report, ReportGate};
pub use session::StaffingSession;
