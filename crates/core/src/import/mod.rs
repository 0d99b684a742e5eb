//! Tabular import: the raw delimited-text reader and the resolver that
//! builds a staffing model from its rows.

mod resolver;
mod table;

pub use resolver::{
    role_for_column, ImportResolver, ImportSchema, PROJECT_COLUMN, STRICT_REQUIRED_COLUMNS,
};
pub use table::{RawRow, RawTable};
