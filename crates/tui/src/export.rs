//! Markdown rendering of the staffing report.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use staffboard_core::{report::EMPTY_BUCKET, Report, Role};
use tracing::info;

/// Render `report` as Markdown. Empty over-utilized and unassigned tables
/// are omitted.
pub fn render_markdown(report: &Report, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Staffing Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "_Generated {}_", generated_at.format("%Y-%m-%d %H:%M"));

    for section in &report.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", section.name);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "**{}:** {}  ",
            Role::ProjectManager.label(),
            section.manager().unwrap_or(EMPTY_BUCKET)
        );
        let _ = writeln!(
            out,
            "**{}:** {}",
            Role::ProjectLead.label(),
            section.lead().unwrap_or(EMPTY_BUCKET)
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "| {} | {} |",
            Role::Programmer.pool_label(),
            Role::Qa.pool_label()
        );
        let _ = writeln!(out, "| --- | --- |");
        let rows = section.paired_rows();
        if rows.is_empty() {
            let _ = writeln!(out, "| {EMPTY_BUCKET} | {EMPTY_BUCKET} |");
        }
        for (programmer, qa) in rows {
            let _ = writeln!(
                out,
                "| {} | {} |",
                programmer.unwrap_or(""),
                qa.unwrap_or("")
            );
        }
    }

    if !report.over_utilized.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Over-utilized");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Resource | Assignments |");
        let _ = writeln!(out, "| --- | ---: |");
        for entry in &report.over_utilized {
            let _ = writeln!(out, "| {} | {} |", entry.resource.name, entry.count);
        }
    }

    if !report.unassigned.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Unassigned");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Resource |");
        let _ = writeln!(out, "| --- |");
        for resource in &report.unassigned {
            let _ = writeln!(out, "| {} |", resource.name);
        }
    }

    out
}

/// Write the rendered report into `dir` with a timestamped file name.
pub fn write_report(dir: &Path, report: &Report) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let now = Local::now();
    let path = dir.join(format!("staffing_{}.md", now.format("%Y%m%d%H%M%S")));
    fs::write(&path, render_markdown(report, now))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), sections = report.sections.len(), "report exported");
    Ok(path)
}
