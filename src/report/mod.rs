use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::pipeline::RunSummary;
use crate::pipeline::reconcile::MarkerRecord;

pub const TABLE_HEADER: &str = "sample\tspecies\tuser_abundance\tdb_median\tdb_mean";
const NA: &str = "NA";

pub fn render_table(records: &[MarkerRecord]) -> String {
    let mut out = String::new();
    out.push_str(TABLE_HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&record.sample);
        out.push('\t');
        out.push_str(&record.species);
        out.push('\t');
        out.push_str(&format_opt_3(record.user_abundance));
        out.push('\t');
        out.push_str(&format_opt_3(record.db_median));
        out.push('\t');
        out.push_str(&format_opt_3(record.db_mean));
        out.push('\n');
    }
    out
}

pub fn write_table(path: &Path, records: &[MarkerRecord]) -> std::io::Result<()> {
    write_text(path, &render_table(records))
}

pub fn render_summary(summary: &RunSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// Writes the fully rendered contents through a `.tmp` sibling and renames
/// it into place, so a failed run never leaves a truncated file behind.
pub fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = tmp_path(path);
    {
        let mut w = BufWriter::new(File::create(&tmp)?);
        w.write_all(contents.as_bytes())?;
        w.flush()?;
    }
    fs::rename(&tmp, path)
}

pub fn format_f64_3(value: f64) -> String {
    format!("{value:.3}")
}

fn format_opt_3(value: Option<f64>) -> String {
    match value {
        Some(v) => format_f64_3(v),
        None => NA.to_string(),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
