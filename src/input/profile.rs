use std::io::BufRead;
use std::path::Path;

use crate::input::{InputError, open_maybe_gz};

/// One row of a MetaPhlAn report: hierarchical clade label, NCBI taxonomy id
/// path (pass-through only) and the observed relative abundance.
#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub clade_name: String,
    pub tax_id: Option<String>,
    pub rel_abundance: f64,
}

/// Parses a headerless tab-separated MetaPhlAn report. Lines starting with
/// `#` are comments. Each data line needs at least clade_name, tax_id and
/// rel_abundance; trailing columns (coverage, read counts) are ignored.
pub fn parse_profile(path: &Path) -> Result<Vec<ProfileRow>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut rows = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 3 {
            return Err(InputError::Parse {
                file: path.display().to_string(),
                line: line_no,
                message: format!(
                    "expected at least 3 columns (clade_name, tax_id, rel_abundance), got {}",
                    cols.len()
                ),
            });
        }
        let clade_name = cols[0].trim().to_string();
        let tax_id = {
            let raw = cols[1].trim();
            if raw.is_empty() {
                None
            } else {
                Some(raw.to_string())
            }
        };
        let rel_abundance = cols[2]
            .trim()
            .parse::<f64>()
            .map_err(|_| InputError::Parse {
                file: path.display().to_string(),
                line: line_no,
                message: format!("rel_abundance is not numeric: '{}'", cols[2].trim()),
            })?;
        rows.push(ProfileRow {
            clade_name,
            tax_id,
            rel_abundance,
        });
    }

    Ok(rows)
}
