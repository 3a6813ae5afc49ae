use std::io::BufRead;
use std::path::Path;

use tracing::warn;

use crate::input::{InputError, open_maybe_gz};

const TAXA_COLUMN: &str = "taxa_name";

/// Loads the coefficient-derived taxa list: a tab-separated table whose
/// `taxa_name` column carries hierarchical clade labels. Other columns
/// (coefficients) are ignored by this tool.
pub fn parse_coef_taxa(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse {
            file: path.display().to_string(),
            line: 1,
            message: "coefficient file is empty".to_string(),
        });
    }
    let header: Vec<String> = buf
        .trim_end()
        .split('\t')
        .map(|s| s.trim().to_string())
        .collect();
    let taxa_col = header
        .iter()
        .position(|name| name.to_ascii_lowercase() == TAXA_COLUMN)
        .ok_or_else(|| InputError::MissingColumn {
            file: path.display().to_string(),
            column: TAXA_COLUMN.to_string(),
        })?;

    let mut taxa = Vec::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let Some(raw) = fields.get(taxa_col) else {
            warn!(
                "coefficient line has no {} column; skipping (line {})",
                TAXA_COLUMN, line_no
            );
            continue;
        };
        let name = raw.trim();
        if name.is_empty() {
            warn!("coefficient line has empty taxon; skipping (line {})", line_no);
            continue;
        }
        taxa.push(name.to_string());
    }

    Ok(taxa)
}
