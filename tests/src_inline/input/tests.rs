use std::fs;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::InputError;
use super::coef::parse_coef_taxa;
use super::profile::parse_profile;
use super::refdb::load_refdb;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("marker_map_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let file = File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

const PROFILE: &str = "\
#mpa_vJan21_CHOCOPhlAnSGB_202103\n\
k__Bacteria\t2\t98.5\t0.9\t12345\n\
k__Bacteria|p__Firmicutes\t2|1239\t80.25\t0.8\t10000\n\
k__Bacteria|p__Firmicutes|g__Blautia|s__Blautia_wexlerae\t2|1239|572511|187327\t45.5\t0.4\t5000\n";

#[test]
fn test_parse_profile_basic() {
    let dir = make_temp_dir();
    let path = dir.join("S1_metaphlan.txt");
    write_file(&path, PROFILE);

    let rows = parse_profile(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].clade_name, "k__Bacteria");
    assert_eq!(rows[0].tax_id.as_deref(), Some("2"));
    assert_eq!(rows[0].rel_abundance, 98.5);
    assert_eq!(
        rows[2].clade_name,
        "k__Bacteria|p__Firmicutes|g__Blautia|s__Blautia_wexlerae"
    );
    assert_eq!(rows[2].rel_abundance, 45.5);
}

#[test]
fn test_parse_profile_gz() {
    let dir = make_temp_dir();
    let path = dir.join("S1_metaphlan.txt.gz");
    write_gz(&path, PROFILE);

    let rows = parse_profile(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].rel_abundance, 80.25);
}

#[test]
fn test_parse_profile_too_few_columns() {
    let dir = make_temp_dir();
    let path = dir.join("broken.txt");
    write_file(&path, "k__Bacteria\t98.5\n");

    let err = parse_profile(&path).unwrap_err();
    assert!(matches!(err, InputError::Parse { line: 1, .. }));
    assert!(err.to_string().contains("columns"));
}

#[test]
fn test_parse_profile_non_numeric_abundance() {
    let dir = make_temp_dir();
    let path = dir.join("broken.txt");
    write_file(&path, "k__Bacteria\t2\thigh\n");

    let err = parse_profile(&path).unwrap_err();
    assert!(matches!(err, InputError::Parse { line: 1, .. }));
    assert!(err.to_string().contains("rel_abundance"));
}

#[test]
fn test_parse_profile_empty_tax_id() {
    let dir = make_temp_dir();
    let path = dir.join("S1_metaphlan.txt");
    write_file(&path, "k__Bacteria\t\t98.5\n");

    let rows = parse_profile(&path).unwrap();
    assert_eq!(rows[0].tax_id, None);
}

#[test]
fn test_parse_coef_taxa() {
    let dir = make_temp_dir();
    let path = dir.join("S1_taxa.txt");
    write_file(
        &path,
        "taxa_name\tcoefficient\n\
         k__Bacteria|g__Blautia|s__Blautia_wexlerae\t0.52\n\
         \n\
         k__Bacteria|g__Dorea|s__Dorea_formicigenerans\t-0.13\n",
    );

    let taxa = parse_coef_taxa(&path).unwrap();
    assert_eq!(
        taxa,
        vec![
            "k__Bacteria|g__Blautia|s__Blautia_wexlerae".to_string(),
            "k__Bacteria|g__Dorea|s__Dorea_formicigenerans".to_string(),
        ]
    );
}

#[test]
fn test_parse_coef_taxa_missing_column() {
    let dir = make_temp_dir();
    let path = dir.join("S1_taxa.txt");
    write_file(&path, "taxon\tcoefficient\nk__Bacteria|s__X\t0.5\n");

    let err = parse_coef_taxa(&path).unwrap_err();
    assert!(matches!(err, InputError::MissingColumn { .. }));
    assert!(err.to_string().contains("taxa_name"));
}

#[test]
fn test_parse_coef_taxa_empty_file() {
    let dir = make_temp_dir();
    let path = dir.join("empty.txt");
    write_file(&path, "");

    let err = parse_coef_taxa(&path).unwrap_err();
    assert!(matches!(err, InputError::Parse { .. }));
}

#[test]
fn test_load_refdb_lookup() {
    let dir = make_temp_dir();
    let path = dir.join("gmrepo.csv");
    write_file(
        &path,
        "Taxon,mean,median,prevalence\n\
         Blautia_wexlerae,0.41,0.35,0.9\n\
         Dorea_formicigenerans,0.12,0.1,0.7\n",
    );

    let db = load_refdb(&path).unwrap();
    assert_eq!(db.len(), 2);
    let stats = db.lookup("Blautia_wexlerae").unwrap();
    assert_eq!(stats.mean, 0.41);
    assert_eq!(stats.median, 0.35);
    assert!(!db.contains("Blautia"));
}

#[test]
fn test_load_refdb_missing_taxon_column() {
    let dir = make_temp_dir();
    let path = dir.join("gmrepo.csv");
    write_file(&path, "species,mean,median\nBlautia_wexlerae,0.41,0.35\n");

    let err = load_refdb(&path).unwrap_err();
    assert!(matches!(err, InputError::MissingColumn { .. }));
    assert!(err.to_string().contains("Taxon"));
}

#[test]
fn test_load_refdb_missing_median_column() {
    let dir = make_temp_dir();
    let path = dir.join("gmrepo.csv");
    write_file(&path, "Taxon,mean\nBlautia_wexlerae,0.41\n");

    let err = load_refdb(&path).unwrap_err();
    assert!(err.to_string().contains("median"));
}

#[test]
fn test_load_refdb_duplicate_keeps_first() {
    let dir = make_temp_dir();
    let path = dir.join("gmrepo.csv");
    write_file(
        &path,
        "Taxon,mean,median\n\
         Blautia_wexlerae,0.41,0.35\n\
         Blautia_wexlerae,0.99,0.99\n",
    );

    let db = load_refdb(&path).unwrap();
    assert_eq!(db.len(), 1);
    assert_eq!(db.lookup("Blautia_wexlerae").unwrap().mean, 0.41);
}

#[test]
fn test_load_refdb_skips_non_numeric_rows() {
    let dir = make_temp_dir();
    let path = dir.join("gmrepo.csv");
    write_file(
        &path,
        "Taxon,mean,median\n\
         Blautia_wexlerae,n/a,0.35\n\
         Dorea_formicigenerans,0.12,0.1\n",
    );

    let db = load_refdb(&path).unwrap();
    assert_eq!(db.len(), 1);
    assert!(!db.contains("Blautia_wexlerae"));
}

#[test]
fn test_open_maybe_gz_plain_and_gz_agree() {
    let dir = make_temp_dir();
    let plain = dir.join("data.txt");
    let gz = dir.join("data.txt.gz");
    write_file(&plain, "a\tb\n");
    write_gz(&gz, "a\tb\n");

    let mut from_plain = String::new();
    super::open_maybe_gz(&plain)
        .unwrap()
        .read_to_string(&mut from_plain)
        .unwrap();
    let mut from_gz = String::new();
    super::open_maybe_gz(&gz)
        .unwrap()
        .read_to_string(&mut from_gz)
        .unwrap();
    assert_eq!(from_plain, from_gz);
}
