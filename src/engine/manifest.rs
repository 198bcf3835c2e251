//! Manifest parsing for verify mode. One record per line: `<algorithm> <digest-hex> <path>`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::HashpipeError;

/// One line of a manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Algorithm name as written; validated per item by the worker.
    pub algorithm: String,
    pub digest_hex: String,
    pub path: String,
}

impl ManifestRecord {
    /// Render as a manifest line (no trailing newline). Same layout as named hash-mode output.
    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.algorithm, self.digest_hex, self.path)
    }
}

/// Parse a single line. Exactly three non-empty fields separated by single spaces.
/// `line_no` is 1-based and only used for the error.
pub fn parse_manifest_line(line: &str, line_no: usize) -> Result<ManifestRecord, HashpipeError> {
    let malformed = || HashpipeError::ManifestParse {
        line: line_no,
        content: line.to_string(),
    };
    let fields: Vec<&str> = line.split(' ').collect();
    let [algorithm, digest_hex, path] = fields.as_slice() else {
        return Err(malformed());
    };
    if algorithm.is_empty() || digest_hex.is_empty() || path.is_empty() {
        return Err(malformed());
    }
    Ok(ManifestRecord {
        algorithm: algorithm.to_string(),
        digest_hex: digest_hex.to_string(),
        path: path.to_string(),
    })
}

/// Parse a whole manifest. The first malformed line fails the whole manifest.
///
/// Two relaxations of the strict three-field rule: empty lines (such as a trailing blank
/// line) are skipped rather than rejected, and a trailing `\r` is stripped so CRLF
/// manifests parse. Every other line must be exactly `<algorithm> <digest-hex> <path>`.
pub fn parse_manifest<R: BufRead>(reader: R) -> Result<Vec<ManifestRecord>, HashpipeError> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| HashpipeError::ManifestRead {
            path: "<stream>".into(),
            source,
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }
        records.push(parse_manifest_line(line, i + 1)?);
    }
    Ok(records)
}

/// Open and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestRecord>, HashpipeError> {
    let file = File::open(path).map_err(|source| HashpipeError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_manifest(BufReader::new(file)).map_err(|e| match e {
        HashpipeError::ManifestRead { source, .. } => HashpipeError::ManifestRead {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!("{}: {} manifest records", path.display(), records.len());
    Ok(records)
}
