//! Load `.hashpipe.toml` from the working directory. The CLI applies it; lib callers build a
//! PipelineConfig directly.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::engine::hashing::Algorithm;
use crate::error::HashpipeError;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct HashpipeToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    hash: Option<String>,
    jobs: Option<i64>,
    chunk_size: Option<usize>,
    keep_order: Option<bool>,
    strict: Option<bool>,
    verbose: Option<bool>,
}

/// Load the settings file from `dir` if present. A missing file is `Ok(None)`; a file that
/// exists but does not parse is a configuration error.
pub fn load_hashpipe_toml(dir: &Path) -> Result<Option<HashpipeToml>, HashpipeError> {
    let path = dir.join(PackagePaths::get().config_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    parse_hashpipe_toml(&s)
        .map(Some)
        .map_err(|e| HashpipeError::Config {
            path,
            message: e.to_string(),
        })
}

pub fn parse_hashpipe_toml(s: &str) -> Result<HashpipeToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($set:expr, $opts:expr, $set_field:ident => $opts_field:ident) => {
        if let Some(v) = $set.$set_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only set fields present in the file). Call before applying CLI.
/// An unknown algorithm in the file is an error, same as on the command line.
pub fn apply_file_to_opts(
    file: &HashpipeToml,
    opts: &mut Opts,
) -> Result<(), HashpipeError> {
    let set = &file.settings;
    if let Some(ref name) = set.hash {
        opts.algorithm = name.parse::<Algorithm>()?;
    }
    apply_file_opt!(set, opts, jobs => jobs);
    apply_file_opt!(set, opts, chunk_size => chunk_size);
    apply_file_opt!(set, opts, keep_order => keep_order);
    apply_file_opt!(set, opts, strict => strict);
    apply_file_opt!(set, opts, verbose => verbose);
    Ok(())
}
