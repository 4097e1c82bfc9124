use std::path::Path;

use crate::types::NamingError;

/// Suffix that marks a fuzzer output directory
pub const RUN_DIR_SUFFIX: &str = ".out";

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Label a group of repeated runs.
///
/// A single run is named after its own directory. Repeated runs are named
/// `<seed>.<config>` and must all share `<config>`; the group then takes
/// the name of the directory holding them.
pub fn campaign_name<P: AsRef<Path>>(runs: &[P]) -> Result<String, NamingError> {
    let name = match runs {
        [] => return Err(NamingError::NoRuns),
        [single] => base_name(single.as_ref()),
        [first, ..] => {
            let suffixes: Vec<String> = runs
                .iter()
                .map(|r| {
                    let base = base_name(r.as_ref());
                    base.split_once('.')
                        .map(|(_, rest)| rest.to_string())
                        .unwrap_or_default()
                })
                .collect();
            if let Some(found) = suffixes.iter().find(|s| **s != suffixes[0]) {
                return Err(NamingError::GroupMismatch {
                    expected: suffixes[0].clone(),
                    found: found.clone(),
                });
            }
            first
                .as_ref()
                .parent()
                .map(base_name)
                .unwrap_or_default()
        }
    };
    Ok(name
        .strip_suffix(RUN_DIR_SUFFIX)
        .map(str::to_string)
        .unwrap_or(name))
}
