use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::types::config::{Config, get_config_filename};
use crate::types::{AppError, AppResult};

const EXAMPLE_CONFIG: &str = include_str!("../../example.toml");

/// The bundled example configuration, decoded
pub fn example_config() -> AppResult<Config> {
    toml::from_str(EXAMPLE_CONFIG)
        .map_err(|e| AppError::Custom(format!("Bundled example configuration is invalid: {e}")))
}

/// Write the example configuration to `path` unless a file is already there.
/// Returns the settings written, or `None` if `path` was left untouched.
pub async fn write_example_config(path: &Path) -> AppResult<Option<Config>> {
    if tokio::fs::try_exists(path).await? {
        return Ok(None);
    }
    let example = example_config()?;
    tokio::fs::write(path, EXAMPLE_CONFIG).await?;
    Ok(Some(example))
}

pub async fn execute_init() -> AppResult<()> {
    let path = PathBuf::from(get_config_filename());
    let Some(written) = write_example_config(&path).await? else {
        warn!(
            "{} already exists; remove it to regenerate the coverage defaults",
            path.display()
        );
        return Ok(());
    };

    let written = written.to_effective();
    info!("Created {}", path.display());
    info!("  coverage tool: {}", written.tool().cmd());
    info!("  raw artifacts: <run>/{}", written.layout().raw_artifact());
    info!("  entry order:   {}", written.analysis().order());
    info!("Run `analyze <campaign-dir>` on a directory of *.out runs to build its curve");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::OrderPolicy;
    use tempfile::tempdir;

    #[test]
    fn bundled_example_matches_defaults() {
        let example = example_config().unwrap();
        assert_eq!(example.tool().cmd(), "verilator_coverage");
        assert!(example.layout().raw_artifact().contains("{id}"));
        assert_eq!(example.analysis().order(), OrderPolicy::Reject);
    }

    #[tokio::test]
    async fn existing_config_is_left_alone() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("covtrend.toml");

        let written = write_example_config(&path).await.unwrap();
        assert!(written.is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXAMPLE_CONFIG);

        std::fs::write(&path, "[tool]\ncmd = \"custom\"\n").unwrap();
        assert!(write_example_config(&path).await.unwrap().is_none());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[tool]\ncmd = \"custom\"\n"
        );
    }
}
