use log::info;

use crate::types::AppResult;
use crate::types::config::{config, get_config_filename};

pub async fn execute(format: String) -> AppResult<()> {
    let effective_config = config().to_effective();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&effective_config)?);
    } else {
        // Table format
        info!("Effective Configuration ({}):", get_config_filename());

        info!("");
        info!("Log:");
        let log = effective_config.log.unwrap_or_default();
        info!("  level: {}", log.level());
        match log.color {
            Some(true) => info!("  color: on"),
            Some(false) => info!("  color: off"),
            None => info!("  color: auto"),
        }

        info!("");
        info!("Tool:");
        info!("  cmd: {}", effective_config.tool.unwrap_or_default().cmd());

        info!("");
        info!("Layout:");
        info!(
            "  raw_artifact: {}",
            effective_config.layout.unwrap_or_default().raw_artifact()
        );

        info!("");
        info!("Analysis:");
        info!(
            "  order: {}",
            effective_config.analysis.unwrap_or_default().order()
        );
    }

    Ok(())
}
