use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const DEFAULT_TOOL_CMD: &str = "verilator_coverage";
pub const DEFAULT_RAW_ARTIFACT: &str = "raw/coverage_{id}.dat";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ToolConfig {
    pub cmd: Option<String>,
}

impl ToolConfig {
    pub fn cmd(&self) -> &str {
        self.cmd.as_deref().unwrap_or(DEFAULT_TOOL_CMD)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            cmd: Some(self.cmd().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LayoutConfig {
    /// Raw per-entry coverage artifact, relative to the run directory.
    /// `{id}` is replaced by the entry id.
    pub raw_artifact: Option<String>,
}

impl LayoutConfig {
    pub fn raw_artifact(&self) -> &str {
        self.raw_artifact.as_deref().unwrap_or(DEFAULT_RAW_ARTIFACT)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            raw_artifact: Some(self.raw_artifact().to_string()),
        }
    }
}

/// What to do with entries whose discovery times go backwards
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OrderPolicy {
    #[default]
    Reject,
    Sort,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalysisConfig {
    pub order: Option<OrderPolicy>,
}

impl AnalysisConfig {
    pub fn order(&self) -> OrderPolicy {
        self.order.unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            order: Some(self.order()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub log: Option<LogConfig>,
    pub tool: Option<ToolConfig>,
    pub layout: Option<LayoutConfig>,
    pub analysis: Option<AnalysisConfig>,
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn tool(&self) -> ToolConfig {
        self.tool.clone().unwrap_or_default()
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout.clone().unwrap_or_default()
    }

    pub fn analysis(&self) -> AnalysisConfig {
        self.analysis.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            log: Some(self.log().to_effective()),
            tool: Some(self.tool().to_effective()),
            layout: Some(self.layout().to_effective()),
            analysis: Some(self.analysis().to_effective()),
        }
    }

    pub fn resolve_tool_cmd(&self, cli_cmd: Option<&str>) -> String {
        match cli_cmd {
            Some(cmd) if !cmd.trim().is_empty() => cmd.trim().to_string(),
            _ => self.tool().cmd().to_string(),
        }
    }

    pub fn resolve_order(&self, cli_order: Option<OrderPolicy>) -> OrderPolicy {
        cli_order.unwrap_or_else(|| self.analysis().order())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
}

static CONFIG_FILENAME: OnceCell<String> = OnceCell::new();
static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn set_config_filename(filename: &str) {
    let _ = CONFIG_FILENAME.set(filename.to_string());
}

pub fn get_config_filename() -> &'static str {
    CONFIG_FILENAME
        .get()
        .map(|s| s.as_str())
        .unwrap_or("covtrend.toml")
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let mut cfg = Config::default();
        if let Some(path) = find_nearest_config_file()
            && let Some(file_cfg) = read_config_file(&path)
        {
            apply_file_config(&mut cfg, &file_cfg);
        }
        cfg
    })
}

pub fn init_with_overrides(overrides: &CliOverrides) {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file()
        && let Some(file_cfg) = read_config_file(&path)
    {
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    let _ = CONFIG.set(cfg);
}

fn read_config_file(path: &Path) -> Option<Config> {
    let contents = fs::read_to_string(path).ok()?;
    match toml::from_str::<Config>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // logging is not up yet, so this goes straight to stderr
            eprintln!("Ignoring malformed {}: {e}", path.display());
            None
        }
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    if let Some(file_tool) = &file.tool {
        if file_tool.cmd.as_ref().is_some_and(|c| !c.trim().is_empty()) {
            cfg.tool = Some(file_tool.clone());
        }
    }

    if let Some(file_layout) = &file.layout {
        if let Some(raw) = &file_layout.raw_artifact {
            if raw.contains("{id}") {
                cfg.layout = Some(file_layout.clone());
            } else {
                eprintln!("Ignoring layout.raw_artifact without an {{id}} placeholder: {raw}");
            }
        }
    }

    if let Some(file_analysis) = &file.analysis {
        if file_analysis.order.is_some() {
            cfg.analysis = Some(file_analysis.clone());
        }
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let config_filename = get_config_filename();
    for dir in cwd.ancestors() {
        let candidate = dir.join(config_filename);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn defaults_are_filled_in_by_effective_config() {
        let effective = Config::default().to_effective();
        assert_eq!(effective.tool.unwrap().cmd.unwrap(), DEFAULT_TOOL_CMD);
        assert_eq!(
            effective.layout.unwrap().raw_artifact.unwrap(),
            DEFAULT_RAW_ARTIFACT
        );
        assert_eq!(effective.analysis.unwrap().order, Some(OrderPolicy::Reject));
        assert_eq!(effective.log.unwrap().level.unwrap(), "info");
    }

    #[test]
    fn file_config_overrides_defaults() {
        let file: Config = toml::from_str(
            r#"
            [tool]
            cmd = "my_cov"
            [layout]
            raw_artifact = "cov/{id}.dat"
            [analysis]
            order = "sort"
            "#,
        )
        .unwrap();
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file);
        assert_eq!(cfg.tool().cmd(), "my_cov");
        assert_eq!(cfg.layout().raw_artifact(), "cov/{id}.dat");
        assert_eq!(cfg.analysis().order(), OrderPolicy::Sort);
    }

    #[test]
    fn raw_artifact_without_placeholder_is_ignored() {
        let file: Config = toml::from_str("[layout]\nraw_artifact = \"coverage.dat\"").unwrap();
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file);
        assert_eq!(cfg.layout().raw_artifact(), DEFAULT_RAW_ARTIFACT);
    }

    #[test]
    fn cli_tool_cmd_takes_precedence() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_tool_cmd(Some("other")), "other");
        assert_eq!(cfg.resolve_tool_cmd(Some("  ")), DEFAULT_TOOL_CMD);
        assert_eq!(cfg.resolve_tool_cmd(None), DEFAULT_TOOL_CMD);
    }

    #[test]
    fn order_policy_parses_case_insensitively() {
        assert_eq!(OrderPolicy::from_str("SORT").unwrap(), OrderPolicy::Sort);
        assert_eq!(OrderPolicy::Reject.to_string(), "reject");
    }

    #[test]
    fn log_color_override_accepts_on_and_off() {
        let mut cfg = Config::default();
        apply_cli_overrides(
            &mut cfg,
            &CliOverrides {
                log_level: Some(" debug ".to_string()),
                log_color: Some("OFF".to_string()),
            },
        );
        assert_eq!(cfg.log().level(), "debug");
        assert_eq!(cfg.log().color(), Some(false));
    }
}
