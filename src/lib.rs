pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::aggregate::{AggregatedRun, aggregate_entries, aggregate_run};
pub use crate::core::campaign::{CampaignOptions, SeriesSource, analyze_campaign, discover_runs};
pub use crate::core::extract::parse_summary;
pub use crate::core::main_shared::run_main;
pub use crate::core::merge::{ArtifactLayout, MergeChain, MergeStep, merge_step};
pub use crate::core::naming::campaign_name;
pub use crate::core::resample::{align, interpolate, shared_time_axis};
pub use crate::core::stats::{confidence, t_critical};
pub use crate::core::tool::{CoverageTool, ProcessTool};
