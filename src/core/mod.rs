pub mod aggregate;
pub mod campaign;
pub mod cli;
pub mod cmds;
pub mod extract;
pub mod logging;
pub mod main_shared;
pub mod merge;
pub mod metadata;
pub mod naming;
pub mod report;
pub mod resample;
pub mod stats;
#[doc(hidden)]
pub mod testing;
pub mod tool;
pub mod types;
