use serde::{Deserialize, Serialize};

/// One fuzzer-generated test case within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEntry {
    pub id: u64,
    /// Seconds elapsed since the run started
    pub discovered_after: f64,
}

impl TestEntry {
    pub fn new(id: u64, discovered_after: f64) -> Self {
        Self {
            id,
            discovered_after,
        }
    }
}

/// Record layout of `entries.json`; fields other than `entry` are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRecord {
    pub entry: TestEntry,
}
