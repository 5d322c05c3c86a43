// Fri Feb 20 2026 - Alex

use crate::scanner::plan::{allocation_granularity, overlap_for};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_MEMORY_BUDGET: u64 = 256 * 1024 * 1024;
const DEFAULT_BLOCK_FACTOR: usize = 64;
const DEFAULT_RESULT_CEILING: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound on bytes checked out by in-flight block reads.
    pub memory_budget: u64,
    /// Block stride = allocation granularity * this factor.
    pub block_factor: usize,
    /// Worker pool ceiling, independent of processor count.
    pub max_workers: usize,
    /// Report short reads and read failures with region metadata.
    pub verbose_reads: bool,
    /// Suppress the per-match listing above this many matches.
    pub result_ceiling: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_budget: DEFAULT_MEMORY_BUDGET,
            block_factor: DEFAULT_BLOCK_FACTOR,
            max_workers: num_cpus::get(),
            verbose_reads: false,
            result_ceiling: DEFAULT_RESULT_CEILING,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.memory_budget = bytes;
        self
    }

    pub fn with_block_factor(mut self, factor: usize) -> Self {
        self.block_factor = factor;
        self
    }

    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn with_verbose_reads(mut self, verbose: bool) -> Self {
        self.verbose_reads = verbose;
        self
    }

    pub fn with_result_ceiling(mut self, ceiling: usize) -> Self {
        self.result_ceiling = ceiling;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.memory_budget == 0 {
            return Err("memory_budget must be greater than 0".to_string());
        }
        if self.block_factor == 0 {
            return Err("block_factor must be greater than 0".to_string());
        }
        if self.max_workers == 0 {
            return Err("max_workers must be greater than 0".to_string());
        }
        if self.result_ceiling == 0 {
            return Err("result_ceiling must be greater than 0".to_string());
        }
        // One ideal block must fit, or every scan would reject at entry.
        let min_block = (allocation_granularity() * self.block_factor + overlap_for(1)) as u64;
        if self.memory_budget < min_block {
            return Err(format!(
                "memory_budget of {} bytes is smaller than one block of {} bytes",
                self.memory_budget, min_block
            ));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let text = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, text).map_err(|e| format!("{}: {}", path.display(), e))
    }
}
