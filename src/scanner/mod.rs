// Fri Feb 20 2026 - Alex

pub mod budget;
pub mod error;
pub mod matcher;
pub mod plan;
pub mod report;
pub mod worker;

pub use budget::{BudgetGuard, MemoryBudget};
pub use error::ScanError;
pub use matcher::find_matches;
pub use plan::{allocation_granularity, overlap_for, plan_scan, Block, ScanPlan};
pub use report::ScanReport;
pub use worker::run_scan;

use crate::config::Config;
use crate::memory::TargetProcess;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pattern scanner over one opened target. Plans blocks over the
/// committed regions, runs the worker pool under the byte budget, and
/// hands back the per-block match table for reporting.
pub struct Scanner {
    config: Config,
    abort: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag an operator interrupt may set; unclaimed blocks are
    /// skipped once it is raised, in-flight blocks run to completion.
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    pub fn scan(&self, target: &dyn TargetProcess, pattern: &[u8]) -> Result<ScanReport, ScanError> {
        if pattern.is_empty() {
            return Err(ScanError::EmptyPattern);
        }

        let stride = allocation_granularity() * self.config.block_factor;
        let ideal = (stride + overlap_for(pattern.len())) as u64;
        if ideal > self.config.memory_budget {
            return Err(ScanError::BudgetTooSmall {
                need: ideal,
                limit: self.config.memory_budget,
            });
        }

        self.abort.store(false, Ordering::Relaxed);

        let plan = plan_scan(target, pattern.len(), stride);
        let workers = plan
            .blocks()
            .len()
            .min(self.config.max_workers)
            .min(num_cpus::get())
            .max(1);
        log::debug!(
            "scanning {} blocks over {} regions with {} workers, budget {} bytes",
            plan.blocks().len(),
            plan.regions().len(),
            workers,
            self.config.memory_budget
        );

        let budget = MemoryBudget::new(self.config.memory_budget);
        let matches = run_scan(
            &plan,
            target,
            pattern,
            &budget,
            workers,
            self.config.verbose_reads,
            &self.abort,
        );

        Ok(ScanReport::new(plan, matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RegionKind, SimProcess};

    #[test]
    fn test_empty_pattern_rejected() {
        let scanner = Scanner::new(Config::default());
        let sim = SimProcess::new();
        assert!(matches!(scanner.scan(&sim, b""), Err(ScanError::EmptyPattern)));
    }

    #[test]
    fn test_budget_too_small_rejected_at_entry() {
        let config = Config::default().with_memory_budget(1024);
        let scanner = Scanner::new(config);
        let sim = SimProcess::new().with_region(0x40000, RegionKind::Private, vec![0u8; 0x1000]);
        let err = scanner.scan(&sim, b"NEEDLE").unwrap_err();
        assert!(matches!(err, ScanError::BudgetTooSmall { .. }));
        assert_eq!(sim.read_count(), 0, "rejected before any worker ran");
    }

    #[test]
    fn test_scan_end_to_end() {
        let mut data = vec![0u8; 0x20000];
        data[0x111..0x117].copy_from_slice(b"NEEDLE");
        data[0x1f000..0x1f006].copy_from_slice(b"NEEDLE");
        let sim = SimProcess::new().with_region(0x7f0000000000, RegionKind::Private, data);

        let scanner = Scanner::new(Config::default());
        let report = scanner.scan(&sim, b"NEEDLE").unwrap();
        let addrs: Vec<u64> = report.addresses().iter().map(|a| a.as_u64()).collect();
        assert_eq!(addrs, vec![0x7f0000000111, 0x7f000001f000]);
    }
}
