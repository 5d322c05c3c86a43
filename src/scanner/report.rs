// Fri Feb 20 2026 - Alex

use crate::memory::{Address, RegionInfo, RegionKind, TargetProcess};
use crate::scanner::plan::{Block, ScanPlan};
use std::io::{self, Write};

/// Everything a completed scan produced: the region table, the block list
/// and one match list per block. Reporting walks blocks in block order,
/// so the only duplicates possible are between adjacent blocks of one
/// region and a compare-with-previous suffices to drop them.
#[derive(Debug)]
pub struct ScanReport {
    regions: Vec<RegionInfo>,
    blocks: Vec<Block>,
    matches: Vec<Vec<Address>>,
}

impl ScanReport {
    pub fn new(plan: ScanPlan, matches: Vec<Vec<Address>>) -> Self {
        let (regions, blocks) = plan.into_parts();
        assert_eq!(blocks.len(), matches.len());
        Self { regions, blocks, matches }
    }

    /// Raw match count across all blocks, overlap duplicates included.
    pub fn total_matches(&self) -> usize {
        self.matches.iter().map(Vec::len).sum()
    }

    /// Deduplicated match addresses in report order.
    pub fn addresses(&self) -> Vec<Address> {
        let mut out = Vec::new();
        let mut prev: Option<Address> = None;
        for matches in &self.matches {
            for &addr in matches {
                if prev == Some(addr) {
                    continue;
                }
                prev = Some(addr);
                out.push(addr);
            }
        }
        out
    }

    /// Render the grouped match listing. Above `result_ceiling` only the
    /// count is reported; zero matches is reported distinctly.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        target: &dyn TargetProcess,
        result_ceiling: usize,
    ) -> io::Result<()> {
        let total = self.total_matches();
        if total == 0 {
            writeln!(out, "*** No matches found. ***")?;
            return Ok(());
        }
        if total > result_ceiling {
            writeln!(
                out,
                "*** Approximate number of matches: {} exceeds the result ceiling ({}); listing suppressed. ***",
                total, result_ceiling
            )?;
            return Ok(());
        }
        writeln!(out, "*** Approximate number of matches: {} ***\n", total)?;

        let mut prev: Option<Address> = None;
        for (block, matches) in self.blocks.iter().zip(&self.matches) {
            if matches.is_empty() {
                continue;
            }
            let region = &self.regions[block.region_index];
            if region.kind() == RegionKind::Image {
                if let Some(module) = target.module_path(region.allocation_base()) {
                    writeln!(out, "------------------------------------\n")?;
                    writeln!(out, "Module name: {}", module)?;
                }
            }
            writeln!(out, "{}", region)?;
            for &addr in matches {
                if prev == Some(addr) {
                    continue;
                }
                prev = Some(addr);
                writeln!(out, "\tMatch at address: {}", addr)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
