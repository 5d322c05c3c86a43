// Fri Feb 20 2026 - Alex

use crate::memory::{Address, RegionInfo, TargetProcess};

/// Overlap between consecutive blocks of one region, rounded up to a
/// 16-byte multiple so the tail comparison can run vectorized.
pub fn overlap_for(pattern_len: usize) -> usize {
    pattern_len.div_ceil(16) * 16
}

/// Host allocation granularity; the block stride is a multiple of this.
pub fn allocation_granularity() -> usize {
    let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page <= 0 {
        4096
    } else {
        page as usize
    }
}

/// One unit of scanner work: a sub-range of a region, claimed by exactly
/// one worker.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub start: Address,
    pub len: usize,
    pub region_index: usize,
}

/// Output of the planning pass: the committed-region table and the block
/// list indexing into it, built together so the indices cannot drift.
pub struct ScanPlan {
    regions: Vec<RegionInfo>,
    blocks: Vec<Block>,
    overlap: usize,
    stride: usize,
}

impl ScanPlan {
    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Size of the per-worker read buffer; no planned block is larger.
    pub fn block_capacity(&self) -> usize {
        self.stride + self.overlap
    }

    pub fn into_parts(self) -> (Vec<RegionInfo>, Vec<Block>) {
        (self.regions, self.blocks)
    }
}

/// Walk the target's address space low-to-high and cut every committed
/// region of at least `pattern_len` bytes into blocks of
/// `stride + overlap` bytes stepped by `stride`, with the remainder as a
/// final short block. A failed region query ends the walk; regions
/// gathered so far stay in the plan.
pub fn plan_scan(target: &dyn TargetProcess, pattern_len: usize, stride: usize) -> ScanPlan {
    assert!(pattern_len > 0, "pattern must not be empty");
    assert!(stride > 0, "stride must not be zero");

    let overlap = overlap_for(pattern_len);
    let ideal = stride + overlap;

    let mut regions: Vec<RegionInfo> = Vec::new();
    let mut blocks: Vec<Block> = Vec::new();
    let mut cursor = Address::zero();

    loop {
        let region = match target.region_at(cursor) {
            Ok(Some(region)) => region,
            Ok(None) => break,
            Err(e) => {
                log::warn!("region query failed at {}: {}; scanning regions gathered so far", cursor, e);
                break;
            }
        };
        cursor = region.end();

        // Protection bits never gate enumeration: cross-process reads are
        // not bound by the target's own page protection, so whether a
        // region's bytes come back is decided per block by the read itself.
        if (region.size() as usize) < pattern_len {
            continue;
        }

        let region_index = regions.len();
        let base = region.base();
        let mut remaining = region.size() as usize;
        let mut offset = 0usize;
        while remaining > 0 {
            let len = if remaining >= ideal {
                remaining -= stride;
                ideal
            } else {
                let last = remaining;
                remaining = 0;
                last
            };
            blocks.push(Block {
                start: base + offset as u64,
                len,
                region_index,
            });
            offset += stride;
        }
        regions.push(region);
    }

    ScanPlan { regions, blocks, overlap, stride }
}
