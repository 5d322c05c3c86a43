// Sun Feb 22 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryRange, Protection, RegionInfo, RegionKind, TargetProcess,
};
use parking_lot::Mutex;

struct SimRegion {
    info: RegionInfo,
    bytes: Vec<u8>,
    /// Bytes of the region that reads may return; the tail past this point
    /// reads short. `0` makes every read a hard failure.
    readable: usize,
}

/// Deterministic in-memory target. Regions are laid out by the test and
/// behave like committed mappings, including short reads and read failures.
pub struct SimProcess {
    regions: Vec<SimRegion>,
    /// Fail any region query at or above this address.
    query_fault_at: Option<u64>,
    reads: Mutex<usize>,
}

impl SimProcess {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            query_fault_at: None,
            reads: Mutex::new(0),
        }
    }

    pub fn with_region(self, base: u64, kind: RegionKind, bytes: Vec<u8>) -> Self {
        let readable = bytes.len();
        self.push_region(base, kind, bytes, readable, None)
    }

    pub fn with_named_region(self, base: u64, kind: RegionKind, bytes: Vec<u8>, path: &str) -> Self {
        let readable = bytes.len();
        self.push_region(base, kind, bytes, readable, Some(path.to_string()))
    }

    pub fn with_short_region(self, base: u64, kind: RegionKind, bytes: Vec<u8>, readable: usize) -> Self {
        self.push_region(base, kind, bytes, readable, None)
    }

    pub fn with_unreadable_region(self, base: u64, kind: RegionKind, size: usize) -> Self {
        self.push_region(base, kind, vec![0u8; size], 0, None)
    }

    /// A `PROT_NONE` guard mapping: enumerated like any committed
    /// mapping, but every read of it hard-fails.
    pub fn with_guard_region(mut self, base: u64, size: usize) -> Self {
        let range = MemoryRange::from_start_size(Address::new(base), size as u64);
        if let Some(prev) = self.regions.last() {
            assert!(prev.info.end().as_u64() <= base);
        }
        self.regions.push(SimRegion {
            info: RegionInfo::new(range, RegionKind::Private, Protection::none()),
            bytes: vec![0u8; size],
            readable: 0,
        });
        self
    }

    pub fn with_query_fault_at(mut self, addr: u64) -> Self {
        self.query_fault_at = Some(addr);
        self
    }

    fn push_region(
        mut self,
        base: u64,
        kind: RegionKind,
        bytes: Vec<u8>,
        readable: usize,
        path: Option<String>,
    ) -> Self {
        let range = MemoryRange::from_start_size(Address::new(base), bytes.len() as u64);
        if let Some(prev) = self.regions.last() {
            assert!(
                prev.info.end().as_u64() <= base,
                "sim regions must be added low-to-high without overlap"
            );
        }
        let mut info = RegionInfo::new(range, kind, Protection::read_write());
        if let Some(p) = path {
            info = info.with_path(p);
        }
        self.regions.push(SimRegion { info, bytes, readable });
        self
    }

    /// Number of read_into calls served so far.
    pub fn read_count(&self) -> usize {
        *self.reads.lock()
    }
}

impl Default for SimProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetProcess for SimProcess {
    fn region_at(&self, addr: Address) -> Result<Option<RegionInfo>, MemoryError> {
        if let Some(fault) = self.query_fault_at {
            if addr.as_u64() >= fault {
                return Err(MemoryError::QueryFailed(format!(
                    "simulated fault at {:#x}",
                    fault
                )));
            }
        }
        let idx = self
            .regions
            .partition_point(|r| r.info.end().as_u64() <= addr.as_u64());
        Ok(self.regions.get(idx).map(|r| r.info.clone()))
    }

    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        *self.reads.lock() += 1;
        let region = self
            .regions
            .iter()
            .find(|r| r.info.contains(addr))
            .ok_or(MemoryError::ReadFailed { addr: addr.as_u64(), errno: libc::EFAULT })?;
        if region.readable == 0 {
            return Err(MemoryError::ReadFailed { addr: addr.as_u64(), errno: libc::EIO });
        }
        let offset = (addr - region.info.base()) as usize;
        if offset >= region.readable {
            return Err(MemoryError::ReadFailed { addr: addr.as_u64(), errno: libc::EIO });
        }
        let avail = region.readable - offset;
        let n = avail.min(buf.len());
        buf[..n].copy_from_slice(&region.bytes[offset..offset + n]);
        Ok(n)
    }

    fn module_path(&self, allocation_base: Address) -> Option<String> {
        self.regions
            .iter()
            .find(|r| r.info.allocation_base() == allocation_base)
            .and_then(|r| r.info.path().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_walk() {
        let sim = SimProcess::new()
            .with_region(0x1000, RegionKind::Private, vec![0u8; 0x1000])
            .with_region(0x4000, RegionKind::Private, vec![0u8; 0x2000]);

        let first = sim.region_at(Address::zero()).unwrap().unwrap();
        assert_eq!(first.base().as_u64(), 0x1000);

        let second = sim.region_at(first.end()).unwrap().unwrap();
        assert_eq!(second.base().as_u64(), 0x4000);

        assert!(sim.region_at(second.end()).unwrap().is_none());
    }

    #[test]
    fn test_short_read() {
        let sim = SimProcess::new().with_short_region(
            0x1000,
            RegionKind::Private,
            vec![7u8; 0x100],
            0x40,
        );
        let mut buf = [0u8; 0x100];
        let n = sim.read_into(Address::new(0x1000), &mut buf).unwrap();
        assert_eq!(n, 0x40);
        assert!(buf[..0x40].iter().all(|&b| b == 7));
    }

    #[test]
    fn test_query_fault() {
        let sim = SimProcess::new()
            .with_region(0x1000, RegionKind::Private, vec![0u8; 0x1000])
            .with_query_fault_at(0x2000);
        assert!(sim.region_at(Address::zero()).unwrap().is_some());
        assert!(sim.region_at(Address::new(0x2000)).is_err());
    }
}
