// Fri Feb 20 2026 - Alex

use crate::memory::{Address, MemoryError, RegionInfo};

/// The complete OS surface the scanner consumes from an opened target.
///
/// `region_at` returns the region containing `addr`, or the next region
/// above it, so a caller can walk the whole address space low-to-high by
/// advancing a cursor to each returned region's end. `None` means the walk
/// is past the last mapping; `Err` means the query primitive itself failed.
pub trait TargetProcess: Send + Sync {
    fn region_at(&self, addr: Address) -> Result<Option<RegionInfo>, MemoryError>;

    /// Read into `buf` starting at `addr`. Returns the number of bytes
    /// actually read, which may be short of `buf.len()` when the tail of
    /// the range is gone. A hard failure (nothing readable) is an `Err`.
    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError>;

    /// Best-effort path of the module whose load base is `allocation_base`.
    fn module_path(&self, allocation_base: Address) -> Option<String>;
}
