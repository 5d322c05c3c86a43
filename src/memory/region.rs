// Fri Feb 20 2026 - Alex

use crate::memory::{Address, MemoryRange, Protection};
use std::fmt;

/// Backing of a mapping: image (a mapped executable object), a mapped
/// file, or private anonymous memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Image,
    Mapped,
    Private,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Mapped => write!(f, "mapped"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// One committed range of the target's address space, immutable after
/// enumeration.
#[derive(Debug, Clone)]
pub struct RegionInfo {
    range: MemoryRange,
    kind: RegionKind,
    protection: Protection,
    allocation_base: Address,
    path: Option<String>,
}

impl RegionInfo {
    pub fn new(range: MemoryRange, kind: RegionKind, protection: Protection) -> Self {
        Self {
            range,
            kind,
            protection,
            allocation_base: range.start(),
            path: None,
        }
    }

    pub fn with_allocation_base(mut self, base: Address) -> Self {
        self.allocation_base = base;
        self
    }

    pub fn with_path(mut self, path: String) -> Self {
        self.path = Some(path);
        self
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn base(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn allocation_base(&self) -> Address {
        self.allocation_base
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }

    pub fn is_readable(&self) -> bool {
        self.protection.can_read()
    }

    pub fn is_writable(&self) -> bool {
        self.protection.can_write()
    }
}

impl fmt::Display for RegionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Base address: {}\tAllocation base: {}\tRegion size: 0x{:08x}\nProtect: {}\tType: {}",
            self.base(),
            self.allocation_base,
            self.size(),
            self.protection,
            self.kind,
        )
    }
}
