// Fri Feb 20 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryRange, Protection, RegionInfo, RegionKind, TargetProcess,
};
use libc::{c_void, pid_t};
use std::fs;
use std::path::PathBuf;

/// An opened live target: a pid plus a snapshot of its `/proc/<pid>/maps`
/// table. Reads go through `process_vm_readv(2)`, so the target keeps
/// running while it is inspected.
pub struct ProcessHandle {
    pid: pid_t,
    regions: Vec<RegionInfo>,
}

impl ProcessHandle {
    pub fn open(pid: pid_t) -> Result<Self, MemoryError> {
        let maps_path = format!("/proc/{}/maps", pid);
        let text = fs::read_to_string(&maps_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MemoryError::ProcessNotFound(pid)
            } else {
                MemoryError::OpenFailed { pid, reason: e.to_string() }
            }
        })?;
        let regions = parse_maps(&text)?;
        Ok(Self { pid, regions })
    }

    pub fn pid(&self) -> pid_t {
        self.pid
    }

    pub fn regions(&self) -> &[RegionInfo] {
        &self.regions
    }

    /// Path of the target's main executable, if readable.
    pub fn exe_path(&self) -> Option<PathBuf> {
        fs::read_link(format!("/proc/{}/exe", self.pid)).ok()
    }
}

impl TargetProcess for ProcessHandle {
    fn region_at(&self, addr: Address) -> Result<Option<RegionInfo>, MemoryError> {
        // First region whose end lies above the cursor: either contains the
        // address or is the next mapping up.
        let idx = self.regions.partition_point(|r| r.end().as_u64() <= addr.as_u64());
        Ok(self.regions.get(idx).cloned())
    }

    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        if buf.is_empty() {
            return Ok(0);
        }
        let local = libc::iovec {
            iov_base: buf.as_mut_ptr() as *mut c_void,
            iov_len: buf.len(),
        };
        let remote = libc::iovec {
            iov_base: addr.as_u64() as *mut c_void,
            iov_len: buf.len(),
        };
        let n = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        if n < 0 {
            let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            return Err(MemoryError::ReadFailed { addr: addr.as_u64(), errno });
        }
        Ok(n as usize)
    }

    fn module_path(&self, allocation_base: Address) -> Option<String> {
        self.regions
            .iter()
            .find(|r| r.allocation_base() == allocation_base && r.path().is_some())
            .and_then(|r| r.path().map(str::to_string))
    }
}

/// Parse a complete maps table into region descriptors, sorted low-to-high.
///
/// Consecutive entries backed by the same file object form one allocation:
/// they share an allocation base (the lowest mapped base, i.e. the module
/// load base) and are image-backed when any segment of the object is
/// executable. Anonymous mappings are their own allocation.
pub fn parse_maps(text: &str) -> Result<Vec<RegionInfo>, MemoryError> {
    struct RawEntry {
        range: MemoryRange,
        protection: Protection,
        device: String,
        inode: u64,
        path: Option<String>,
    }

    let mut raw = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(6, char::is_whitespace);
        let addrs = fields
            .next()
            .ok_or_else(|| MemoryError::MalformedMaps(line.to_string()))?;
        let perms = fields
            .next()
            .ok_or_else(|| MemoryError::MalformedMaps(line.to_string()))?;
        let _offset = fields.next();
        let device = fields.next().unwrap_or("00:00").to_string();
        let inode: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let path = fields
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let (start, end) = addrs
            .split_once('-')
            .ok_or_else(|| MemoryError::MalformedMaps(line.to_string()))?;
        let start = u64::from_str_radix(start, 16)
            .map_err(|_| MemoryError::MalformedMaps(line.to_string()))?;
        let end = u64::from_str_radix(end, 16)
            .map_err(|_| MemoryError::MalformedMaps(line.to_string()))?;

        raw.push(RawEntry {
            range: MemoryRange::new(Address::new(start), Address::new(end)),
            protection: Protection::from_maps_perms(perms),
            device,
            inode,
            path,
        });
    }

    let mut regions = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let entry = &raw[i];
        if entry.inode == 0 {
            // Anonymous or pseudo mapping ([heap], [stack], ...): its own
            // allocation, shared anon counts as mapped.
            let kind = if entry.protection.is_shared() {
                RegionKind::Mapped
            } else {
                RegionKind::Private
            };
            let mut region = RegionInfo::new(entry.range, kind, entry.protection);
            if let Some(ref p) = entry.path {
                region = region.with_path(p.clone());
            }
            regions.push(region);
            i += 1;
            continue;
        }

        // Run of consecutive entries mapping the same file object.
        let mut j = i + 1;
        while j < raw.len()
            && raw[j].inode == entry.inode
            && raw[j].device == entry.device
            && raw[j].path == entry.path
        {
            j += 1;
        }
        let allocation_base = entry.range.start();
        let executable = raw[i..j].iter().any(|e| e.protection.can_execute());
        for e in &raw[i..j] {
            let kind = if e.protection.is_shared() {
                RegionKind::Mapped
            } else if executable {
                RegionKind::Image
            } else {
                RegionKind::Mapped
            };
            let mut region = RegionInfo::new(e.range, kind, e.protection)
                .with_allocation_base(allocation_base);
            if let Some(ref p) = e.path {
                region = region.with_path(p.clone());
            }
            regions.push(region);
        }
        i = j;
    }

    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
55d000000000-55d000001000 r--p 00000000 08:01 393388    /usr/bin/cat
55d000001000-55d000006000 r-xp 00001000 08:01 393388    /usr/bin/cat
55d000006000-55d000008000 r--p 00006000 08:01 393388    /usr/bin/cat
55d001000000-55d001021000 rw-p 00000000 00:00 0         [heap]
7f0000000000-7f0000100000 rw-s 00000000 08:01 41        /dev/shm/seg
7ffc00000000-7ffc00021000 rw-p 00000000 00:00 0         [stack]
ffffffffff600000-ffffffffff601000 --xp 00000000 00:00 0 [vsyscall]
";

    #[test]
    fn test_parse_maps_kinds() {
        let regions = parse_maps(SAMPLE).unwrap();
        assert_eq!(regions.len(), 7);

        assert_eq!(regions[0].kind(), RegionKind::Image);
        assert_eq!(regions[1].kind(), RegionKind::Image);
        assert_eq!(regions[0].path(), Some("/usr/bin/cat"));

        assert_eq!(regions[3].kind(), RegionKind::Private);
        assert_eq!(regions[3].path(), Some("[heap]"));

        assert_eq!(regions[4].kind(), RegionKind::Mapped);
        assert_eq!(regions[5].kind(), RegionKind::Private);
    }

    #[test]
    fn test_parse_maps_allocation_base() {
        let regions = parse_maps(SAMPLE).unwrap();
        let base = Address::new(0x55d000000000);
        assert_eq!(regions[0].allocation_base(), base);
        assert_eq!(regions[1].allocation_base(), base);
        assert_eq!(regions[2].allocation_base(), base);
        // Anonymous mapping is its own allocation.
        assert_eq!(regions[3].allocation_base(), regions[3].base());
    }

    #[test]
    fn test_parse_maps_rejects_garbage() {
        assert!(parse_maps("not a maps line at all\n").is_err());
    }
}
