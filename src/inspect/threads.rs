// Sun Feb 22 2026 - Alex

use crate::inspect::processes::parse_stat;
use crate::memory::{Address, ProcessHandle, RegionInfo, RegionKind};
use colored::Colorize;
use std::fs;
use std::io;

/// One thread of the target, with the committed private region holding
/// its current stack pointer when that could be resolved.
#[derive(Debug, Clone)]
pub struct ThreadEntry {
    pub tid: i32,
    pub priority: i64,
    pub nice: i64,
    pub stack: Option<RegionInfo>,
}

/// Stack pointer out of `/proc/<pid>/task/<tid>/syscall`: the
/// second-to-last field, present both in-syscall and between syscalls
/// (`-1 sp pc`). A running thread reports nothing.
pub fn parse_syscall_sp(text: &str) -> Option<u64> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() < 2 {
        return None;
    }
    let sp = fields[fields.len() - 2];
    u64::from_str_radix(sp.strip_prefix("0x")?, 16).ok()
}

/// The committed private region containing the stack pointer.
pub fn stack_region_for(regions: &[RegionInfo], sp: Address) -> Option<RegionInfo> {
    regions
        .iter()
        .find(|r| r.contains(sp) && r.kind() == RegionKind::Private && r.is_readable())
        .cloned()
}

pub fn threads(handle: &ProcessHandle) -> io::Result<Vec<ThreadEntry>> {
    let task_dir = format!("/proc/{}/task", handle.pid());
    let mut tids: Vec<i32> = Vec::new();
    for entry in fs::read_dir(task_dir)? {
        let entry = entry?;
        if let Some(tid) = entry.file_name().to_str().and_then(|s| s.parse().ok()) {
            tids.push(tid);
        }
    }
    tids.sort_unstable();

    let mut out = Vec::with_capacity(tids.len());
    for tid in tids {
        let stat_path = format!("/proc/{}/task/{}/stat", handle.pid(), tid);
        let Some(stat) = fs::read_to_string(&stat_path).ok().and_then(|t| parse_stat(&t)) else {
            continue;
        };
        let stack = fs::read_to_string(format!("/proc/{}/task/{}/syscall", handle.pid(), tid))
            .ok()
            .and_then(|t| parse_syscall_sp(&t))
            .and_then(|sp| stack_region_for(handle.regions(), Address::new(sp)));
        out.push(ThreadEntry {
            tid,
            priority: stat.priority,
            nice: stat.nice,
            stack,
        });
    }
    Ok(out)
}

pub fn print_listing(threads: &[ThreadEntry]) {
    for t in threads {
        println!();
        println!("     THREAD ID      = {}", t.tid);
        println!("     Priority       = {}", t.priority);
        println!("     Nice           = {}", t.nice);
        match &t.stack {
            Some(region) => {
                println!("     Stack base     = {}", region.base());
                println!("     Stack size     = 0x{:x}", region.size());
            }
            None => println!("     {}", "Stack region not resolved".yellow()),
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::process::parse_maps;

    #[test]
    fn test_parse_syscall_sp_in_syscall() {
        let text = "202 0x1 0x0 0x0 0x0 0x0 0x0 0x7ffdc0ffee10 0x7f3b2a1c4e2d";
        assert_eq!(parse_syscall_sp(text), Some(0x7ffdc0ffee10));
    }

    #[test]
    fn test_parse_syscall_sp_between_syscalls() {
        assert_eq!(
            parse_syscall_sp("-1 0x7ffdc0ffee10 0x7f3b2a1c4e2d"),
            Some(0x7ffdc0ffee10)
        );
    }

    #[test]
    fn test_parse_syscall_sp_running() {
        assert_eq!(parse_syscall_sp("running"), None);
        assert_eq!(parse_syscall_sp(""), None);
    }

    #[test]
    fn test_stack_region_lookup() {
        let maps = "\
55d000000000-55d000006000 r-xp 00000000 08:01 393388    /usr/bin/cat
7ffc00000000-7ffc00021000 rw-p 00000000 00:00 0         [stack]
";
        let regions = parse_maps(maps).unwrap();
        let sp = Address::new(0x7ffc00001234);
        let stack = stack_region_for(&regions, sp).unwrap();
        assert_eq!(stack.base().as_u64(), 0x7ffc00000000);
        // An sp inside an image mapping is not a stack.
        assert!(stack_region_for(&regions, Address::new(0x55d000000100)).is_none());
    }
}
