// Fri Feb 20 2026 - Alex

use crate::memory::{Address, RegionKind, TargetProcess};
use crate::scanner::budget::MemoryBudget;
use crate::scanner::matcher::find_matches;
use crate::scanner::plan::ScanPlan;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Run the worker pool over every planned block and return the match
/// lists, one slot per block in block order.
///
/// Each worker owns one reusable `block_capacity` buffer for its
/// lifetime. Blocks are claimed dynamically off a shared cursor, each
/// read is admitted through the budget gate first, and the only blocking
/// point is that gate. Addresses within a slot are ascending.
pub fn run_scan(
    plan: &ScanPlan,
    target: &dyn TargetProcess,
    pattern: &[u8],
    budget: &Arc<MemoryBudget>,
    workers: usize,
    verbose_reads: bool,
    abort: &AtomicBool,
) -> Vec<Vec<Address>> {
    let blocks = plan.blocks();
    let mut slots: Vec<Vec<Address>> = vec![Vec::new(); blocks.len()];
    if blocks.is_empty() || workers == 0 {
        return slots;
    }

    let next = AtomicUsize::new(0);
    // Diagnostics span several lines; a dedicated lock keeps them whole
    // without holding up budget traffic.
    let console = Mutex::new(());
    let (tx, rx) = mpsc::channel::<(usize, Vec<Address>)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            let console = &console;
            scope.spawn(move || {
                let mut buf = vec![0u8; plan.block_capacity()];
                loop {
                    if abort.load(Ordering::Relaxed) {
                        break;
                    }
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(block) = blocks.get(index) else {
                        break;
                    };
                    let region = &plan.regions()[block.region_index];

                    let _reservation = budget.admit(block.len as u64);

                    let dst = &mut buf[..block.len];
                    let got = match target.read_into(block.start, dst) {
                        Ok(0) => {
                            if verbose_reads {
                                let _console = console.lock();
                                print_region_header(target, region);
                                eprintln!("Read returned no bytes at {}\n", block.start);
                            }
                            continue;
                        }
                        Ok(got) => {
                            if got < block.len && verbose_reads {
                                let _console = console.lock();
                                print_region_header(target, region);
                                eprintln!(
                                    "Block not read in its entirety: 0x{:x} bytes skipped out of 0x{:x}\n",
                                    block.len - got,
                                    block.len
                                );
                            }
                            got
                        }
                        Err(e) => {
                            if verbose_reads {
                                let _console = console.lock();
                                print_region_header(target, region);
                                eprintln!("Failed reading process memory: {}\n", e);
                            }
                            continue;
                        }
                    };

                    if got >= pattern.len() {
                        let offsets = find_matches(&buf[..got], pattern);
                        if !offsets.is_empty() {
                            let matches = offsets
                                .into_iter()
                                .map(|off| block.start + off as u64)
                                .collect();
                            let _ = tx.send((index, matches));
                        }
                    }
                }
            });
        }
        drop(tx);

        for (index, matches) in rx {
            slots[index] = matches;
        }
    });

    slots
}

fn print_region_header(target: &dyn TargetProcess, region: &crate::memory::RegionInfo) {
    if region.kind() == RegionKind::Image {
        if let Some(module) = target.module_path(region.allocation_base()) {
            eprintln!("Module name: {}", module);
        }
    }
    eprintln!("{}", region);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RegionKind, SimProcess};
    use crate::scanner::plan::plan_scan;

    const STRIDE: usize = 0x1000;

    fn scan_sim(sim: &SimProcess, pattern: &[u8], workers: usize) -> Vec<Vec<Address>> {
        let plan = plan_scan(sim, pattern.len(), STRIDE);
        let budget = MemoryBudget::new(plan.block_capacity() as u64 * 2);
        let abort = AtomicBool::new(false);
        run_scan(&plan, sim, pattern, &budget, workers, false, &abort)
    }

    #[test]
    fn test_single_region_matches() {
        let mut data = vec![0u8; 0x3000];
        data[0x10..0x16].copy_from_slice(b"NEEDLE");
        data[0x2f00..0x2f06].copy_from_slice(b"NEEDLE");
        let sim = SimProcess::new().with_region(0x40000, RegionKind::Private, data);

        let slots = scan_sim(&sim, b"NEEDLE", 4);
        let found: Vec<u64> = slots.iter().flatten().map(|a| a.as_u64()).collect();
        assert!(found.contains(&0x40010));
        assert!(found.contains(&0x42f00));
    }

    #[test]
    fn test_match_in_overlap_window_found() {
        // A match straddling the stride boundary fits inside the first
        // block's overlap tail.
        let pattern = b"0123456789abcdef";
        let mut data = vec![0u8; 0x3000];
        let at = STRIDE - 1;
        data[at..at + pattern.len()].copy_from_slice(pattern);
        let sim = SimProcess::new().with_region(0x40000, RegionKind::Private, data);

        let slots = scan_sim(&sim, pattern, 2);
        let found: Vec<u64> = slots.iter().flatten().map(|a| a.as_u64()).collect();
        assert_eq!(found, vec![0x40000 + at as u64]);
    }

    #[test]
    fn test_short_read_matches_prefix_only() {
        let mut data = vec![0u8; 0x800];
        data[0x10..0x12].copy_from_slice(b"AB");
        data[0x700..0x702].copy_from_slice(b"AB");
        // Only the first 0x100 bytes are readable.
        let sim = SimProcess::new().with_short_region(0x40000, RegionKind::Private, data, 0x100);

        let slots = scan_sim(&sim, b"AB", 1);
        let found: Vec<u64> = slots.iter().flatten().map(|a| a.as_u64()).collect();
        assert_eq!(found, vec![0x40010]);
    }

    #[test]
    fn test_unreadable_region_contributes_nothing() {
        let sim = SimProcess::new()
            .with_unreadable_region(0x40000, RegionKind::Private, 0x1000)
            .with_region(0x50000, RegionKind::Private, b"xxABxx".to_vec());
        let slots = scan_sim(&sim, b"AB", 2);
        let found: Vec<u64> = slots.iter().flatten().map(|a| a.as_u64()).collect();
        assert_eq!(found, vec![0x50002]);
    }

    #[test]
    fn test_guard_region_read_fails_per_block() {
        let sim = SimProcess::new()
            .with_guard_region(0x40000, 0x1000)
            .with_region(0x50000, RegionKind::Private, b"xxABxx".to_vec());
        let slots = scan_sim(&sim, b"AB", 2);
        let found: Vec<u64> = slots.iter().flatten().map(|a| a.as_u64()).collect();
        assert_eq!(found, vec![0x50002]);
        assert_eq!(sim.read_count(), 2, "guard region is read and fails, not skipped");
    }

    #[test]
    fn test_abort_skips_unclaimed_blocks() {
        let sim = SimProcess::new().with_region(0x40000, RegionKind::Private, vec![0u8; 0x8000]);
        let plan = plan_scan(&sim, 2, STRIDE);
        let budget = MemoryBudget::new(plan.block_capacity() as u64);
        let abort = AtomicBool::new(true);
        let slots = run_scan(&plan, &sim, b"AB", &budget, 4, false, &abort);
        assert!(slots.iter().all(Vec::is_empty));
        assert_eq!(sim.read_count(), 0);
    }

    #[test]
    fn test_budget_respected_with_many_blocks() {
        let mut data = vec![0u8; 0x10000];
        for chunk in data.chunks_mut(0x1000) {
            chunk[7..9].copy_from_slice(b"zq");
        }
        let sim = SimProcess::new().with_region(0x100000, RegionKind::Private, data);
        let plan = plan_scan(&sim, 2, STRIDE);
        // Room for exactly one in-flight block.
        let budget = MemoryBudget::new(plan.block_capacity() as u64);
        let abort = AtomicBool::new(false);
        let slots = run_scan(&plan, &sim, b"zq", &budget, 8, false, &abort);

        assert!(budget.peak_in_flight() <= budget.limit());
        assert_eq!(budget.in_flight(), 0);
        let found = slots.iter().flatten().count();
        assert!(found >= 16, "one hit per 0x1000 page expected, got {}", found);
    }
}
