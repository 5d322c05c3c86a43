// Sun Feb 22 2026 - Alex

use crate::memory::{Address, ProcessHandle, RegionInfo, RegionKind};
use colored::Colorize;

/// One loaded module: all image mappings sharing an allocation base.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub path: String,
    pub base: Address,
    pub mapped_size: u64,
    pub segments: usize,
}

/// Group the target's image-backed regions into modules, in load order.
pub fn modules_from_regions(regions: &[RegionInfo]) -> Vec<ModuleEntry> {
    let mut out: Vec<ModuleEntry> = Vec::new();
    for region in regions {
        if region.kind() != RegionKind::Image {
            continue;
        }
        let Some(path) = region.path() else { continue };
        match out.last_mut() {
            Some(last) if last.base == region.allocation_base() => {
                last.mapped_size += region.size();
                last.segments += 1;
            }
            _ => out.push(ModuleEntry {
                path: path.to_string(),
                base: region.allocation_base(),
                mapped_size: region.size(),
                segments: 1,
            }),
        }
    }
    out
}

pub fn list(handle: &ProcessHandle) -> Vec<ModuleEntry> {
    modules_from_regions(handle.regions())
}

pub fn print_listing(modules: &[ModuleEntry]) {
    for m in modules {
        println!();
        println!("     MODULE NAME:    {}", m.path.bold());
        println!("     Base address  = {}", m.base);
        println!("     Mapped size   = 0x{:x}", m.mapped_size);
        println!("     Segments      = {}", m.segments);
    }
    if modules.is_empty() {
        println!("{}", "No image-backed mappings found.".yellow());
    }
    println!();
}
