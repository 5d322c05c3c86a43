// Sun Feb 22 2026 - Alex

use crate::inspect::entropy::Entropy;
use crate::memory::{Address, MemoryError, ProcessHandle, RegionInfo, RegionKind, TargetProcess};
use colored::Colorize;

/// Chunk size for streaming arena bytes through the entropy accumulator.
const ENTROPY_CHUNK: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapMode {
    Plain,
    Entropy,
    Blocks,
}

/// One heap arena: a maximal run of adjacent anonymous private
/// read-write mappings (the `[heap]` segment or allocator arenas). The
/// constituent mappings stand in for heap blocks.
#[derive(Debug, Clone)]
pub struct HeapArena {
    pub blocks: Vec<RegionInfo>,
}

impl HeapArena {
    pub fn start(&self) -> Address {
        self.blocks[0].base()
    }

    pub fn end(&self) -> Address {
        self.blocks[self.blocks.len() - 1].end()
    }

    pub fn size(&self) -> u64 {
        self.blocks.iter().map(RegionInfo::size).sum()
    }
}

fn is_heap_candidate(region: &RegionInfo) -> bool {
    region.kind() == RegionKind::Private
        && region.is_readable()
        && region.is_writable()
        && matches!(region.path(), None | Some("[heap]"))
}

/// Group heap candidates into arenas, coalescing adjacent mappings.
pub fn arenas(regions: &[RegionInfo]) -> Vec<HeapArena> {
    let mut out: Vec<HeapArena> = Vec::new();
    for region in regions {
        if !is_heap_candidate(region) {
            continue;
        }
        match out.last_mut() {
            Some(arena) if arena.end() == region.base() => arena.blocks.push(region.clone()),
            _ => out.push(HeapArena { blocks: vec![region.clone()] }),
        }
    }
    out
}

/// `th` / `the` / `thb`: walk the target's heap arenas, optionally
/// listing every block or computing Shannon entropy over all arena bytes.
pub fn traverse(handle: &ProcessHandle, mode: HeapMode) {
    let arenas = arenas(handle.regions());
    if arenas.is_empty() {
        println!("{}", "No heap arenas found.".yellow());
        println!();
        return;
    }

    let mut buf = vec![0u8; ENTROPY_CHUNK];
    for arena in &arenas {
        println!("\n---- Heap at {} ----", arena.start());

        if mode == HeapMode::Blocks {
            for block in &arena.blocks {
                println!("Start address: {} Block size: 0x{:x}", block.base(), block.size());
            }
        }

        let mut entropy = None;
        if mode == HeapMode::Entropy {
            let (accumulated, failures) = arena_entropy(handle, arena, &mut buf);
            for (index, e) in &failures {
                let block = &arena.blocks[*index];
                println!("Start address: {} Block size: 0x{:x}", block.base(), block.size());
                eprintln!("{} {}", "[!]".red(), e);
            }
            entropy = Some(accumulated);
        }

        println!();
        println!("Start Address: {}", arena.start());
        println!("End Address: {}", arena.end());
        println!("Size: 0x{:x}", arena.size());
        if let Some(entropy) = entropy {
            println!("Entropy: {:.2}", entropy.value());
        }
    }
    println!();
}

/// Shannon entropy over every arena byte that could be read. Blocks
/// whose reads fail are returned by index alongside the accumulator so
/// the caller can report them; the remaining blocks still contribute.
pub fn arena_entropy(
    target: &dyn TargetProcess,
    arena: &HeapArena,
    buf: &mut [u8],
) -> (Entropy, Vec<(usize, MemoryError)>) {
    let mut entropy = Entropy::new();
    let mut failures = Vec::new();
    for (index, block) in arena.blocks.iter().enumerate() {
        if let Err(e) = feed_block(target, block, &mut entropy, buf) {
            failures.push((index, e));
        }
    }
    (entropy, failures)
}

fn feed_block(
    target: &dyn TargetProcess,
    block: &RegionInfo,
    entropy: &mut Entropy,
    buf: &mut [u8],
) -> Result<(), MemoryError> {
    let mut offset = 0u64;
    while offset < block.size() {
        let want = ((block.size() - offset) as usize).min(buf.len());
        let addr = block.base() + offset;
        let got = target.read_into(addr, &mut buf[..want])?;
        if got == 0 {
            // Same taxonomy as the scan workers: zero bytes is a hard
            // failure, not a quiet end of data.
            return Err(MemoryError::ReadFailed { addr: addr.as_u64(), errno: libc::EIO });
        }
        entropy.feed(&buf[..got]);
        offset += got as u64;
    }
    Ok(())
}
