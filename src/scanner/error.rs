// Fri Feb 20 2026 - Alex

use crate::memory::MemoryError;
use thiserror::Error;

/// Only setup problems surface here; per-region and per-block failures
/// are diagnostics, never errors.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Pattern must not be empty")]
    EmptyPattern,
    #[error("Memory budget of {limit} bytes cannot fit one block of {need} bytes")]
    BudgetTooSmall { need: u64, limit: u64 },
    #[error(transparent)]
    Setup(#[from] MemoryError),
}
