// Fri Feb 20 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Process {0} not found")]
    ProcessNotFound(i32),
    #[error("Failed opening process {pid}: {reason}")]
    OpenFailed { pid: i32, reason: String },
    #[error("Read failed at address {addr:#x} (errno {errno})")]
    ReadFailed { addr: u64, errno: i32 },
    #[error("Region query failed: {0}")]
    QueryFailed(String),
    #[error("Malformed maps entry: {0}")]
    MalformedMaps(String),
}
