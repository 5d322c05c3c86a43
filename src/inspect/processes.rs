// Sun Feb 22 2026 - Alex

use colored::Colorize;
use std::fs;
use std::io;

/// One row of the host process listing, from `/proc/<pid>/stat`.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: i32,
    pub name: String,
    pub state: char,
    pub ppid: i32,
    pub threads: i64,
    pub priority: i64,
    pub nice: i64,
}

/// Fields of a stat line. The comm field may itself contain spaces and
/// parentheses, so everything keys off the last `)`.
pub fn parse_stat(text: &str) -> Option<ProcessEntry> {
    let open = text.find('(')?;
    let close = text.rfind(')')?;
    let pid: i32 = text[..open].trim().parse().ok()?;
    let name = text[open + 1..close].to_string();
    let rest: Vec<&str> = text[close + 1..].split_whitespace().collect();

    // After comm: state, ppid, ..., priority (15), nice (16), threads (17).
    Some(ProcessEntry {
        pid,
        name,
        state: rest.first()?.chars().next()?,
        ppid: rest.get(1)?.parse().ok()?,
        priority: rest.get(15)?.parse().ok()?,
        nice: rest.get(16)?.parse().ok()?,
        threads: rest.get(17)?.parse().ok()?,
    })
}

fn read_entry(pid: i32) -> Option<ProcessEntry> {
    let text = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    parse_stat(&text)
}

/// Every process currently visible under `/proc`, ascending by pid.
pub fn snapshot() -> io::Result<Vec<ProcessEntry>> {
    let mut pids: Vec<i32> = Vec::new();
    for entry in fs::read_dir("/proc")? {
        let entry = entry?;
        if let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse().ok()) {
            pids.push(pid);
        }
    }
    pids.sort_unstable();
    // Processes may exit between the readdir and the stat read.
    Ok(pids.into_iter().filter_map(read_entry).collect())
}

pub fn print_listing(entries: &[ProcessEntry]) {
    for p in entries {
        println!("{}", "=====================================================".cyan());
        println!("PROCESS NAME:  {}", p.name.bold());
        println!("  Process ID        = {}", p.pid);
        println!("  Thread count      = {}", p.threads);
        println!("  Parent process ID = {}", p.ppid);
        println!("  State             = {}", p.state);
        println!("  Priority          = {}", p.priority);
        println!("  Nice              = {}", p.nice);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat_plain() {
        let line = "1234 (cat) S 1 1234 1234 0 -1 4194304 95 0 0 0 0 0 0 0 20 0 1 0 12345 8192 150";
        let p = parse_stat(line).unwrap();
        assert_eq!(p.pid, 1234);
        assert_eq!(p.name, "cat");
        assert_eq!(p.state, 'S');
        assert_eq!(p.ppid, 1);
        assert_eq!(p.priority, 20);
        assert_eq!(p.nice, 0);
        assert_eq!(p.threads, 1);
    }

    #[test]
    fn test_parse_stat_comm_with_spaces_and_parens() {
        let line = "99 (my (odd) name) R 7 99 99 0 -1 4194304 95 0 0 0 0 0 0 0 -11 -5 17 0 12345 8192 150";
        let p = parse_stat(line).unwrap();
        assert_eq!(p.name, "my (odd) name");
        assert_eq!(p.ppid, 7);
        assert_eq!(p.priority, -11);
        assert_eq!(p.nice, -5);
        assert_eq!(p.threads, 17);
    }

    #[test]
    fn test_parse_stat_garbage() {
        assert!(parse_stat("nope").is_none());
        assert!(parse_stat("12 (x)").is_none());
    }

    #[test]
    fn test_snapshot_contains_self() {
        let entries = snapshot().unwrap();
        let me = std::process::id() as i32;
        assert!(entries.iter().any(|p| p.pid == me));
    }
}
