// Sun Feb 22 2026 - Alex

pub mod command;

pub use command::{Command, CommandError};

use crate::config::Config;
use crate::inspect::{heaps, modules, processes, threads};
use crate::memory::ProcessHandle;
use crate::scanner::Scanner;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Line-oriented operator loop. Every command is self-contained; a scan
/// or listing opens its own handle and drops it when done.
pub struct Repl {
    config: Config,
    scanner: Scanner,
    target: Option<i32>,
    running: bool,
}

impl Repl {
    pub fn new(config: Config) -> Self {
        let scanner = Scanner::new(config.clone());
        Self {
            config,
            scanner,
            target: None,
            running: false,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        print_help();
        self.running = true;

        let stdin = io::stdin();
        let mut line = String::new();
        while self.running {
            print!(">: ");
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match Command::parse(input) {
                Ok(cmd) => self.dispatch(cmd),
                Err(e) => println!("{} {}", "[!]".red(), e),
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command) {
        let target = match self.target {
            Some(pid) => pid,
            None if cmd.needs_target() => {
                println!("{}", "Select the PID first!".yellow());
                return;
            }
            None => -1,
        };

        match cmd {
            Command::SelectTarget(pid) => {
                self.target = Some(pid);
                println!("Target set to {}", pid);
            }
            Command::ListProcesses => match processes::snapshot() {
                Ok(entries) => processes::print_listing(&entries),
                Err(e) => println!("{} Failed listing processes: {}", "[!]".red(), e),
            },
            Command::ListModules => self.with_handle(target, |handle| {
                modules::print_listing(&modules::list(handle));
            }),
            Command::ListThreads => self.with_handle(target, |handle| {
                match threads::threads(handle) {
                    Ok(list) => threads::print_listing(&list),
                    Err(e) => println!("{} Failed listing threads: {}", "[!]".red(), e),
                }
            }),
            Command::TraverseHeaps(mode) => self.with_handle(target, |handle| {
                heaps::traverse(handle, mode);
            }),
            Command::Scan(pattern) => self.scan(target, &pattern),
            Command::Help => print_help(),
            Command::Quit => self.running = false,
        }
        println!("{}", "====================================".cyan());
        println!();
    }

    fn with_handle(&self, pid: i32, f: impl FnOnce(&ProcessHandle)) {
        match ProcessHandle::open(pid) {
            Ok(handle) => f(&handle),
            Err(e) => println!("{} {}", "[!]".red(), e),
        }
    }

    fn scan(&self, pid: i32, pattern: &[u8]) {
        let handle = match ProcessHandle::open(pid) {
            Ok(handle) => handle,
            Err(e) => {
                println!("{} {}", "[!]".red(), e);
                return;
            }
        };
        if let Some(exe) = handle.exe_path() {
            println!("Process name: {}\n", exe.display());
        }
        println!("Searching committed memory...");
        println!("\n------------------------------------\n");

        match self.scanner.scan(&handle, pattern) {
            Ok(report) => {
                let stdout = io::stdout();
                if let Err(e) =
                    report.write_to(&mut stdout.lock(), &handle, self.config.result_ceiling)
                {
                    println!("{} Failed writing report: {}", "[!]".red(), e);
                }
            }
            Err(e) => println!("{} {}", "[!]".red(), e),
        }
        // Handle drops here; the target stays untouched between commands.
    }
}

fn print_help() {
    println!("{}", "--------------------------------".cyan());
    println!("p <pid>\t\t - select target PID (hex with 0x prefix or any a-f digit)");
    println!("lp\t\t - list system PIDs");
    println!("lM\t\t - list modules of the target");
    println!("lt\t\t - list threads of the target");
    println!("th\t\t - traverse heap arenas (slow)");
    println!("the\t\t - traverse heap arenas, calculate entropy (slower)");
    println!("thb\t\t - traverse heap arenas, list blocks (extra slow)");
    println!("s <text>\t - search committed memory for an ASCII pattern");
    println!("sx <hex>\t - search committed memory for hex bytes");
    println!("h, ?\t\t - help");
    println!("q\t\t - quit");
    println!("{}", "********************************".cyan());
    println!();
}
