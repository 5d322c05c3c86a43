// Sun Feb 22 2026 - Alex

use crate::inspect::HeapMode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectTarget(i32),
    ListProcesses,
    ListModules,
    ListThreads,
    TraverseHeaps(HeapMode),
    Scan(Vec<u8>),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("{0} missing")]
    MissingArgument(&'static str),
    #[error("Invalid PID: {0}")]
    InvalidPid(String),
    #[error("Invalid hex pattern: {0}")]
    InvalidHex(String),
    #[error("Pattern must not be empty")]
    EmptyPattern,
}

/// A pid argument is hex when it carries a `0x` prefix or contains any
/// digit only hex has.
fn looks_hex(s: &str) -> bool {
    s.starts_with("0x")
        || s.starts_with("0X")
        || s.chars().any(|c| matches!(c, 'a'..='f' | 'A'..='F'))
}

pub fn parse_pid(arg: &str) -> Result<i32, CommandError> {
    let (digits, radix) = if looks_hex(arg) {
        let stripped = arg
            .strip_prefix("0x")
            .or_else(|| arg.strip_prefix("0X"))
            .unwrap_or(arg);
        (stripped, 16)
    } else {
        (arg, 10)
    };
    i32::from_str_radix(digits, radix).map_err(|_| CommandError::InvalidPid(arg.to_string()))
}

fn parse_hex_pattern(arg: &str) -> Result<Vec<u8>, CommandError> {
    let compact: String = arg.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(CommandError::EmptyPattern);
    }
    if compact.len() % 2 != 0 {
        return Err(CommandError::InvalidHex(arg.to_string()));
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .map_err(|_| CommandError::InvalidHex(arg.to_string()))
        })
        .collect()
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "p" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("PID"));
                }
                Ok(Self::SelectTarget(parse_pid(rest)?))
            }
            "lp" => Ok(Self::ListProcesses),
            "lM" => Ok(Self::ListModules),
            "lt" => Ok(Self::ListThreads),
            "th" => Ok(Self::TraverseHeaps(HeapMode::Plain)),
            "the" => Ok(Self::TraverseHeaps(HeapMode::Entropy)),
            "thb" => Ok(Self::TraverseHeaps(HeapMode::Blocks)),
            "s" => {
                if rest.is_empty() {
                    return Err(CommandError::EmptyPattern);
                }
                Ok(Self::Scan(rest.as_bytes().to_vec()))
            }
            "sx" => Ok(Self::Scan(parse_hex_pattern(rest)?)),
            "h" | "?" => Ok(Self::Help),
            "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Only these run without a selected target.
    pub fn needs_target(&self) -> bool {
        !matches!(
            self,
            Self::SelectTarget(_) | Self::ListProcesses | Self::Help | Self::Quit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_decimal() {
        assert_eq!(Command::parse("p 1234"), Ok(Command::SelectTarget(1234)));
    }

    #[test]
    fn test_pid_hex_prefix() {
        assert_eq!(Command::parse("p 0x10"), Ok(Command::SelectTarget(16)));
    }

    #[test]
    fn test_pid_hex_by_digit() {
        // No prefix, but 'a' can only be hex.
        assert_eq!(Command::parse("p 1a"), Ok(Command::SelectTarget(0x1a)));
        assert_eq!(Command::parse("p 1A"), Ok(Command::SelectTarget(0x1a)));
    }

    #[test]
    fn test_pid_invalid() {
        assert!(matches!(Command::parse("p zz"), Err(CommandError::InvalidPid(_))));
        assert_eq!(Command::parse("p"), Err(CommandError::MissingArgument("PID")));
    }

    #[test]
    fn test_listings() {
        assert_eq!(Command::parse("lp"), Ok(Command::ListProcesses));
        assert_eq!(Command::parse("lM"), Ok(Command::ListModules));
        assert_eq!(Command::parse("lt"), Ok(Command::ListThreads));
    }

    #[test]
    fn test_heap_modes() {
        assert_eq!(Command::parse("th"), Ok(Command::TraverseHeaps(HeapMode::Plain)));
        assert_eq!(Command::parse("the"), Ok(Command::TraverseHeaps(HeapMode::Entropy)));
        assert_eq!(Command::parse("thb"), Ok(Command::TraverseHeaps(HeapMode::Blocks)));
    }

    #[test]
    fn test_ascii_pattern_keeps_inner_spaces() {
        assert_eq!(
            Command::parse("s hello world"),
            Ok(Command::Scan(b"hello world".to_vec()))
        );
        assert_eq!(Command::parse("s"), Err(CommandError::EmptyPattern));
    }

    #[test]
    fn test_hex_pattern_forms() {
        assert_eq!(
            Command::parse("sx 4e 45 45 44"),
            Ok(Command::Scan(vec![0x4e, 0x45, 0x45, 0x44]))
        );
        assert_eq!(
            Command::parse("sx 4E454544"),
            Ok(Command::Scan(vec![0x4e, 0x45, 0x45, 0x44]))
        );
        assert!(matches!(Command::parse("sx 4e4"), Err(CommandError::InvalidHex(_))));
        assert!(matches!(Command::parse("sx zz"), Err(CommandError::InvalidHex(_))));
        assert_eq!(Command::parse("sx"), Err(CommandError::EmptyPattern));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(Command::parse("frobnicate"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_target_requirement() {
        assert!(!Command::parse("lp").unwrap().needs_target());
        assert!(!Command::parse("h").unwrap().needs_target());
        assert!(!Command::parse("q").unwrap().needs_target());
        assert!(Command::parse("lM").unwrap().needs_target());
        assert!(Command::parse("s abc").unwrap().needs_target());
        assert!(Command::parse("th").unwrap().needs_target());
    }
}
