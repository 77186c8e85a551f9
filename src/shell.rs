//! Line-oriented command shell over one allocator.
//!
//! Translates text commands into allocator calls and formats the results.
//! The shell holds no allocation state of its own beyond its allocator.

extern crate std;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::num::IntErrorKind;
use std::io::{self, BufRead, Write};

use clap::Parser;
#[cfg(feature = "log")]
use log::{debug, info};

use crate::{BuddyAllocator, BuddyResult};

/// Pool size used when neither an argument nor the environment gives one.
pub const DEFAULT_TOTAL_UNITS: usize = 8;

/// Environment variable consulted when no pool size argument is given.
pub const TOTAL_UNITS_ENV: &str = "BUDDY_TOTAL_UNITS";

const DEFAULT_PROMPT: &str = "ACTION> ";
const USAGE_RESERVE: &str = "Usage: RESERVE <count> <name>";
const USAGE_FREE: &str = "Usage: FREE <name>";

/// Command-line arguments of `buddy-shell`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "buddy-shell",
    about = "Reserve and free named blocks from a buddy-managed pool of units"
)]
pub struct ShellArgs {
    /// Pool size in units, a power of two
    #[arg(env = TOTAL_UNITS_ENV, default_value_t = DEFAULT_TOTAL_UNITS)]
    pub total_units: usize,

    #[arg(long, value_name = "STR", default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Skip the startup banner
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_banner: bool,
}

/// Runtime settings for a [`Shell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub total_units: usize,
    pub prompt: String,
    pub banner: bool,
}

impl ShellConfig {
    pub fn new(total_units: usize) -> Self {
        Self {
            total_units,
            prompt: DEFAULT_PROMPT.to_string(),
            banner: true,
        }
    }
}

impl From<ShellArgs> for ShellConfig {
    fn from(args: ShellArgs) -> Self {
        Self {
            total_units: args.total_units,
            prompt: args.prompt,
            banner: !args.no_banner,
        }
    }
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reserve `count` units under `name`. The count stays signed so that
    /// non-positive requests reach the allocator's size check.
    Reserve { count: i128, name: String },
    Free { name: String },
    Show,
    Exit,
}

/// Lines that do not form a valid command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("ERROR: expected a numeric value")]
    NotNumeric,
    #[error("ERROR: input is not valid UTF-8")]
    NotUtf8,
    #[error("Unknown action. Valid: RESERVE, FREE, SHOW, EXIT")]
    UnknownVerb,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// Verbs are case-insensitive; the Spanish verbs `RESERVAR`, `LIBERAR`,
    /// `MOSTRAR` and `SALIR` are accepted as aliases.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(verb) = tokens.first() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_uppercase().as_str() {
            "RESERVE" | "RESERVAR" => {
                let [_, count, name] = tokens.as_slice() else {
                    return Err(CommandError::Usage(USAGE_RESERVE));
                };
                let count = parse_count(count)?;
                Self::Reserve {
                    count,
                    name: name.to_string(),
                }
            }
            "FREE" | "LIBERAR" => {
                let [_, name] = tokens.as_slice() else {
                    return Err(CommandError::Usage(USAGE_FREE));
                };
                Self::Free {
                    name: name.to_string(),
                }
            }
            "SHOW" | "MOSTRAR" => Self::Show,
            "EXIT" | "SALIR" => Self::Exit,
            _ => return Err(CommandError::UnknownVerb),
        };
        Ok(Some(command))
    }
}

/// Whether the loop should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive front end owning exactly one allocator.
pub struct Shell {
    allocator: BuddyAllocator,
    config: ShellConfig,
}

impl Shell {
    pub fn new(config: ShellConfig) -> BuddyResult<Self> {
        let allocator = BuddyAllocator::new(config.total_units)?;
        Ok(Self { allocator, config })
    }

    pub fn allocator(&self) -> &BuddyAllocator {
        &self.allocator
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Read commands from `input` until `EXIT` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        if self.config.banner {
            writeln!(
                out,
                "Buddy allocator started with {} units",
                self.allocator.total_units()
            )?;
        }
        info!(
            "shell: started with {} units",
            self.allocator.total_units()
        );

        let mut buf = Vec::new();
        loop {
            write!(out, "{}", self.config.prompt)?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                debug!("shell: end of input");
                break;
            }
            let Ok(line) = core::str::from_utf8(&buf) else {
                debug!("shell: rejected {} bytes of non UTF-8 input", buf.len());
                writeln!(out, "{}", CommandError::NotUtf8)?;
                continue;
            };
            if self.handle_line(line, &mut out)? == Flow::Exit {
                break;
            }
        }
        out.flush()
    }

    /// Parse and execute a single line, writing any output to `out`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command, out),
            Ok(None) => Ok(Flow::Continue),
            Err(err) => {
                debug!("shell: rejected line {:?}: {:?}", line.trim_end(), err);
                writeln!(out, "{}", err)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute a parsed command. Allocator errors are printed, not returned.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        match command {
            Command::Reserve { count, name } => {
                match self.allocator.reserve(units_from_count(count), &name) {
                    Ok(block) => writeln!(
                        out,
                        "Reserved '{}' at start {}, size {} (order {})",
                        name,
                        block.start,
                        block.size(),
                        block.order
                    )?,
                    Err(err) => writeln!(out, "ERROR: {}", err)?,
                }
            }
            Command::Free { name } => match self.allocator.free(&name) {
                Ok(_) => writeln!(out, "Freed '{}'", name)?,
                Err(err) => writeln!(out, "ERROR: {}", err)?,
            },
            Command::Show => writeln!(out, "{}", self.allocator.inspect())?,
            Command::Exit => {
                writeln!(out, "Bye")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Parse a count token. Integers too wide for `i128` saturate so that they
/// still reach the allocator, which reports them as out of space.
fn parse_count(token: &str) -> Result<i128, CommandError> {
    match token.parse::<i128>() {
        Ok(count) => Ok(count),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i128::MAX),
            IntErrorKind::NegOverflow => Ok(i128::MIN),
            _ => Err(CommandError::NotNumeric),
        },
    }
}

/// Convert a signed count from the command line into a unit count.
///
/// Non-positive counts map to zero so the allocator still checks the name
/// before rejecting the size. Counts beyond `usize` saturate, which the
/// allocator reports as out of space.
fn units_from_count(count: i128) -> usize {
    if count <= 0 {
        return 0;
    }
    usize::try_from(count).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("RESERVE 3 foo"),
            Ok(Some(Command::Reserve {
                count: 3,
                name: "foo".into()
            }))
        );
        assert_eq!(
            Command::parse("  free   foo \n"),
            Ok(Some(Command::Free { name: "foo".into() }))
        );
        assert_eq!(Command::parse("Show"), Ok(Some(Command::Show)));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Exit)));
        assert_eq!(Command::parse("   \n"), Ok(None));
    }

    #[test]
    fn test_parse_spanish_aliases() {
        assert_eq!(
            Command::parse("reservar 2 bar"),
            Ok(Some(Command::Reserve {
                count: 2,
                name: "bar".into()
            }))
        );
        assert_eq!(
            Command::parse("LIBERAR bar"),
            Ok(Some(Command::Free { name: "bar".into() }))
        );
        assert_eq!(Command::parse("mostrar"), Ok(Some(Command::Show)));
        assert_eq!(Command::parse("SALIR"), Ok(Some(Command::Exit)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("RESERVE 3"),
            Err(CommandError::Usage(USAGE_RESERVE))
        );
        assert_eq!(
            Command::parse("FREE a b"),
            Err(CommandError::Usage(USAGE_FREE))
        );
        assert_eq!(
            Command::parse("RESERVE three foo"),
            Err(CommandError::NotNumeric)
        );
        assert_eq!(Command::parse("DANCE"), Err(CommandError::UnknownVerb));
        assert_eq!(
            Command::parse("RESERVE -1 neg"),
            Ok(Some(Command::Reserve {
                count: -1,
                name: "neg".into()
            }))
        );
    }

    #[test]
    fn test_units_from_count() {
        assert_eq!(units_from_count(5), 5);
        assert_eq!(units_from_count(0), 0);
        assert_eq!(units_from_count(-1), 0);
        assert_eq!(units_from_count(i128::MAX), usize::MAX);
    }

    #[test]
    fn test_parse_count_saturates() {
        let huge = "99999999999999999999999999999999999999999999";
        assert_eq!(parse_count(huge), Ok(i128::MAX));
        assert_eq!(parse_count(&alloc::format!("-{huge}")), Ok(i128::MIN));
        assert_eq!(parse_count("12x"), Err(CommandError::NotNumeric));
        assert_eq!(parse_count(""), Err(CommandError::NotNumeric));
        assert_eq!(
            Command::parse(&alloc::format!("RESERVE {huge} big")),
            Ok(Some(Command::Reserve {
                count: i128::MAX,
                name: "big".into()
            }))
        );
    }

    #[test]
    fn test_args_into_config() {
        let args = ShellArgs::try_parse_from(["buddy-shell", "64"]).unwrap();
        let shell = Shell::new(args.into()).unwrap();
        assert_eq!(shell.config(), &ShellConfig::new(64));

        let args =
            ShellArgs::try_parse_from(["buddy-shell", "16", "--prompt", "> ", "--no-banner"])
                .unwrap();
        let config = ShellConfig::from(args);
        assert_eq!(config.total_units, 16);
        assert_eq!(config.prompt, "> ");
        assert!(!config.banner);
    }

    #[test]
    fn test_args_rejected() {
        assert!(ShellArgs::try_parse_from(["buddy-shell", "lots"]).is_err());
        assert!(ShellArgs::try_parse_from(["buddy-shell", "8", "9"]).is_err());
        assert!(ShellArgs::try_parse_from(["buddy-shell", "-3"]).is_err());
    }

    #[test]
    fn test_execute_reports_errors_and_continues() {
        let mut shell = Shell::new(ShellConfig::new(4)).unwrap();
        let mut out = vec![];
        assert_eq!(
            shell.handle_line("RESERVE 0 z", &mut out).unwrap(),
            Flow::Continue
        );
        shell.handle_line("RESERVE 1 a", &mut out).unwrap();
        shell.handle_line("RESERVE -1 a", &mut out).unwrap();
        assert_eq!(
            shell.handle_line("FREE ghost", &mut out).unwrap(),
            Flow::Continue
        );
        assert_eq!(shell.handle_line("EXIT", &mut out).unwrap(), Flow::Exit);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "ERROR: requested unit count must be positive\n\
             Reserved 'a' at start 0, size 1 (order 0)\n\
             ERROR: name 'a' is already reserved\n\
             ERROR: name 'ghost' was not found\n\
             Bye\n"
        );
    }
}
