//! Serial command protocol.
//!
//! One command per `\n`-terminated ASCII line. A line selects the first
//! table entry whose name it starts with, so matching is case-sensitive
//! and by prefix: `IDENTIFY` is answered as `ID`, `PINGPONG` as `PING`.
//!
//! | line | response |
//! |---|---|
//! | `PING` | `PONG` |
//! | `ID` | device id string |
//! | `MEASURE` | one sample, not stored |
//! | `MEMSTATUS` | stored sample count |
//! | `RESET` | none (log truncated) |
//! | `RECORD` | one sample, stored |
//! | `GET <n>` | `EEPROM value[n] = <byte>` |

pub mod dispatcher;


pub use dispatcher::{execute, Response};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    Ping,
    Id,
    Measure,
    MemStatus,
    Reset,
    Record,
    Get,
}

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub kind: CommandKind,
}

/// All available commands, in match order.
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "PING", kind: CommandKind::Ping },
    CommandDescriptor { name: "ID", kind: CommandKind::Id },
    CommandDescriptor { name: "MEASURE", kind: CommandKind::Measure },
    CommandDescriptor { name: "MEMSTATUS", kind: CommandKind::MemStatus },
    CommandDescriptor { name: "RESET", kind: CommandKind::Reset },
    CommandDescriptor { name: "RECORD", kind: CommandKind::Record },
    CommandDescriptor { name: "GET", kind: CommandKind::Get },
];

/// A parsed command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Ping,
    Id,
    Measure,
    MemStatus,
    Reset,
    Record,
    /// `None` when the argument is missing, not a number, or above 255.
    Get(Option<u8>),
}

impl Command {
    /// Match a terminated line token against [`COMMANDS`].
    pub fn parse(token: &[u8]) -> Option<Self> {
        let descriptor = COMMANDS
            .iter()
            .find(|c| token.starts_with(c.name.as_bytes()))?;

        Some(match descriptor.kind {
            CommandKind::Ping => Command::Ping,
            CommandKind::Id => Command::Id,
            CommandKind::Measure => Command::Measure,
            CommandKind::MemStatus => Command::MemStatus,
            CommandKind::Reset => Command::Reset,
            CommandKind::Record => Command::Record,
            CommandKind::Get => Command::Get(parse_address(token)),
        })
    }
}

/// Address argument of `GET`: leading digits of the second
/// whitespace-separated token.
fn parse_address(token: &[u8]) -> Option<u8> {
    let arg = token
        .split(|b| b.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .nth(1)?;

    let digits = arg.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let value = arg[..digits].iter().fold(0u16, |acc, &b| {
        acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
    });
    u8::try_from(value).ok()
}
