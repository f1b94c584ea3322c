//! Command execution: side effects plus the response line.

use core::fmt::Write;

#[cfg(feature = "defmt")]
use defmt::{debug, warn};

use super::Command;
use crate::config::{DEVICE_ID, RESPONSE_CAPACITY};
use crate::error::Error;
use crate::sampling::LightSensor;
use crate::storage::{ByteStore, NonVolatileLog};

/// One formatted response line, `\n` included.
pub type Response = heapless::String<RESPONSE_CAPACITY>;

/// Run `cmd` and build its response. `Ok(None)` means nothing to send.
pub fn execute<S, L>(
    cmd: Command,
    sensor: &mut L,
    log: &mut NonVolatileLog<S>,
) -> Result<Option<Response>, Error>
where
    S: ByteStore,
    L: LightSensor + ?Sized,
{
    #[cfg(feature = "defmt")]
    debug!("Serial command: {}", cmd);

    let mut out = Response::new();
    let written = match cmd {
        Command::Ping => write!(out, "PONG\n"),
        Command::Id => write!(out, "{}\n", DEVICE_ID),
        Command::Measure => {
            let value = sensor.read_light();
            write!(out, "{}\n", value)
        }
        Command::MemStatus => {
            let count = log.occupancy()?;
            write!(out, "{}\n", count)
        }
        Command::Reset => {
            log.reset()?;
            return Ok(None);
        }
        Command::Record => {
            let value = sensor.read_light();
            log.append(value)?;
            write!(out, "{}\n", value)
        }
        Command::Get(Some(address)) => {
            let value = log.read(address)?;
            write!(out, "EEPROM value[{}] = {}\n", address, value)
        }
        Command::Get(None) => {
            #[cfg(feature = "defmt")]
            warn!("GET: missing or out-of-range address");
            return Ok(None);
        }
    };
    written.map_err(|_| Error::ResponseOverflow)?;

    Ok(Some(out))
}
