// Interface names cross the kernel boundary as fixed width, NUL padded byte arrays.
// IFNAMSIZ is 16 on both Linux (`linux/if.h`) and macOS (`net/if.h`), and the last byte
// is always reserved for the terminating NUL.

use std::io;

use crate::error::{Error, Result};

pub(crate) const IFNAMSIZ: usize = 16;

/// Copies `name` into a zeroed name field, rejecting names the kernel would truncate.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn encode(name: &str) -> Result<[u8; IFNAMSIZ]> {
    let bytes = name.as_bytes();
    if bytes.len() >= IFNAMSIZ || bytes.contains(&0) {
        return Err(Error::InvalidName(name.to_owned()));
    }

    let mut raw = [0u8; IFNAMSIZ];
    raw[..bytes.len()].copy_from_slice(bytes);

    Ok(raw)
}

/// Reads a name back from a kernel filled field, stopping at the first NUL.
pub(crate) fn decode(raw: &[u8]) -> Result<String> {
    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());

    match std::str::from_utf8(&raw[..len]) {
        Ok("") => Err(Error::NameResolution(io::Error::new(
            io::ErrorKind::InvalidData,
            "kernel returned an empty interface name",
        ))),
        Ok(name) => Ok(name.to_owned()),
        Err(err) => Err(Error::NameResolution(io::Error::new(
            io::ErrorKind::InvalidData,
            err,
        ))),
    }
}
