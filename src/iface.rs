use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, IntoRawFd, RawFd};
use std::{fmt, fs, io};

use crate::config::Config;
use crate::error::Result;
use crate::platform::{Native, Platform};

/// A TUN/TAP interface, readable and writable one packet at a time.
///
/// The descriptor is non-blocking: when no packet is pending, or the device cannot take
/// one, reads and writes fail with [`io::ErrorKind::WouldBlock`]. Waiting for readiness is
/// up to the caller, using the descriptor exposed through [`AsRawFd`].
///
/// Packets never carry a platform header. On macOS, where the kernel puts a protocol family
/// in front of every packet, the header is stripped on reads and added on writes.
///
/// Unless the device was made persistent, it is removed once the last descriptor bound to
/// it is closed.
pub struct Interface {
    file: fs::File,

    // Name chosen by the kernel.
    name: String,
}

impl Interface {
    /// Creates a new interface described by `config`.
    ///
    /// # Returns
    /// * `Ok`: Containing the interface, its descriptor open and non-blocking.
    /// * `Err`: If the device could not be created or configured. No descriptor is left open.
    pub fn new(config: &Config) -> Result<Self> {
        let (fd, name) = Native::open(config)?;

        // On failure `fd` is dropped here, which also tears down a non-persistent device.
        Native::configure(fd.as_fd(), config)?;

        log::debug!("created {:?} interface {name}", config.mode);

        Ok(Interface {
            file: fs::File::from(fd),
            name,
        })
    }

    /// Returns the name of the device chosen by the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads one packet from the device into `buf`.
    ///
    /// # Returns
    /// * `Ok`: Containing the length of the packet.
    /// * `Err`: If nothing could be read, including a `WouldBlock` when no packet is pending.
    pub fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        Ok(Native::FRAMING.read(&self.file, buf)?)
    }

    /// Writes the packet in `buf` to the device.
    ///
    /// # Returns
    /// * `Ok`: Containing the number of bytes of `buf` written.
    /// * `Err`: If the packet could not be written.
    ///
    /// # Panics
    /// On macOS, if `buf` is not an IPv4 or IPv6 packet.
    pub fn send(&self, buf: &[u8]) -> Result<usize> {
        Ok(Native::FRAMING.write(&self.file, buf)?)
    }

    /// Closes the descriptor, reporting errors that dropping the interface would ignore.
    pub fn close(self) -> Result<()> {
        log::debug!("closing interface {}", self.name);

        nix::unistd::close(self.file.into_raw_fd())?;

        Ok(())
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}

impl io::Read for Interface {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Native::FRAMING.read(&self.file, buf)
    }
}

impl io::Read for &Interface {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Native::FRAMING.read(&self.file, buf)
    }
}

impl io::Write for Interface {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Native::FRAMING.write(&self.file, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &Interface {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Native::FRAMING.write(&self.file, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsFd for Interface {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for Interface {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}
