// Every supported kernel gets a tunnel device to userspace differently. The `Platform` trait
// captures what differs: how a descriptor bound to a device is obtained, how the optional
// settings are applied to it, and the envelope packets carry on it. The implementation is
// picked at compile time.

use std::os::unix::io::{BorrowedFd, OwnedFd};

use crate::config::Config;
use crate::error::Result;
use crate::frame::Framing;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub(crate) type Native = linux::Linux;

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod darwin;
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) type Native = darwin::Darwin;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "ios")))]
compile_error!("tundev supports Linux, macOS and iOS only");

pub(crate) trait Platform {
    /// Envelope the device puts around every packet.
    const FRAMING: Framing;

    /// Obtains a non-blocking descriptor bound to a tunnel device, along with the name the
    /// kernel gave the device.
    fn open(config: &Config) -> Result<(OwnedFd, String)>;

    /// Applies ownership and persistence to the device behind `fd`.
    fn configure(fd: BorrowedFd<'_>, config: &Config) -> Result<()>;
}
