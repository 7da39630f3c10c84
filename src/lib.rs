//! tundev creates virtual point-to-point interfaces and hands them to userspace as packet
//! streams: TUN/TAP devices on Linux, utun devices on macOS.
//!
//! Creating, reading from, and writing to a device is done with the [`Interface`] struct,
//! described by a [`Config`]. The device is removed when the `Interface` is dropped unless it
//! was made persistent.
//!
//! ```no_run
//! use std::io::Read;
//!
//! use tundev::{Config, Interface};
//!
//! let mut iface = Interface::new(&Config::tun("tun%d")).unwrap();
//! println!("created {}", iface.name());
//!
//! let mut buf = [0u8; 1500];
//! let _ = iface.read(&mut buf);
//! ```
//!
//! Addresses, routes and the link state are left to the usual system tools.
//!
//! For more info: [tuntap.txt](https://www.kernel.org/doc/Documentation/networking/tuntap.txt)

mod frame;
mod iface;
mod name;

// Device creation for each supported kernel. The kernel facing structures are written by
// hand after `linux/if.h`, `linux/if_tun.h` and `sys/kern_control.h`.
mod platform;

pub mod config;
pub mod error;

pub use config::{Config, Mode, Permissions};
pub use error::{Error, Result};
pub use iface::Interface;
