// macOS has no tunnel character device. utun interfaces are created by connecting a
// PF_SYSTEM socket to the utun kernel control, and the connected socket is then the
// descriptor packets flow through.

mod bindings;
mod ioctl;

use std::mem;
use std::os::unix::io::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};

use nix::errno::Errno;
use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::libc;
use nix::sys::socket::{self, AddressFamily, SockFlag, SockProtocol, SockType};

use crate::config::{Config, Mode};
use crate::error::{Error, Result};
use crate::frame::Framing;
use crate::name::{self, IFNAMSIZ};

use self::bindings::{ctl_info, sockaddr_ctl};
use super::Platform;

pub(crate) struct Darwin;

impl Platform for Darwin {
    // utun has no way to turn off the protocol family header.
    const FRAMING: Framing = Framing::ProtocolFamily {
        inet: libc::AF_INET as u16,
        inet6: libc::AF_INET6 as u16,
    };

    fn open(config: &Config) -> Result<(OwnedFd, String)> {
        if config.mode == Mode::Tap {
            return Err(Error::Unsupported("TAP mode"));
        }
        if config.multi_queue {
            return Err(Error::Unsupported("multiqueue"));
        }
        if !config.name.is_empty() {
            log::debug!("utun picks its own names, ignoring {:?}", config.name);
        }

        let fd = socket::socket(
            AddressFamily::System,
            SockType::Datagram,
            SockFlag::empty(),
            SockProtocol::KextControl,
        )
        .map_err(|err| Error::create("open a kernel control socket", err))?;

        // Closes the socket on every early return below.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let mut info = ctl_info::new(bindings::UTUN_CONTROL_NAME);
        unsafe { ioctl::ctliocginfo(fd.as_raw_fd(), &mut info) }
            .map_err(|err| Error::create("look up the utun kernel control", err))?;

        let addr = sockaddr_ctl::new(info.ctl_id, 0);
        Errno::result(unsafe {
            libc::connect(
                fd.as_raw_fd(),
                &addr as *const sockaddr_ctl as *const libc::sockaddr,
                mem::size_of::<sockaddr_ctl>() as libc::socklen_t,
            )
        })
        .map_err(|err| Error::create("connect to the utun kernel control", err))?;

        let name = utun_name(fd.as_raw_fd())?;

        set_nonblocking(fd.as_raw_fd())
            .map_err(|err| Error::create("make the utun socket non-blocking", err))?;

        Ok((fd, name))
    }

    fn configure(_fd: BorrowedFd<'_>, config: &Config) -> Result<()> {
        // utun devices live exactly as long as their socket and have no owner of their own.
        if config.persist || config.permissions.is_some() {
            log::debug!("utun does not support persistence or permissions, ignoring them");
        }

        Ok(())
    }
}

fn utun_name(fd: libc::c_int) -> Result<String> {
    let mut raw = [0u8; IFNAMSIZ];
    let mut len = raw.len() as libc::socklen_t;

    Errno::result(unsafe {
        libc::getsockopt(
            fd,
            bindings::SYSPROTO_CONTROL,
            bindings::UTUN_OPT_IFNAME,
            raw.as_mut_ptr() as *mut libc::c_void,
            &mut len,
        )
    })
    .map_err(|err| Error::NameResolution(err.into()))?;

    // `len` counts the terminating NUL, which `decode` stops at.
    name::decode(&raw[..(len as usize).min(IFNAMSIZ)])
}

fn set_nonblocking(fd: libc::c_int) -> nix::Result<()> {
    let flags = OFlag::from_bits_truncate(fcntl::fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl::fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    fcntl::fcntl(fd, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;

    Ok(())
}
