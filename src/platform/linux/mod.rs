// Linux exposes the tunnel driver through the `/dev/net/tun` clone device. Every open of it
// yields a fresh descriptor, which TUNSETIFF then binds to a new or existing interface.
//
// For more info: https://www.kernel.org/doc/Documentation/networking/tuntap.txt

mod bindings;
mod flags;
mod ioctl;

use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, OwnedFd};
use std::{fs, io};

use nix::errno::Errno;
use nix::sys::ioctl::ioctl_param_type;
use nix::sys::stat;
use nix::unistd::{self, Gid, Uid};

use crate::config::{Config, Mode};
use crate::error::{Error, Result};
use crate::frame::Framing;
use crate::iface::Interface;
use crate::name::{self, IFNAMSIZ};

use self::bindings::ifreq;
use self::flags::TunFlags;
use super::Platform;

const TUN_DEVICE_DIR: &str = "/dev/net";
const TUN_DEVICE_PATH: &str = "/dev/net/tun";

// The clone device is the misc character device `MISC_MAJOR:TUN_MINOR`.
const TUN_MAJOR: u64 = 10;
const TUN_MINOR: u64 = 200;

pub(crate) struct Linux;

impl Platform for Linux {
    // IFF_NO_PI is always requested, so the driver neither adds nor expects a header.
    const FRAMING: Framing = Framing::Raw;

    fn open(config: &Config) -> Result<(OwnedFd, String)> {
        // Validate the name before touching the device.
        let mut ifr = ifreq::new(name::encode(&config.name)?, request_flags(config));

        let file = open_clone_device()?;

        unsafe {
            ioctl::tunsetiff(
                file.as_raw_fd(),
                &mut ifr as *mut ifreq as ioctl_param_type,
            )
        }
        .map_err(|err| Error::create("bind the descriptor to a tunnel device", err))?;

        // The kernel may have expanded a `%d` template or picked the name itself.
        let name = name::decode(&ifr.ifr_name)?;

        Ok((file.into(), name))
    }

    fn configure(fd: BorrowedFd<'_>, config: &Config) -> Result<()> {
        if let Some(permissions) = config.permissions {
            set_owner(fd, permissions.owner)?;
            set_group(fd, permissions.group)?;
        }

        set_persist(fd, config.persist)
    }
}

fn request_flags(config: &Config) -> TunFlags {
    let mut flags = match config.mode {
        Mode::Tun => TunFlags::TUN,
        Mode::Tap => TunFlags::TAP,
    };

    flags |= TunFlags::NO_PI;

    if config.multi_queue {
        flags |= TunFlags::MULTI_QUEUE;
    }

    flags
}

// Opens the clone device, creating the device node first if the system lacks it.
fn open_clone_device() -> Result<fs::File> {
    match open_read_write(TUN_DEVICE_PATH) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::warn!("{TUN_DEVICE_PATH} does not exist, creating it");

            create_clone_device().map_err(|err| Error::create("create /dev/net/tun", err))?;

            open_read_write(TUN_DEVICE_PATH).map_err(|err| Error::create("open /dev/net/tun", err))
        }
        result => result.map_err(|err| Error::create("open /dev/net/tun", err)),
    }
}

fn open_read_write(path: &str) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(nix::libc::O_NONBLOCK)
        .open(path)
}

fn create_clone_device() -> nix::Result<()> {
    match unistd::mkdir(TUN_DEVICE_DIR, stat::Mode::from_bits_truncate(0o755)) {
        Ok(()) | Err(Errno::EEXIST) => {}
        Err(err) => return Err(err),
    }

    stat::mknod(
        TUN_DEVICE_PATH,
        stat::SFlag::S_IFCHR,
        stat::Mode::from_bits_truncate(0o666),
        stat::makedev(TUN_MAJOR, TUN_MINOR),
    )
}

fn set_owner(fd: BorrowedFd<'_>, owner: Uid) -> Result<()> {
    unsafe { ioctl::tunsetowner(fd.as_raw_fd(), owner.as_raw() as ioctl_param_type) }
        .map_err(|err| Error::configure("owner", err))?;

    log::debug!("set owner of tunnel device to {owner}");

    Ok(())
}

fn set_group(fd: BorrowedFd<'_>, group: Gid) -> Result<()> {
    unsafe { ioctl::tunsetgroup(fd.as_raw_fd(), group.as_raw() as ioctl_param_type) }
        .map_err(|err| Error::configure("group", err))?;

    log::debug!("set group of tunnel device to {group}");

    Ok(())
}

fn set_persist(fd: BorrowedFd<'_>, persist: bool) -> Result<()> {
    unsafe { ioctl::tunsetpersist(fd.as_raw_fd(), persist as ioctl_param_type) }
        .map_err(|err| Error::configure("persist flag", err))?;

    Ok(())
}

fn set_queue(fd: BorrowedFd<'_>, flags: TunFlags) -> Result<()> {
    let mut ifr = ifreq::new([0; IFNAMSIZ], flags);

    unsafe { ioctl::tunsetqueue(fd.as_raw_fd(), &mut ifr as *mut ifreq as ioctl_param_type)? };

    Ok(())
}

// Linux only operations.
impl Interface {
    /// Creates `count` queues of one multiqueue interface.
    ///
    /// Every queue is bound to the device created by the first one, so a `%d` template in
    /// `config.name` is expanded only once. Packets are spread across the queues by the kernel
    /// and no ordering holds between them.
    ///
    /// # Returns
    /// * `Ok`: Containing one `Interface` per queue.
    /// * `Err`: If `count` is zero or any queue failed to open. Queues opened so far are closed.
    pub fn new_queues(config: &Config, count: usize) -> Result<Vec<Interface>> {
        if count == 0 {
            return Err(Error::ZeroLenMultiQueue);
        }

        let mut config = config.clone();
        config.multi_queue |= count > 1;

        let first = Interface::new(&config)?;
        config.name = first.name().to_owned();

        let mut queues = Vec::with_capacity(count);
        queues.push(first);
        for _ in 1..count {
            queues.push(Interface::new(&config)?);
        }

        Ok(queues)
    }

    /// Attaches this queue to its multiqueue device again, after [`Interface::detach_queue`].
    pub fn attach_queue(&self) -> Result<()> {
        set_queue(self.as_fd(), TunFlags::ATTACH_QUEUE)?;

        log::debug!("attached a queue of {}", self.name());

        Ok(())
    }

    /// Stops the kernel from delivering packets to this queue, without closing it.
    pub fn detach_queue(&self) -> Result<()> {
        set_queue(self.as_fd(), TunFlags::DETACH_QUEUE)?;

        log::debug!("detached a queue of {}", self.name());

        Ok(())
    }

    /// Changes the user that owns the device.
    pub fn set_owner(&self, owner: Uid) -> Result<()> {
        set_owner(self.as_fd(), owner)
    }

    /// Changes the group that owns the device.
    pub fn set_group(&self, group: Gid) -> Result<()> {
        set_group(self.as_fd(), group)
    }

    /// Sets or clears the persist flag of the device. Re-asserting the current state is not
    /// an error.
    pub fn set_persist(&self, persist: bool) -> Result<()> {
        set_persist(self.as_fd(), persist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tun_never_asks_for_packet_info() {
        assert_eq!(
            request_flags(&Config::tun("tun0")),
            TunFlags::TUN | TunFlags::NO_PI
        );
    }

    #[test]
    fn tap_with_multiqueue() {
        assert_eq!(
            request_flags(&Config::tap("").multi_queue(true)),
            TunFlags::TAP | TunFlags::NO_PI | TunFlags::MULTI_QUEUE
        );
    }

    #[test]
    fn invalid_name_fails_before_opening() {
        let err = Linux::open(&Config::tun("a-very-long-interface-name")).unwrap_err();

        assert!(matches!(err, Error::InvalidName(name) if name == "a-very-long-interface-name"));
    }

    #[test]
    fn configure_stops_at_the_first_failing_option() {
        let null = fs::File::open("/dev/null").unwrap();

        let config = Config::tun("").permissions(Uid::current(), Gid::current());
        let err = Linux::configure(null.as_fd(), &config).unwrap_err();
        match &err {
            Error::Configure { option, source } => {
                assert_eq!(*option, "owner");
                assert_eq!(source.raw_os_error(), Some(nix::libc::ENOTTY));
            }
            _ => panic!("{err}"),
        }

        let err = Linux::configure(null.as_fd(), &Config::tun("")).unwrap_err();
        assert!(
            matches!(&err, Error::Configure { option: "persist flag", .. }),
            "{err}"
        );
    }

    #[test]
    fn zero_queues_is_rejected() {
        assert!(matches!(
            Interface::new_queues(&Config::tun("tun%d"), 0),
            Err(Error::ZeroLenMultiQueue)
        ));
    }
}
