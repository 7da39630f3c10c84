use nix::unistd::{Gid, Uid};

/// Indicates the type of the interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Exchanges raw IP packets.
    #[default]
    Tun,
    /// Exchanges raw Ethernet frames. Only available on Linux.
    Tap,
}

/// Owner and group applied to the device, where the platform supports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub owner: Uid,
    pub group: Gid,
}

/// Parameters used to create an [`Interface`](crate::Interface).
///
/// ```
/// use tundev::{Config, Mode};
///
/// let config = Config::tun("tun%d").persist(true);
/// assert_eq!(config.mode, Mode::Tun);
/// assert!(config.persist);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Suggested name of the interface.
    ///
    /// On Linux the kernel honors it, expanding a `%d` into the first free index, and picks a
    /// name itself when it is empty. On macOS it is ignored and the kernel assigns `utunN`.
    pub name: String,

    pub mode: Mode,

    /// Keep the device around after the last descriptor referencing it is closed.
    pub persist: bool,

    pub permissions: Option<Permissions>,

    /// Allow several descriptors to be bound to the same device. Linux only.
    pub multi_queue: bool,
}

impl Config {
    pub fn tun(name: impl Into<String>) -> Self {
        Config {
            name: name.into(),
            mode: Mode::Tun,
            ..Default::default()
        }
    }

    pub fn tap(name: impl Into<String>) -> Self {
        Config {
            name: name.into(),
            mode: Mode::Tap,
            ..Default::default()
        }
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn permissions(mut self, owner: Uid, group: Gid) -> Self {
        self.permissions = Some(Permissions { owner, group });
        self
    }

    pub fn multi_queue(mut self, multi_queue: bool) -> Self {
        self.multi_queue = multi_queue;
        self
    }
}
