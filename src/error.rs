use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Interface name {0:?} is longer than 15 bytes or contains a NUL byte")]
    InvalidName(String),

    #[error("Multiqueue len cannot be zero")]
    ZeroLenMultiQueue,

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("Failed to {op}: {source}")]
    Create {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Failed to set the {option} of the interface: {source}")]
    Configure {
        option: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resolve the name assigned by the kernel: {0}")]
    NameResolution(#[source] io::Error),

    #[error("{0}")]
    IOError(#[from] io::Error),

    #[error("{0}")]
    NixError(#[from] nix::Error),
}

impl Error {
    pub(crate) fn create(op: &'static str, err: impl Into<io::Error>) -> Self {
        Error::Create {
            op,
            source: err.into(),
        }
    }

    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub(crate) fn configure(option: &'static str, err: impl Into<io::Error>) -> Self {
        Error::Configure {
            option,
            source: err.into(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::IOError(io_err) => return io_err,
            Error::NixError(errno) => return errno.into(),
            Error::Create { ref source, .. }
            | Error::Configure { ref source, .. }
            | Error::NameResolution(ref source) => source.kind(),
            Error::InvalidName(_) | Error::ZeroLenMultiQueue => io::ErrorKind::InvalidInput,
            Error::Unsupported(_) => io::ErrorKind::Unsupported,
        };

        io::Error::new(kind, err)
    }
}
