use std::io::{self, IoSlice, IoSliceMut, Read, Write};

// Size of the protocol family header some kernels put in front of every packet.
pub(crate) const HEADER_LEN: usize = 4;

/// The envelope a tunnel device puts around the packets it exchanges with userspace.
///
/// Callers of [`Interface`](crate::Interface) always see bare packets; this is where the
/// difference between what they see and what the kernel wants is absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Framing {
    /// The device reads and writes bare packets.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    Raw,

    /// Every packet is prefixed by 4 bytes: two zero bytes followed by the protocol family
    /// of the payload in network byte order.
    #[cfg_attr(target_os = "linux", allow(dead_code))]
    ProtocolFamily { inet: u16, inet6: u16 },
}

impl Framing {
    /// Reads one packet from `device` into `buf`, without the envelope.
    pub(crate) fn read(&self, mut device: impl Read, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Framing::Raw => device.read(buf),
            Framing::ProtocolFamily { .. } => {
                let mut header = [0u8; HEADER_LEN];
                let read = device.read_vectored(&mut [
                    IoSliceMut::new(&mut header),
                    IoSliceMut::new(buf),
                ])?;

                if read < HEADER_LEN {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("packet of {read} bytes is shorter than the protocol family header"),
                    ));
                }

                Ok(read - HEADER_LEN)
            }
        }
    }

    /// Writes the packet in `buf` to `device`, adding the envelope the device expects.
    ///
    /// Returns the number of payload bytes written, never counting the envelope.
    ///
    /// # Panics
    /// With [`Framing::ProtocolFamily`], if `buf` is not an IPv4 or IPv6 packet. Nothing is
    /// written in that case.
    pub(crate) fn write(&self, mut device: impl Write, buf: &[u8]) -> io::Result<usize> {
        match *self {
            Framing::Raw => device.write(buf),
            Framing::ProtocolFamily { inet, inet6 } => {
                let family = match buf.first().map(|b| b >> 4) {
                    Some(4) => inet,
                    Some(6) => inet6,
                    _ => panic!("unable to determine IP version from packet"),
                };

                let header = header(family);
                let written =
                    device.write_vectored(&[IoSlice::new(&header), IoSlice::new(buf)])?;

                Ok(written.saturating_sub(HEADER_LEN))
            }
        }
    }
}

fn header(family: u16) -> [u8; HEADER_LEN] {
    let [hi, lo] = family.to_be_bytes();

    [0, 0, hi, lo]
}
