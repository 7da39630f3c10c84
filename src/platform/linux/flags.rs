use nix::libc::c_short;

bitflags::bitflags! {
    // Flags understood by TUNSETIFF and TUNSETQUEUE, from `linux/if_tun.h`.
    //
    // IFF_TUN           Exchange IP packets.
    // IFF_TAP           Exchange Ethernet frames.
    // IFF_NO_PI         Do not prepend the 4 byte `struct tun_pi` to packets.
    // IFF_MULTI_QUEUE   Allow more than one descriptor per device (since Linux 3.8).
    // IFF_ATTACH_QUEUE  Enable a detached queue again.
    // IFF_DETACH_QUEUE  Stop delivering packets to a queue without closing it.
    pub(crate) struct TunFlags: c_short {
        const TUN = nix::libc::IFF_TUN as c_short;
        const TAP = nix::libc::IFF_TAP as c_short;
        const NO_PI = nix::libc::IFF_NO_PI as c_short;
        const MULTI_QUEUE = nix::libc::IFF_MULTI_QUEUE as c_short;
        const ATTACH_QUEUE = nix::libc::IFF_ATTACH_QUEUE as c_short;
        const DETACH_QUEUE = nix::libc::IFF_DETACH_QUEUE as c_short;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_match_if_tun_h() {
        assert_eq!(TunFlags::TUN.bits(), 0x0001);
        assert_eq!(TunFlags::TAP.bits(), 0x0002);
        assert_eq!(TunFlags::NO_PI.bits(), 0x1000);
        assert_eq!(TunFlags::MULTI_QUEUE.bits(), 0x0100);
        assert_eq!(TunFlags::ATTACH_QUEUE.bits(), 0x0200);
        assert_eq!(TunFlags::DETACH_QUEUE.bits(), 0x0400);
    }
}
