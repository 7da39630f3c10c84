#![allow(non_camel_case_types)]
#![allow(dead_code)]

// Structures the tunnel driver exchanges with userspace. They mirror `linux/if.h`; only the
// members the driver reads or writes are named.

use nix::libc::c_short;

use crate::name::IFNAMSIZ;

use super::flags::TunFlags;

// struct ifreq {
//     char ifr_name[IFNAMSIZ];
//     union {
//         ...
//         short ifru_flags;
//         ...
//         struct ifmap ifru_map;
//         ...
//     } ifr_ifru;
// };
//
// `struct ifmap` is the largest member of the union, making it 24 bytes and the whole struct
// 40 bytes on 64-bit targets. 32-bit kernels copy less than that, which is fine since the
// request is only ever read up to `ifr_flags`.
#[repr(C)]
pub struct ifreq {
    pub ifr_name: [u8; IFNAMSIZ],
    pub ifr_flags: c_short,
    _ifr_pad: [u8; 22],
}

impl ifreq {
    pub(crate) fn new(ifr_name: [u8; IFNAMSIZ], flags: TunFlags) -> Self {
        ifreq {
            ifr_name,
            ifr_flags: flags.bits(),
            _ifr_pad: [0; 22],
        }
    }
}
