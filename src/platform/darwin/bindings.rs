#![allow(non_camel_case_types)]
#![allow(dead_code)]

// Kernel control structures from `sys/kern_control.h` and the utun specifics from
// `net/if_utun.h`.

use nix::libc::{c_int, c_uchar};

// Name under which the utun driver registers its kernel control.
pub(crate) const UTUN_CONTROL_NAME: &str = "com.apple.net.utun_control";

// #define MAX_KCTL_NAME 96
pub(crate) const MAX_KCTL_NAME: usize = 96;

// #define AF_SYS_CONTROL 2, the `ss_sysaddr` of kernel control addresses.
pub(crate) const AF_SYS_CONTROL: u16 = 2;

// #define SYSPROTO_CONTROL 2, also the option level of utun socket options.
pub(crate) const SYSPROTO_CONTROL: c_int = 2;

// #define UTUN_OPT_IFNAME 2
pub(crate) const UTUN_OPT_IFNAME: c_int = 2;

// struct ctl_info {
//     u_int32_t ctl_id;
//     char      ctl_name[MAX_KCTL_NAME];
// };
#[repr(C)]
pub struct ctl_info {
    pub ctl_id: u32,
    pub ctl_name: [u8; MAX_KCTL_NAME],
}

impl ctl_info {
    // Request for the id of the control registered under `name`.
    pub(crate) fn new(name: &str) -> Self {
        let mut ctl_name = [0u8; MAX_KCTL_NAME];
        ctl_name[..name.len()].copy_from_slice(name.as_bytes());

        ctl_info {
            ctl_id: 0,
            ctl_name,
        }
    }
}

// struct sockaddr_ctl {
//     u_char    sc_len;
//     u_char    sc_family;
//     u_int16_t ss_sysaddr;
//     u_int32_t sc_id;
//     u_int32_t sc_unit;
//     u_int32_t sc_reserved[5];
// };
#[repr(C)]
pub struct sockaddr_ctl {
    pub sc_len: c_uchar,
    pub sc_family: c_uchar,
    pub ss_sysaddr: u16,
    pub sc_id: u32,
    pub sc_unit: u32,
    pub sc_reserved: [u32; 5],
}

impl sockaddr_ctl {
    // Address of unit `unit` of the control `id`. Unit 0 lets the kernel pick the first free
    // one; unit N + 1 would ask for `utunN`.
    pub(crate) fn new(id: u32, unit: u32) -> Self {
        sockaddr_ctl {
            sc_len: std::mem::size_of::<sockaddr_ctl>() as c_uchar,
            sc_family: nix::libc::AF_SYSTEM as c_uchar,
            ss_sysaddr: AF_SYS_CONTROL,
            sc_id: id,
            sc_unit: unit,
            sc_reserved: [0; 5],
        }
    }
}
