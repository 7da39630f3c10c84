// Control calls of the tunnel driver, `linux/if_tun.h`. All of them are declared as
// `_IOW('T', nr, int)`, so the argument is passed as a plain integer even when the driver
// actually treats it as a pointer to an `ifreq`.

// Can be used to set the flags and name of the TUN/TAP device, creating it if needed.
// The kernel writes the final name back into the `ifreq`.
nix::ioctl_write_int!(tunsetiff, 'T', 202);

// Can be used to make the TUN/TAP device persistent. In this mode,
// the device won't be destroyed when the last process closes the associated file descriptor.
nix::ioctl_write_int!(tunsetpersist, 'T', 203);

// Can be used to assign a persistent device to a given user or a whole group
// in order to give a non-root user access to a TUN/TAP device.
nix::ioctl_write_int!(tunsetowner, 'T', 204);
nix::ioctl_write_int!(tunsetgroup, 'T', 206);

// Can be used to attach or detach a queue of a multiqueue device.
nix::ioctl_write_int!(tunsetqueue, 'T', 217);

#[cfg(all(
    test,
    any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "riscv64"
    )
))]
mod tests {
    use std::mem::size_of;

    use nix::libc::c_int;

    // Architectures using the generic `asm-generic/ioctl.h` encoding.
    #[test]
    fn request_codes_match_if_tun_h() {
        let codes = [
            (202, 0x4004_54ca), // TUNSETIFF
            (203, 0x4004_54cb), // TUNSETPERSIST
            (204, 0x4004_54cc), // TUNSETOWNER
            (206, 0x4004_54ce), // TUNSETGROUP
            (217, 0x4004_54d9), // TUNSETQUEUE
        ];

        for (nr, code) in codes {
            assert_eq!(
                nix::request_code_write!('T', nr, size_of::<c_int>()) as u32,
                code,
                "request number {nr}"
            );
        }
    }
}
