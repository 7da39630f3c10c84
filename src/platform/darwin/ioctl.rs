use super::bindings::ctl_info;

// #define CTLIOCGINFO _IOWR('N', 3, struct ctl_info)
//
// Resolves the name of a kernel control into its id.
nix::ioctl_readwrite!(ctliocginfo, 'N', 3, ctl_info);

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;

    #[test]
    fn request_code_matches_kern_control_h() {
        assert_eq!(
            nix::request_code_readwrite!('N', 3, size_of::<ctl_info>()) as u32,
            0xc064_4e03
        );
    }
}
