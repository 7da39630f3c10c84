// Addressing is done with `ip`, so this demo only runs on Linux.

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("this demo configures the interface with `ip` and only runs on Linux");
}

#[cfg(target_os = "linux")]
fn main() {
    linux::main()
}

#[cfg(target_os = "linux")]
mod linux {
    use std::io::Write;
    use std::net::{IpAddr, Ipv4Addr, UdpSocket};
    use std::process::Command;

    use etherparse::PacketBuilder;
    use tundev::{Config, Interface};

    fn ip(args: &[&str]) {
        let status = Command::new("ip").args(args).status().unwrap();
        assert!(status.success(), "ip {args:?} failed");
    }

    pub(super) fn main() {
        let mut iface = Interface::new(&Config::tun("tun10")).unwrap();

        ip(&["addr", "add", "10.10.10.1/24", "dev", iface.name()]);
        ip(&["link", "set", "dev", iface.name(), "up"]);

        let socket = UdpSocket::bind("10.10.10.1:2424").unwrap();

        let data = [1; 10];
        let builder = PacketBuilder::ipv4([10, 10, 10, 2], [10, 10, 10, 1], 20).udp(4242, 2424);
        let mut packet = Vec::<u8>::with_capacity(builder.size(data.len()));
        builder.write(&mut packet, &data).unwrap();

        let _ = iface.write(&packet).unwrap();

        let mut buf = [0; 50];
        let (bytes_read, source) = socket.recv_from(&mut buf).unwrap();

        assert_eq!(bytes_read, 10);
        assert_eq!(source.ip(), IpAddr::V4(Ipv4Addr::new(10, 10, 10, 2)));
        assert_eq!(source.port(), 4242);
        assert_eq!(data, &buf[..bytes_read]);
    }
}
