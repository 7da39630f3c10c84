// Multiqueue interfaces only exist on Linux.

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("multiqueue interfaces are only supported on Linux");
}

#[cfg(target_os = "linux")]
fn main() {
    linux::main()
}

#[cfg(target_os = "linux")]
mod linux {
    use std::net::{IpAddr, Ipv4Addr, UdpSocket};
    use std::process::Command;

    use etherparse::PacketBuilder;
    use tundev::{Config, Interface};

    fn ip(args: &[&str]) {
        let status = Command::new("ip").args(args).status().unwrap();
        assert!(status.success(), "ip {args:?} failed");
    }

    pub(super) fn main() {
        let mq = Interface::new_queues(&Config::tun("tun10"), 3).unwrap();

        ip(&["addr", "add", "10.10.10.1/24", "dev", mq[0].name()]);
        ip(&["link", "set", "dev", mq[0].name(), "up"]);

        let socket = UdpSocket::bind("10.10.10.1:2424").unwrap();

        let data = 2u8.to_be_bytes();
        let builder = PacketBuilder::ipv4([10, 10, 10, 2], [10, 10, 10, 1], 20).udp(4242, 2424);
        let mut packet = Vec::<u8>::with_capacity(builder.size(data.len()));
        builder.write(&mut packet, &data).unwrap();

        // Every queue writes on its own thread; the kernel takes the packets in any order.
        std::thread::scope(|s| {
            mq.iter().for_each(|tun| {
                s.spawn(|| {
                    tun.send(&packet).unwrap();
                });
            });
        });

        let mut buf = [0u8; 3];

        let mut bytes_read = 0;
        while bytes_read != 3 {
            let (read, source) = socket.recv_from(&mut buf[bytes_read..]).unwrap();

            bytes_read += read;

            assert_eq!(source.ip(), IpAddr::V4(Ipv4Addr::new(10, 10, 10, 2)));
            assert_eq!(source.port(), 4242);
        }

        (0..3).for_each(|i| {
            assert_eq!(buf[i], 2u8);
        });
    }
}
