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
    use std::io::{self, Read};
    use std::net::UdpSocket;
    use std::process::Command;

    use etherparse::{IpHeader, PacketHeaders, TransportHeader};
    use tundev::{Config, Interface};

    fn ip(args: &[&str]) {
        let status = Command::new("ip").args(args).status().unwrap();
        assert!(status.success(), "ip {args:?} failed");
    }

    pub(super) fn main() {
        let mut iface = Interface::new(&Config::tun("tun10")).unwrap();

        ip(&["addr", "add", "10.10.10.1/24", "dev", iface.name()]);
        ip(&["link", "set", "dev", iface.name(), "up"]);

        let data = [1; 10];
        let udp_socket = UdpSocket::bind("10.10.10.1:33333").unwrap();
        udp_socket.send_to(&data, "10.10.10.2:44444").unwrap();

        let mut buf = [0; 1500];
        loop {
            let bytes_read = match iface.read(&mut buf) {
                Ok(bytes_read) => bytes_read,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
                Err(err) => panic!("{err}"),
            };

            if let Ok(packet) = PacketHeaders::from_ip_slice(&buf[..bytes_read]) {
                let ip_h = packet.ip.unwrap();
                let transport_h = packet.transport.unwrap();
                if let (IpHeader::Version4(ipv4_h, _), TransportHeader::Udp(udp_h)) =
                    (ip_h, transport_h)
                {
                    assert_eq!(ipv4_h.source, [10, 10, 10, 1]);
                    assert_eq!(ipv4_h.destination, [10, 10, 10, 2]);
                    assert_eq!(udp_h.source_port, 33333);
                    assert_eq!(udp_h.destination_port, 44444);
                    assert_eq!(packet.payload, data);
                    break;
                }
            }
        }

        println!("received the datagram through {}", iface.name());
    }
}
