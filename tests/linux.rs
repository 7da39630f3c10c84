#![cfg(target_os = "linux")]

// Most of these tests create real devices and therefore need CAP_NET_ADMIN and the `ip`
// tool. Run them with `sudo -E cargo test -- --ignored`.

use std::io::{self, Read, Write};
use std::net::UdpSocket;
use std::os::unix::io::AsRawFd;
use std::process::Command;
use std::time::Duration;

use etherparse::{IpHeader, PacketBuilder, PacketHeaders, TransportHeader};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::unistd::{Gid, Uid};
use tundev::{Config, Error, Interface};

fn ip(args: &[&str]) {
    let status = Command::new("ip").args(args).status().unwrap();
    assert!(status.success(), "ip {args:?} failed");
}

fn is_nonblocking(iface: &Interface) -> bool {
    let flags = OFlag::from_bits_truncate(fcntl(iface.as_raw_fd(), FcntlArg::F_GETFL).unwrap());

    flags.contains(OFlag::O_NONBLOCK)
}

// Smallest valid IPv4 packet: a bare header.
fn minimal_ipv4_packet() -> [u8; 20] {
    let mut packet = [0u8; 20];
    packet[0] = 0x45;
    packet[3] = 20;
    packet[8] = 64;
    packet[9] = 253;
    packet[12..16].copy_from_slice(&[10, 99, 0, 1]);
    packet[16..20].copy_from_slice(&[10, 99, 0, 2]);

    packet
}

#[test]
fn overlong_name_is_rejected() {
    let err = Interface::new(&Config::tun("x".repeat(16))).unwrap_err();

    assert!(matches!(err, Error::InvalidName(_)));
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn kernel_assigns_a_name() {
    let iface = Interface::new(&Config::default()).unwrap();

    assert!(iface.name().starts_with("tun"), "{}", iface.name());
    assert!(iface.name()[3..].parse::<u32>().is_ok(), "{}", iface.name());
    assert!(is_nonblocking(&iface));

    ip(&["link", "set", "dev", iface.name(), "up"]);

    let packet = minimal_ipv4_packet();
    assert_eq!(iface.send(&packet).unwrap(), 20);
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn template_name_is_expanded() {
    let iface = Interface::new(&Config::tun("tundevt%d")).unwrap();

    assert!(iface.name().starts_with("tundevt"));
    assert!(!iface.name().contains('%'));
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn tap_device() {
    let iface = Interface::new(&Config::tap("tundevtap0")).unwrap();

    assert_eq!(iface.name(), "tundevtap0");
    assert!(is_nonblocking(&iface));
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn empty_device_would_block() {
    let iface = Interface::new(&Config::tun("tundevwb0")).unwrap();

    let mut buf = [0u8; 1500];
    let err = io::Error::from(iface.recv(&mut buf).unwrap_err());
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn persist_can_be_asserted_twice_and_cleared() {
    let iface = Interface::new(&Config::tun("tundevp0").persist(true)).unwrap();

    iface.set_persist(true).unwrap();
    iface.set_persist(true).unwrap();
    iface.set_persist(false).unwrap();
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn persistent_device_outlives_its_handle() {
    let config = Config::tun("tundevp1").persist(true);

    Interface::new(&config).unwrap().close().unwrap();

    let status = Command::new("ip")
        .args(["link", "show", "dev", "tundevp1"])
        .status()
        .unwrap();
    assert!(status.success());

    // Reattach and clear the flag so the device goes away with this handle.
    let iface = Interface::new(&config.persist(false)).unwrap();
    assert_eq!(iface.name(), "tundevp1");
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn ownership_is_applied() {
    let config = Config::tun("tundevo0").permissions(Uid::current(), Gid::current());
    let iface = Interface::new(&config).unwrap();

    iface.set_owner(Uid::current()).unwrap();
    iface.set_group(Gid::current()).unwrap();
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn closing_releases_the_device() {
    let config = Config::tun("tundevc0");

    let iface = Interface::new(&config).unwrap();
    iface.close().unwrap();

    let iface = Interface::new(&config).unwrap();
    assert_eq!(iface.name(), "tundevc0");
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn second_handle_without_multiqueue_fails() {
    let config = Config::tun("tundevb0");
    let _first = Interface::new(&config).unwrap();

    let err = Interface::new(&config).unwrap_err();
    assert!(matches!(err, Error::Create { .. }), "{err}");
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn multiqueue_handles_share_a_device() {
    let config = Config::tun("tundevmq0").multi_queue(true);

    let first = Interface::new(&config).unwrap();
    let second = Interface::new(&config).unwrap();
    assert_eq!(first.name(), second.name());
    assert_ne!(first.as_raw_fd(), second.as_raw_fd());
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn every_queue_carries_packets() {
    let queues = Interface::new_queues(&Config::tun("tundevmq%d"), 3).unwrap();
    assert_eq!(queues.len(), 3);
    assert!(queues.iter().all(|queue| queue.name() == queues[0].name()));

    ip(&["addr", "add", "10.97.0.1/24", "dev", queues[0].name()]);
    ip(&["link", "set", "dev", queues[0].name(), "up"]);

    let socket = UdpSocket::bind("10.97.0.1:33333").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let send_from = |queue: &Interface, tag: u8| {
        let data = [tag; 4];
        let builder = PacketBuilder::ipv4([10, 97, 0, 2], [10, 97, 0, 1], 20).udp(44444, 33333);
        let mut packet = Vec::with_capacity(builder.size(data.len()));
        builder.write(&mut packet, &data).unwrap();

        assert_eq!(queue.send(&packet).unwrap(), packet.len());
    };
    let receive_tags = |count: usize| {
        let mut tags = Vec::with_capacity(count);
        let mut buf = [0u8; 64];
        for _ in 0..count {
            let (read, _) = socket.recv_from(&mut buf).unwrap();
            assert_eq!(read, 4);
            tags.push(buf[0]);
        }
        tags.sort_unstable();

        tags
    };

    for (tag, queue) in queues.iter().enumerate() {
        send_from(queue, tag as u8);
    }
    assert_eq!(receive_tags(3), [0u8, 1, 2]);

    // A detached queue holds no packets while the rest keep working.
    queues[1].detach_queue().unwrap();

    let mut buf = [0u8; 1500];
    let err = io::Error::from(queues[1].recv(&mut buf).unwrap_err());
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    send_from(&queues[0], 10);
    send_from(&queues[2], 12);
    assert_eq!(receive_tags(2), [10u8, 12]);

    queues[1].attach_queue().unwrap();
    send_from(&queues[1], 11);
    assert_eq!(receive_tags(1), [11u8]);
}

#[test]
#[ignore = "needs CAP_NET_ADMIN"]
fn packets_round_trip_through_the_kernel() {
    let mut iface = Interface::new(&Config::tun("tundevrt0")).unwrap();
    ip(&["addr", "add", "10.98.0.1/24", "dev", iface.name()]);
    ip(&["link", "set", "dev", iface.name(), "up"]);

    // Outgoing: the kernel routes a datagram for 10.98.0.2 into the device.
    let data = [1u8; 10];
    let socket = UdpSocket::bind("10.98.0.1:33333").unwrap();
    socket.send_to(&data, "10.98.0.2:44444").unwrap();

    let mut buf = [0u8; 1500];
    loop {
        let read = match iface.read(&mut buf) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
            Err(err) => panic!("{err}"),
        };

        if let Ok(packet) = PacketHeaders::from_ip_slice(&buf[..read]) {
            if let (Some(IpHeader::Version4(ipv4_h, _)), Some(TransportHeader::Udp(udp_h))) =
                (packet.ip, packet.transport)
            {
                assert_eq!(ipv4_h.source, [10, 98, 0, 1]);
                assert_eq!(ipv4_h.destination, [10, 98, 0, 2]);
                assert_eq!(udp_h.destination_port, 44444);
                assert_eq!(packet.payload, data);
                break;
            }
        }
    }

    // Incoming: a packet written to the device is delivered to the local socket.
    let builder = PacketBuilder::ipv4([10, 98, 0, 2], [10, 98, 0, 1], 20).udp(44444, 33333);
    let mut packet = Vec::with_capacity(builder.size(data.len()));
    builder.write(&mut packet, &data).unwrap();
    assert_eq!(iface.write(&packet).unwrap(), packet.len());

    let mut buf = [0u8; 64];
    let (read, source) = socket.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..read], data);
    assert_eq!(source.port(), 44444);
}
