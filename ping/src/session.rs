use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use log::{debug, warn};
use socket2::{Domain, Protocol, Socket, Type};

use crate::probe::PingError;

/// A connection to one host at the ICMP layer.
///
/// Every call to [`Session::send`] and [`Session::recv`] gives up once the
/// deadline set by [`Session::set_deadline`] has passed.
pub trait Session {
    fn peer(&self) -> Ipv4Addr;

    fn set_deadline(&mut self, deadline: Instant);

    fn send(&mut self, packet: &[u8]) -> io::Result<usize>;

    /// Reads one whole datagram, IPv4 header included.
    fn recv(&mut self, buffer: &mut [u8]) -> io::Result<usize>;
}

/// Raw ICMPv4 socket connected to the target. Closed when dropped.
pub struct RawSession {
    socket: Socket,
    peer: Ipv4Addr,
    deadline: Option<Instant>,
}

impl RawSession {
    pub fn open(host: &str) -> Result<RawSession, PingError> {
        let peer = resolve(host)?;

        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4)).map_err(|err| {
            if err.kind() == io::ErrorKind::PermissionDenied {
                warn!("raw sockets need root or CAP_NET_RAW");
            }
            PingError::Open(err)
        })?;
        socket
            .connect(&SocketAddr::new(IpAddr::V4(peer), 0).into())
            .map_err(PingError::Open)?;

        debug!("opened raw icmp session to {}", peer);
        Ok(RawSession {
            socket,
            peer,
            deadline: None,
        })
    }
}

/// Socket timeout left before `deadline`, `None` meaning no deadline at all.
fn remaining(deadline: Option<Instant>, now: Instant) -> io::Result<Option<Duration>> {
    match deadline {
        None => Ok(None),
        Some(deadline) => {
            let left = deadline.saturating_duration_since(now);
            if left.is_zero() {
                Err(io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"))
            } else {
                Ok(Some(left))
            }
        }
    }
}

impl Session for RawSession {
    fn peer(&self) -> Ipv4Addr {
        self.peer
    }

    fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    fn send(&mut self, packet: &[u8]) -> io::Result<usize> {
        self.socket
            .set_write_timeout(remaining(self.deadline, Instant::now())?)?;
        self.socket.write(packet)
    }

    fn recv(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.socket
            .set_read_timeout(remaining(self.deadline, Instant::now())?)?;
        self.socket.read(buffer)
    }
}

impl Drop for RawSession {
    fn drop(&mut self) {
        debug!("closing raw icmp session to {}", self.peer);
    }
}

/// Turns `host` into the IPv4 address to probe.
pub fn resolve(host: &str) -> Result<Ipv4Addr, PingError> {
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => Ok(ip),
        Ok(ip) => Err(PingError::Unsupported(ip)),
        Err(_) => {
            let ip = look_up_ipv4(host)
                .map_err(|source| PingError::Resolve {
                    host: host.to_string(),
                    source,
                })?
                .ok_or_else(|| PingError::NoIpv4Address(host.to_string()))?;
            debug!("resolved {} to {}", host, ip);
            Ok(ip)
        }
    }
}

fn look_up_ipv4(host: &str) -> io::Result<Option<Ipv4Addr>> {
    let resolver = trust_dns_resolver::Resolver::from_system_conf()?;
    let lookup = resolver.lookup_ip(host)?;

    Ok(lookup.iter().find_map(|ip| match ip {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    }))
}
