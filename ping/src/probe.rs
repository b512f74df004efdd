use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace};
use thiserror::Error;

use crate::icmp::{self, EchoRequest};
use crate::ip::{self, IpV4Packet};
use crate::session::{RawSession, Session};
use crate::stats::{ProbeOutcome, ProbeStatistics};

/// Identifier carried by every request of a run.
pub const ECHO_IDENT: u16 = 1;
/// Every request of a run is sent with this sequence number.
pub const ECHO_SEQUENCE: u16 = 1;
/// Large enough for any IPv4 datagram.
pub const RECV_BUFFER_SIZE: usize = 65535;
/// Pause between two attempts.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub target: String,
    pub count: u32,
    /// Payload bytes appended after the ICMP header.
    pub size: usize,
    pub timeout_ms: u64,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            target: "127.0.0.1".to_string(),
            count: 10,
            size: 32,
            timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum PingError {
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("{0} has no ipv4 address")]
    NoIpv4Address(String),
    #[error("{0} is not an ipv4 address")]
    Unsupported(IpAddr),
    #[error("cannot open icmp socket: {0}")]
    Open(#[source] io::Error),
    #[error("cannot send echo request: {0}")]
    Send(#[source] io::Error),
}
pub type PingResult<T> = Result<T, PingError>;

pub struct Pinger<'a> {
    config: &'a ProbeConfig,
    interval: Duration,
}

impl<'a> Pinger<'a> {
    pub fn new(config: &'a ProbeConfig) -> Pinger<'a> {
        Pinger {
            config,
            interval: PROBE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Opens a raw session to the configured target and runs every attempt on it.
    ///
    /// `on_outcome` sees each attempt as soon as it completes.
    pub fn run<F>(&self, on_outcome: F) -> PingResult<ProbeStatistics>
    where
        F: FnMut(Ipv4Addr, &ProbeOutcome),
    {
        let mut session = RawSession::open(&self.config.target)?;
        self.run_on(&mut session, on_outcome)
    }

    pub fn run_on<S, F>(
        &self,
        session: &mut S,
        mut on_outcome: F,
    ) -> PingResult<ProbeStatistics>
    where
        S: Session,
        F: FnMut(Ipv4Addr, &ProbeOutcome),
    {
        let peer = session.peer();
        let timeout = self.config.timeout();

        let mut request = EchoRequest::new(ECHO_IDENT, ECHO_SEQUENCE, self.config.size);
        let mut reply = vec![0u8; RECV_BUFFER_SIZE];
        let mut stats = ProbeStatistics::new();

        for attempt in 0..self.config.count {
            if attempt > 0 {
                thread::sleep(self.interval);
            }

            request.stage(ECHO_SEQUENCE);
            debug_assert!(icmp::verify(request.as_bytes()));

            let sent_at = Instant::now();
            session.set_deadline(sent_at + timeout);
            session.send(request.as_bytes()).map_err(PingError::Send)?;
            trace!(
                "sent echo request ident={} seq={} to {}",
                request.ident(),
                request.seq_cnt(),
                peer
            );

            let outcome = match session.recv(&mut reply) {
                Ok(len) => inspect(&reply[..len], whole_millis(sent_at.elapsed())),
                Err(err) => {
                    debug!("attempt {} lost: {}", attempt + 1, err);
                    ProbeOutcome::Timeout
                }
            };
            debug!("attempt {}: {:?}", attempt + 1, outcome);

            stats.record(&outcome);
            on_outcome(peer, &outcome);
        }

        Ok(stats)
    }
}

/// Truncated to whole milliseconds, saturating at `u64::MAX`.
fn whole_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn inspect(datagram: &[u8], round_trip_ms: u64) -> ProbeOutcome {
    match IpV4Packet::decode(datagram) {
        Ok(packet) => {
            trace!(
                "{} bytes from {}, icmp type {:?}",
                datagram.len(),
                packet.source,
                packet.data.first()
            );
            ProbeOutcome::Reply {
                round_trip_ms,
                ttl: packet.ttl,
                bytes: datagram
                    .len()
                    .saturating_sub(ip::HEADER_SIZE + icmp::HEADER_SIZE),
            }
        }
        Err(err) => {
            debug!("dropping {} byte datagram: {}", datagram.len(), err);
            ProbeOutcome::Timeout
        }
    }
}
