/// Result of a single echo attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reply {
        round_trip_ms: u64,
        ttl: u8,
        /// Reply length minus the IPv4 and ICMP headers.
        bytes: usize,
    },
    /// No usable reply before the deadline.
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTrip {
    pub min_ms: u64,
    pub max_ms: u64,
    pub avg_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStatistics {
    pub sent: u32,
    pub received: u32,
    pub lost: u32,
    pub min_rtt_ms: u64,
    pub max_rtt_ms: u64,
    pub total_rtt_ms: u64,
}

impl ProbeStatistics {
    pub fn new() -> ProbeStatistics {
        ProbeStatistics {
            sent: 0,
            received: 0,
            lost: 0,
            min_rtt_ms: u64::MAX,
            max_rtt_ms: 0,
            total_rtt_ms: 0,
        }
    }

    pub fn record(&mut self, outcome: &ProbeOutcome) {
        self.sent += 1;
        match *outcome {
            ProbeOutcome::Reply { round_trip_ms, .. } => {
                self.received += 1;
                self.min_rtt_ms = self.min_rtt_ms.min(round_trip_ms);
                self.max_rtt_ms = self.max_rtt_ms.max(round_trip_ms);
                self.total_rtt_ms += round_trip_ms;
            }
            ProbeOutcome::Timeout => self.lost += 1,
        }
    }

    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        f64::from(self.lost) * 100.0 / f64::from(self.sent)
    }

    /// `None` until at least one reply has been recorded.
    pub fn round_trip(&self) -> Option<RoundTrip> {
        if self.received == 0 {
            return None;
        }
        Some(RoundTrip {
            min_ms: self.min_rtt_ms,
            max_ms: self.max_rtt_ms,
            avg_ms: self.total_rtt_ms / u64::from(self.received),
        })
    }
}

impl Default for ProbeStatistics {
    fn default() -> Self {
        Self::new()
    }
}
