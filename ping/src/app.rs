use std::net::Ipv4Addr;
use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use crossterm::style::Stylize;
use thiserror::Error;

use crate::icmp;
use crate::ip;
use crate::probe::{Pinger, PingError, ProbeConfig};
use crate::stats::{ProbeOutcome, ProbeStatistics};

/// Largest payload that still fits in one IPv4 datagram.
pub const MAX_PAYLOAD_SIZE: usize = 65535 - ip::HEADER_SIZE - icmp::HEADER_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{name} must not exceed {max}")]
    TooLarge { name: &'static str, max: usize },
}

pub struct PingApp {
    config: ProbeConfig,
}

impl PingApp {
    pub fn command() -> App<'static> {
        App::new("ping")
            .arg(
                Arg::new("REMOTE")
                    .takes_value(true)
                    .default_value("127.0.0.1")
                    .help("Remote ipv4 address or host name"),
            )
            .arg(
                Arg::new("COUNT")
                    .takes_value(true)
                    .short('n')
                    .long("count")
                    .default_value("10")
                    .help("Number of echo requests to send"),
            )
            .arg(
                Arg::new("SIZE")
                    .takes_value(true)
                    .short('s')
                    .long("size")
                    .default_value("32")
                    .help("Set the ping data size (bytes)"),
            )
            .arg(
                Arg::new("TIMEOUT")
                    .takes_value(true)
                    .short('t')
                    .long("timeout")
                    .default_value("1000")
                    .help("Time to wait for each reply (ms)"),
            )
            .about("Send ICMP echo requests to an ipv4 host.")
            .version("0.1.0")
    }

    pub fn from_args() -> Result<PingApp, ConfigError> {
        let matches = Self::command().get_matches();
        Self::from_matches(&matches)
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<PingApp, ConfigError> {
        let defaults = ProbeConfig::default();

        let target = matches
            .value_of("REMOTE")
            .map(str::to_string)
            .unwrap_or(defaults.target);

        let count: u32 = parse_arg(matches, "COUNT", "count")?.unwrap_or(defaults.count);
        if count == 0 {
            return Err(ConfigError::NotPositive("count"));
        }

        let size: usize = parse_arg(matches, "SIZE", "size")?.unwrap_or(defaults.size);
        if size > MAX_PAYLOAD_SIZE {
            return Err(ConfigError::TooLarge {
                name: "size",
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let timeout_ms: u64 =
            parse_arg(matches, "TIMEOUT", "timeout")?.unwrap_or(defaults.timeout_ms);
        if timeout_ms == 0 {
            return Err(ConfigError::NotPositive("timeout"));
        }

        Ok(PingApp {
            config: ProbeConfig {
                target,
                count,
                size,
                timeout_ms,
            },
        })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn run(&self) -> Result<(), PingError> {
        let target = self.config.target.as_str().blue();
        let size = format!("{}", self.config.size).blue();
        println!("PING {} with {} bytes of data:", target, size);

        let stats = Pinger::new(&self.config).run(print_outcome)?;
        print_statistics(&self.config.target, &stats);
        Ok(())
    }
}

fn parse_arg<T: FromStr>(
    matches: &ArgMatches,
    id: &str,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match matches.value_of(id) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                name,
                value: value.to_string(),
            }),
    }
}

fn print_outcome(peer: Ipv4Addr, outcome: &ProbeOutcome) {
    match *outcome {
        ProbeOutcome::Reply {
            round_trip_ms,
            ttl,
            bytes,
        } => println!(
            "Reply from {}: bytes={} time={} TTL={}",
            format!("{}", peer).blue(),
            bytes,
            format!("{}ms", round_trip_ms).green(),
            format!("{}", ttl).yellow()
        ),
        ProbeOutcome::Timeout => println!("{}", "Request timed out.".red()),
    }
}

fn print_statistics(target: &str, stats: &ProbeStatistics) {
    let loss = {
        let percent = stats.loss_percent();
        let percent_str = format!("{:.2}%", percent);

        if percent > 40.0 {
            percent_str.red()
        } else if percent > 20.0 {
            percent_str.yellow()
        } else {
            percent_str.green()
        }
    };

    println!();
    println!("Ping statistics for {}:", target.blue());
    println!(
        "    Packets: Sent = {}, Received = {}, Lost = {} ({} loss)",
        format!("{}", stats.sent).blue(),
        format!("{}", stats.received).green(),
        format!("{}", stats.lost).red(),
        loss
    );

    if let Some(round_trip) = stats.round_trip() {
        println!("Approximate round trip times in milli-seconds:");
        println!(
            "    Minimum = {}, Maximum = {}, Average = {}",
            format!("{}ms", round_trip.min_ms).green(),
            format!("{}ms", round_trip.max_ms).green(),
            format!("{}ms", round_trip.avg_ms).green()
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<ProbeConfig, ConfigError> {
        let matches = PingApp::command()
            .try_get_matches_from(args.iter().copied())
            .unwrap();
        PingApp::from_matches(&matches).map(|app| app.config().clone())
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&["ping"]).unwrap(), ProbeConfig::default());
    }

    #[test]
    fn all_options() {
        let config = parse(&["ping", "10.0.0.1", "-n", "3", "-s", "64", "-t", "250"]).unwrap();
        assert_eq!(
            config,
            ProbeConfig {
                target: "10.0.0.1".to_string(),
                count: 3,
                size: 64,
                timeout_ms: 250,
            }
        );
    }

    #[test]
    fn long_options() {
        let config = parse(&["ping", "--count", "1", "--size", "0", "--timeout", "5"]).unwrap();
        assert_eq!((config.count, config.size, config.timeout_ms), (1, 0, 5));
        assert_eq!(config.target, "127.0.0.1");
    }

    #[test]
    fn reject_bad_values() {
        assert_eq!(
            parse(&["ping", "-n", "many"]).unwrap_err(),
            ConfigError::Invalid {
                name: "count",
                value: "many".to_string(),
            }
        );
        assert_eq!(
            parse(&["ping", "-n", "0"]).unwrap_err(),
            ConfigError::NotPositive("count")
        );
        assert_eq!(
            parse(&["ping", "-t", "0"]).unwrap_err(),
            ConfigError::NotPositive("timeout")
        );
        assert_eq!(
            parse(&["ping", "-s", "4k"]).unwrap_err(),
            ConfigError::Invalid {
                name: "size",
                value: "4k".to_string(),
            }
        );
    }

    #[test]
    fn reject_oversized_payload() {
        assert!(parse(&["ping", "-s", "65507"]).is_ok());
        assert_eq!(
            parse(&["ping", "-s", "65508"]).unwrap_err(),
            ConfigError::TooLarge {
                name: "size",
                max: 65507,
            }
        );
    }
}
