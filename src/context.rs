use std::fmt::{Display, Formatter};
use std::time::Duration;
use anyhow::{bail, Context as _, Result};
use crate::config::Config;
use crate::duration;
use crate::handler::HandlerTarget;
use crate::header::HEADER_LEN;
use crate::parser::DEFAULT_MAX_JUMPS;

/// Settings resolved from the config file and the command line, fixed for
/// the lifetime of the server.
pub struct Context {
    pub listener: ListenerContext,
    pub server: ServerContext,
    pub resolver: ResolverContext,
}

impl Context {
    pub fn from(cfg: Config) -> Result<Self> {
        let listener = ListenerContext {
            host: cfg.listener.host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: cfg.listener.port.unwrap_or(2053),
            max_packet_buf: cfg.listener.max_packet_buf.unwrap_or(2048),
        };

        if listener.max_packet_buf < HEADER_LEN {
            bail!("max_packet_buf must be at least {} bytes", HEADER_LEN);
        }

        let Some(addr) = cfg.server.resolver else {
            bail!("no upstream resolver given, pass --resolver <addr>");
        };
        let upstream = HandlerTarget::new(&addr, cfg.server.default_port.unwrap_or(53))?;

        let server = ServerContext {
            upstream,
            default_timeout: parse_duration(cfg.server.default_timeout, "5s")?,
            retries: cfg.server.retries.unwrap_or(0),
            retry_interval: parse_duration(cfg.server.retry_interval, "200ms")?,
            max_upstream_buf: cfg.server.max_upstream_buf.unwrap_or(10240),
            max_in_flight: cfg.server.max_in_flight.unwrap_or(64),
        };

        if server.default_timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }

        if server.max_in_flight == 0 {
            bail!("max_in_flight must be at least 1");
        }

        let resolver = ResolverContext {
            max_compression_depth: cfg
                .resolver
                .max_compression_depth
                .unwrap_or(DEFAULT_MAX_JUMPS),
        };

        Ok(Self {
            listener,
            server,
            resolver,
        })
    }
}

pub struct ListenerContext {
    pub host: String,
    pub port: u16,
    pub max_packet_buf: usize,
}

impl ListenerContext {
    pub fn to_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl Display for ListenerContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "udp://{}:{}", self.host, self.port)
    }
}

pub struct ServerContext {
    pub upstream: HandlerTarget,
    pub default_timeout: Duration,
    pub retries: u32,
    pub retry_interval: Duration,
    pub max_upstream_buf: usize,
    pub max_in_flight: usize,
}

pub struct ResolverContext {
    pub max_compression_depth: usize,
}

fn parse_duration(value: Option<String>, default: &str) -> Result<Duration> {
    let value = value.unwrap_or_else(|| default.to_string());

    duration::parse(&value).with_context(|| format!("invalid duration {:?}", value))
}
