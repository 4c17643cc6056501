use std::future::Future;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;
use anyhow::{anyhow, bail};
use rand::{thread_rng, Rng};
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};
use crate::context::ServerContext;
use crate::error::{DnsError, Result};

/// Opens a fresh upstream session for every client request.
pub trait Handler: Send + Sync {
    type Session: Session;

    fn open(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// One request's view of the upstream: a datagram out, a datagram back.
pub trait Session: Send {
    fn send(&mut self, buf: &[u8]) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HandlerTarget {
    pub addr: SocketAddr,
}

impl HandlerTarget {
    /// Accepts `ip`, `ip:port` or `host:port`; a bare ip gets `default_port`.
    pub fn new(addr: &str, default_port: u16) -> anyhow::Result<Self> {
        if let Ok(addr) = SocketAddr::from_str(addr) {
            return Ok(Self::from_addr(addr));
        }

        if let Ok(ip) = IpAddr::from_str(addr) {
            return Ok(Self::from_addr(SocketAddr::new(ip, default_port)));
        }

        if !addr.contains(':') {
            bail!("{} is not a valid address, expected host:port", addr);
        }

        addr.to_socket_addrs()?
            .next()
            .map(Self::from_addr)
            .ok_or_else(|| anyhow!("{} did not resolve to any address", addr))
    }

    pub fn from_addr(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

pub struct UdpHandler {
    target: HandlerTarget,
    timeout: Duration,
    retries: u32,
    retry_interval: Duration,
    max_packet_buf: usize,
}

impl UdpHandler {
    pub fn new(ctx: &ServerContext) -> Self {
        Self {
            target: ctx.upstream,
            timeout: ctx.default_timeout,
            retries: ctx.retries,
            retry_interval: ctx.retry_interval,
            max_packet_buf: ctx.max_upstream_buf,
        }
    }
}

impl Handler for UdpHandler {
    type Session = UdpSession;

    async fn open(&self) -> Result<UdpSession> {
        let bind_addr = if self.target.addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(self.target.addr).await?;

        Ok(UdpSession {
            socket,
            timeout: self.timeout,
            retries: self.retries,
            retry_interval: self.retry_interval,
            max_packet_buf: self.max_packet_buf,
        })
    }
}

pub struct UdpSession {
    socket: UdpSocket,
    timeout: Duration,
    retries: u32,
    retry_interval: Duration,
    max_packet_buf: usize,
}

impl UdpSession {
    async fn exchange(&self, buf: &[u8]) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.timeout;

        self.socket.send(buf).await?;

        // one spare byte tells an oversize reply apart from one that fits
        let mut res = vec![0u8; self.max_packet_buf + 1];

        loop {
            let n = match tokio::time::timeout_at(deadline, self.socket.recv(&mut res)).await {
                Ok(n) => n?,
                Err(_) => return Err(DnsError::UpstreamTimeout(self.timeout)),
            };

            if n > self.max_packet_buf {
                return Err(DnsError::MessageTooLarge {
                    size: n,
                    max: self.max_packet_buf,
                });
            }

            if n >= 2 && buf.len() >= 2 && res[..2] != buf[..2] {
                warn!("discarding upstream reply with unexpected id");

                continue;
            }

            res.truncate(n);

            return Ok(res);
        }
    }
}

impl Session for UdpSession {
    async fn send(&mut self, buf: &[u8]) -> Result<Vec<u8>> {
        let mut attempt = 0;

        loop {
            match self.exchange(buf).await {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    let delay = backoff(self.retry_interval, attempt);
                    warn!("upstream attempt {} failed: {}, retrying in {:?}", attempt + 1, e, delay);

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                res => {
                    if let Ok(res) = &res {
                        debug!("upstream replied with {} bytes", res.len());
                    }

                    return res;
                }
            }
        }
    }
}

/// Exponential backoff with up to 50% random jitter on top.
fn backoff(base: Duration, attempt: u32) -> Duration {
    let delay = base.saturating_mul(1u32 << attempt.min(16));
    let jitter = delay.as_millis() as u64 / 2;

    delay + Duration::from_millis(thread_rng().gen_range(0..=jitter))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dns_class::DNSClass;
    use crate::header::Header;
    use crate::packet::Packet;
    use crate::parser::PacketParser;
    use crate::query_type::QueryType;
    use crate::question::Question;
    use crate::record::Record;
    use crate::writer::PacketWriter;

    fn handler(addr: SocketAddr, timeout: Duration, retries: u32) -> UdpHandler {
        UdpHandler {
            target: HandlerTarget::from_addr(addr),
            timeout,
            retries,
            retry_interval: Duration::from_millis(10),
            max_packet_buf: 512,
        }
    }

    fn query(id: u16) -> Vec<u8> {
        let packet = Packet::forwarded(
            &Header::new_with_id(id),
            Question::new("example.com".to_string(), QueryType::A, DNSClass::IN),
        );

        PacketWriter::default().write(&packet).unwrap()
    }

    fn reply_to(buf: &[u8]) -> Vec<u8> {
        let mut packet = PacketParser::new(buf).parse().unwrap();
        packet.header = packet.header.with_query_res_indicator().with_answer_count(1);
        packet.answers.push(Record::new(
            "example.com".to_string(),
            QueryType::A,
            DNSClass::IN,
            300,
            vec![93, 184, 216, 34],
        ));

        PacketWriter::default().write(&packet).unwrap()
    }

    #[test]
    fn targets() {
        assert_eq!(
            HandlerTarget::new("8.8.8.8", 53).unwrap().addr,
            "8.8.8.8:53".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            HandlerTarget::new("127.0.0.1:5353", 53).unwrap().addr,
            "127.0.0.1:5353".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(HandlerTarget::new("::1", 53).unwrap().addr.port(), 53);
        assert!(HandlerTarget::new("localhost:53", 53).is_ok());
        assert!(HandlerTarget::new("not an address", 53).is_err());
    }

    #[test]
    fn backoff_grows() {
        let base = Duration::from_millis(100);

        for attempt in 0..4 {
            let delay = backoff(base, attempt);
            let floor = base * (1 << attempt);

            assert!(delay >= floor);
            assert!(delay <= floor + floor / 2);
        }
    }

    #[tokio::test]
    async fn round_trip_over_udp() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = upstream.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (n, from) = upstream.recv_from(&mut buf).await.unwrap();

            // a stray reply with the wrong id arrives first
            let mut stray = reply_to(&buf[..n]);
            stray[0] ^= 0xFF;
            upstream.send_to(&stray, from).await.unwrap();
            upstream.send_to(&reply_to(&buf[..n]), from).await.unwrap();
        });

        let mut session = handler(addr, Duration::from_secs(2), 0).open().await.unwrap();
        let res = session.send(&query(0x1234)).await.unwrap();

        let packet = PacketParser::new(&res).parse().unwrap();
        assert_eq!(packet.header.id, 0x1234);
        assert!(packet.header.response);
        assert_eq!(packet.answers[0].data, vec![93, 184, 216, 34]);
    }

    #[tokio::test]
    async fn silent_upstream_times_out() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = upstream.local_addr().unwrap();

        let mut session = handler(addr, Duration::from_millis(50), 0).open().await.unwrap();
        let err = session.send(&query(1)).await.unwrap_err();

        assert!(matches!(err, DnsError::UpstreamTimeout(_)));
        drop(upstream);
    }

    #[tokio::test]
    async fn retry_after_lost_reply() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = upstream.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];

            // drop the first attempt on the floor
            upstream.recv_from(&mut buf).await.unwrap();

            let (n, from) = upstream.recv_from(&mut buf).await.unwrap();
            upstream.send_to(&reply_to(&buf[..n]), from).await.unwrap();
        });

        let mut session = handler(addr, Duration::from_millis(200), 1).open().await.unwrap();
        let res = session.send(&query(7)).await.unwrap();

        assert_eq!(PacketParser::new(&res).parse().unwrap().answers.len(), 1);
    }

    #[tokio::test]
    async fn oversize_reply() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = upstream.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (n, from) = upstream.recv_from(&mut buf).await.unwrap();

            let mut big = buf[..n].to_vec();
            big.resize(600, 0);
            upstream.send_to(&big, from).await.unwrap();
        });

        let mut session = handler(addr, Duration::from_secs(2), 0).open().await.unwrap();
        let err = session.send(&query(3)).await.unwrap_err();

        assert!(matches!(err, DnsError::MessageTooLarge { size: 513, max: 512 }));
    }
}
