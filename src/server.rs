use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context as _, Result};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};
use crate::context::Context;
use crate::error::DnsError;
use crate::resolver::Resolver;

type Reply = (Vec<u8>, SocketAddr);

const RECV_RETRY_BASE: Duration = Duration::from_millis(10);
const RECV_RETRY_MAX: Duration = Duration::from_secs(1);

pub struct UdpDnsServer<R> {
    ctx: Arc<Context>,
    resolver: Arc<R>,
}

impl<R: Resolver + 'static> UdpDnsServer<R> {
    pub fn new(ctx: Arc<Context>, resolver: R) -> UdpDnsServer<R> {
        Self {
            ctx,
            resolver: Arc::new(resolver),
        }
    }

    pub async fn start(&self) -> Result<()> {
        let listener = &self.ctx.listener;

        let socket = UdpSocket::bind(listener.to_addr())
            .await
            .with_context(|| format!("Failed to start server on {}", listener))?;
        info!("Listening on {}", listener);

        self.serve(Arc::new(socket)).await
    }

    /// Receives datagrams forever. Each one is resolved on its own task;
    /// replies funnel through a channel to a single writer task. A request
    /// that fails is dropped and the client gets nothing back.
    pub async fn serve(&self, socket: Arc<UdpSocket>) -> Result<()> {
        let max_in_flight = self.ctx.server.max_in_flight;
        let max = self.ctx.listener.max_packet_buf;

        let (tx, rx) = mpsc::channel::<Reply>(max_in_flight);
        tokio::spawn(write_replies(socket.clone(), rx));

        let permits = Arc::new(Semaphore::new(max_in_flight));
        let mut buf = vec![0u8; max + 1];
        let mut failures = 0u32;

        loop {
            let (size, source) = match socket.recv_from(&mut buf).await {
                Ok(res) => {
                    failures = 0;

                    res
                }
                Err(e) => {
                    let delay = recv_retry_delay(failures);
                    failures = failures.saturating_add(1);
                    error!("Error receiving data: {}, pausing for {:?}", e, delay);

                    tokio::time::sleep(delay).await;

                    continue;
                }
            };

            if size > max {
                warn!("Dropping request from {}: {}", source, DnsError::MessageTooLarge { size, max });

                continue;
            }

            let permit = permits.clone().acquire_owned().await?;
            let resolver = self.resolver.clone();
            let tx = tx.clone();
            let query = buf[..size].to_vec();

            tokio::spawn(async move {
                let _permit = permit;

                match resolver.resolve(&query).await {
                    Ok(res) => {
                        if tx.send((res, source)).await.is_err() {
                            error!("Reply writer has stopped, dropping reply to {}", source);
                        }
                    }
                    Err(e) => warn!("Dropping request from {}: {}", source, e),
                }
            });
        }
    }
}

/// Pause after consecutive receive errors, doubling up to a second.
fn recv_retry_delay(failures: u32) -> Duration {
    RECV_RETRY_BASE
        .saturating_mul(1u32 << failures.min(16))
        .min(RECV_RETRY_MAX)
}

async fn write_replies(socket: Arc<UdpSocket>, mut rx: mpsc::Receiver<Reply>) {
    while let Some((buf, dest)) = rx.recv().await {
        if let Err(e) = socket.send_to(&buf, dest).await {
            error!("Failed to send response to {}: {}", dest, e);
        }
    }
}
