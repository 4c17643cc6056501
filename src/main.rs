use std::sync::Arc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;
use dnsfwd::args::Args;
use dnsfwd::config::load_config;
use dnsfwd::context::Context;
use dnsfwd::handler::UdpHandler;
use dnsfwd::resolver::ForwardResolver;
use dnsfwd::server::UdpDnsServer;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish()
        .try_init()
        .expect("Failed to initialize logger");

    if let Err(err) = run(args).await {
        error!("{:#}", err);

        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.clone())?.apply_args(args);
    let ctx = Arc::new(Context::from(config)?);

    info!("Forwarding to {}", ctx.server.upstream.addr);

    let resolver = ForwardResolver::new(UdpHandler::new(&ctx.server), &ctx);

    UdpDnsServer::new(ctx, resolver).start().await
}
