use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(about)]
pub struct Args {
    /// Address to listen on [default: 127.0.0.1]
    #[arg(long)]
    pub host: Option<String>,
    /// Port to listen on [default: 2053]
    #[arg(long, short)]
    pub port: Option<u16>,
    /// Upstream server, as ip, ip:port or host:port
    #[arg(long, short)]
    pub resolver: Option<String>,
    /// Deadline for each upstream round trip, e.g. 500ms or 5s
    #[arg(long, short)]
    pub timeout: Option<String>,
    /// Extra attempts after an upstream timeout or network error
    #[arg(long)]
    pub retries: Option<u32>,
    /// Config file [default: ~/.dnsfwd/conf.toml]
    #[arg(long, short)]
    pub config: Option<String>,
    #[arg(long, short, default_value_t = Level::INFO)]
    pub log_level: Level,
}
