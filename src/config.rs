use std::path::PathBuf;
use anyhow::{Context as _, Result};
use serde::Deserialize;
use crate::args::Args;
use crate::fs::get_home_dir;

#[derive(Default, Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Command line values take precedence over the file.
    pub fn apply_args(mut self, args: Args) -> Self {
        self.listener.port = args.port.or(self.listener.port);
        self.listener.host = args.host.or(self.listener.host);
        self.server.resolver = args.resolver.or(self.server.resolver);
        self.server.default_timeout = args.timeout.or(self.server.default_timeout);
        self.server.retries = args.retries.or(self.server.retries);

        self
    }
}

#[derive(Default, Deserialize, Debug)]
pub struct ListenerConfig {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub max_packet_buf: Option<usize>,
}

#[derive(Default, Deserialize, Debug)]
pub struct ServerConfig {
    pub resolver: Option<String>,
    pub default_port: Option<u16>,
    #[serde(alias = "timeout")]
    pub default_timeout: Option<String>,
    pub retries: Option<u32>,
    pub retry_interval: Option<String>,
    pub max_upstream_buf: Option<usize>,
    pub max_in_flight: Option<usize>,
}

#[derive(Default, Deserialize, Debug)]
pub struct ResolverConfig {
    pub max_compression_depth: Option<usize>,
}

/// Loads the file given on the command line, or `~/.dnsfwd/conf.toml` when
/// it exists. Without either, every setting falls back to its default.
pub fn load_config(path: Option<String>) -> Result<Config> {
    if let Some(path) = path {
        return load(PathBuf::from(path));
    }

    match get_home_dir().map(|dir| dir.join("conf.toml")) {
        Some(path) if path.exists() => load(path),
        _ => Ok(Config::default()),
    }
}

fn load(p: PathBuf) -> Result<Config> {
    let file = std::fs::read_to_string(&p)
        .with_context(|| format!("couldn't read config file {}", p.display()))?;

    parse(&file).with_context(|| format!("invalid config file {}", p.display()))
}

fn parse(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;

    Ok(cfg)
}
