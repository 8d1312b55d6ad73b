use clap::Parser;
use std::net::SocketAddr;

/// Auction ledger HTTP service
#[derive(Parser, Debug, Clone)]
#[command(name = "auction-ledger")]
pub struct Config {
    /// Address to serve HTTP on
    #[arg(long, env = "AUCTION_LEDGER_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Postgres connection string; the in-memory store is used when unset
    #[arg(long, env = "AUCTION_LEDGER_POSTGRES_URL")]
    pub postgres_url: Option<String>,

    #[arg(long, env = "AUCTION_LEDGER_POSTGRES_POOL_SIZE", default_value_t = 4)]
    pub postgres_pool_size: u32,

    /// Log filter directives
    #[arg(long, env = "AUCTION_LEDGER_LOG", default_value = "info")]
    pub log: String,

    /// Enable debug logging, overriding `--log`
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn log_filter(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log
        }
    }
}
