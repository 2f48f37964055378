use clap::Parser;
use dnscache_application::ports::{DnsCachePort, DnsForwarder};
use dnscache_domain::CliOverrides;
use dnscache_infrastructure::{CacheHandler, UdpForwarder};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "dnscache")]
#[command(version)]
#[command(about = "Caching DNS forwarder with DNSSEC-aware TTLs and prefetching")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS listen port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (ip:port)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        upstream: cli.upstream,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting dnscache v{}", env!("CARGO_PKG_VERSION"));

    let upstream_addr = config
        .upstream
        .socket_addr()
        .ok_or_else(|| anyhow::anyhow!("invalid upstream address {}", config.upstream.server))?;
    let forwarder: Arc<dyn DnsForwarder> = Arc::new(UdpForwarder::new(
        upstream_addr,
        Duration::from_millis(config.upstream.timeout_ms),
    ));
    info!(upstream = %upstream_addr, "Forwarding cache misses");

    let handler = Arc::new(CacheHandler::new(forwarder, config.cache.clone()));

    tokio::select! {
        result = server::start_dns_server(config.server.listen_addr(), Arc::clone(&handler)) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    let snapshot = handler.cache_metrics_snapshot();
    info!(
        hits = snapshot.hits,
        misses = snapshot.misses,
        entries = handler.cache_size(),
        hit_rate = format!("{:.1}%", snapshot.hit_rate),
        "Server shutdown complete"
    );
    Ok(())
}
