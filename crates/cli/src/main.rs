use clap::Parser;
use dnsrelay_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dnsrelay")]
#[command(version)]
#[command(about = "DNS relay - forwards UDP queries to upstream resolvers with caching")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (repeatable, tried in order)
    #[arg(short = 'u', long = "upstream", value_name = "ADDR")]
    upstreams: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable the response cache
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.port,
        bind_address: cli.bind.clone(),
        upstream_servers: cli.upstreams.clone(),
        log_level: cli.log_level.clone(),
        disable_cache: cli.no_cache,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting DNS relay v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config)?;

    let shutdown = CancellationToken::new();
    let maintenance = services.start_maintenance(&config, shutdown.clone());

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let result = server::start_dns_server(
        config.server.clone(),
        services.relay.clone(),
        shutdown.clone(),
    )
    .await;

    shutdown.cancel();
    for handle in maintenance {
        let _ = handle.await;
    }
    services.log_cache_stats();
    result?;

    info!("Server shutdown complete");
    Ok(())
}
