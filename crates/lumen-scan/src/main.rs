mod listener;
mod prober;
mod registry;

use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{error, info};

use lumen_protocol::{DEFAULT_SEARCH_INTERVAL_MS, DISCOVERY_PORT, MULTICAST_GROUP};

use crate::registry::Registry;

#[derive(Parser, Debug)]
#[command(name = "lumen-scan", about = "Yeelight bulb scanner daemon")]
struct Args {
    /// Show debug logs
    #[arg(short, long)]
    debug: bool,

    /// Search interval in milliseconds
    #[arg(
        long,
        default_value_t = DEFAULT_SEARCH_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    search_interval_ms: u64,
}

/// Create the shared probe socket. Bound to an ephemeral port: bulbs
/// reply unicast to whatever port the probe left from, so the same
/// socket both transmits probes and receives announcements.
fn create_probe_socket() -> std::io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;

    // Multicast TTL 1 (LAN only)
    socket.set_multicast_ttl_v4(1)?;

    let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0);
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing; --debug overrides the env filter
    let filter = if args.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        group = MULTICAST_GROUP,
        port = DISCOVERY_PORT,
        interval_ms = args.search_interval_ms,
        "Lumen scanner starting"
    );

    let socket = Arc::new(UdpSocket::from_std(create_probe_socket()?)?);
    let registry = Arc::new(Registry::new());

    // Prober and listener share the socket; UDP handles simultaneous
    // send/receive without extra locking. A transport failure in either
    // task is fatal to that task (no retry policy).
    let prober_handle = {
        let socket = Arc::clone(&socket);
        let interval = Duration::from_millis(args.search_interval_ms);
        tokio::spawn(async move {
            if let Err(e) = prober::run(socket, interval).await {
                error!("Prober error: {}", e);
            }
        })
    };

    let listener_handle = {
        let socket = Arc::clone(&socket);
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(e) = listener::run(socket, registry).await {
                error!("Listener error: {}", e);
            }
        })
    };

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    prober_handle.abort();
    listener_handle.abort();

    // Dump what we found before exiting
    let snapshot = registry.snapshot().await;
    info!(devices = snapshot.len(), "Discovery finished");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
