/// Periodic probe transmitter.
///
/// Sends the fixed M-SEARCH payload to the discovery multicast group at
/// the configured cadence. Probing is fire-and-forget: there is no retry
/// or backoff, and a send failure is fatal to the task.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::debug;

use lumen_protocol::{DISCOVERY_PORT, MULTICAST_GROUP, PROBE_MESSAGE};

pub async fn run(socket: Arc<UdpSocket>, interval: Duration) -> anyhow::Result<()> {
    let group: Ipv4Addr = MULTICAST_GROUP.parse()?;
    let dest = SocketAddrV4::new(group, DISCOVERY_PORT);

    loop {
        debug!(to = %dest, bytes = PROBE_MESSAGE.len(), "Sending search probe");
        socket.send_to(PROBE_MESSAGE, dest).await?;
        tokio::time::sleep(interval).await;
    }
}
