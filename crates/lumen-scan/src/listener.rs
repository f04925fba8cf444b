/// Announcement receiver.
///
/// Blocks on the shared probe socket, parses each inbound datagram and
/// upserts successfully parsed records into the registry. Malformed or
/// unrelated multicast traffic is expected and dropped without surfacing
/// an error. The receive has no timeout: a network stack that never
/// delivers data parks this task forever, which is fine for a daemon
/// that only ends via ctrl-c.

use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::{debug, info};

use lumen_protocol::announcement::parse_announcement;
use lumen_protocol::MAX_ANNOUNCEMENT_SIZE;

use crate::registry::Registry;

pub async fn run(socket: Arc<UdpSocket>, registry: Arc<Registry>) -> anyhow::Result<()> {
    let mut buf = [0u8; MAX_ANNOUNCEMENT_SIZE];

    loop {
        // Only `..len` is ever read, so reusing the buffer across
        // iterations cannot leak bytes from a previous datagram.
        // Oversized responses are truncated here and then rejected
        // by the parser.
        let (len, addr) = socket.recv_from(&mut buf).await?;
        let payload = String::from_utf8_lossy(&buf[..len]);

        match parse_announcement(&payload) {
            Ok(record) => {
                let id = record.id.clone();
                let model = record.model.clone();
                let location = record.location.clone();
                if registry.upsert(record).await {
                    info!(id = %id, model = %model, location = %location, "Bulb discovered");
                } else {
                    debug!(id = %id, "Bulb announcement refreshed");
                }
            }
            Err(e) => {
                debug!(from = %addr, error = %e, "Ignoring unparseable datagram");
            }
        }
    }
}
