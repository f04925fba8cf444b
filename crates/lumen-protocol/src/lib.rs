pub mod announcement;

/// SSDP multicast group used by Yeelight-family bulbs
pub const MULTICAST_GROUP: &str = "239.255.255.250";

/// Discovery port (bulbs listen here, not on the standard SSDP 1900)
pub const DISCOVERY_PORT: u16 = 1982;

/// Default cadence between probe transmissions
pub const DEFAULT_SEARCH_INTERVAL_MS: u64 = 4000;

/// Largest announcement datagram we accept; longer responses are truncated
/// by the receive call and then fail to parse.
pub const MAX_ANNOUNCEMENT_SIZE: usize = 2048;

/// Search probe payload. CRLF line endings, no trailing terminator.
pub const PROBE_MESSAGE: &[u8] = b"M-SEARCH * HTTP/1.1\r\n\
HOST: 239.255.255.250:1982\r\n\
MAN: \"ssdp:discover\"\r\n\
ST: wifi_bulb";
