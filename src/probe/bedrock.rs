//! Bedrock edition status via RakNet unconnected ping
//!
//! # Wire format
//!
//! ```text
//! ping  = 0x01 | i64 time | MAGIC[16] | i64 client GUID
//! pong  = 0x1c | i64 time | i64 server GUID | MAGIC[16] | u16 len | server id
//! ```
//!
//! All integers are big-endian. The server id is a `;`-separated string:
//! `MCPE;<motd>;<protocol>;<version>;<online>;<max>;<server id>;...`

use std::net::SocketAddr;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;

use super::error::{ProbeError, ProbeResult};
use crate::models::{ServerSpec, StatusSnapshot};

/// Unconnected ping packet id
pub const UNCONNECTED_PING: u8 = 0x01;

/// Unconnected pong packet id
pub const UNCONNECTED_PONG: u8 = 0x1c;

/// RakNet offline message magic
pub const OFFLINE_MAGIC: [u8; 16] = [
    0x00, 0xff, 0xff, 0x00, 0xfe, 0xfe, 0xfe, 0xfe, 0xfd, 0xfd, 0xfd, 0xfd, 0x12, 0x34, 0x56, 0x78,
];

const PING_LEN: usize = 1 + 8 + 16 + 8;
const PONG_HEADER_LEN: usize = 1 + 8 + 8 + 16 + 2;

/// Largest datagram we are prepared to read
const MAX_DATAGRAM: usize = 2048;

/// Encode an unconnected ping
pub fn encode_ping(time_ms: i64, client_guid: i64) -> Vec<u8> {
    let mut packet = Vec::with_capacity(PING_LEN);
    packet.push(UNCONNECTED_PING);
    packet.extend_from_slice(&time_ms.to_be_bytes());
    packet.extend_from_slice(&OFFLINE_MAGIC);
    packet.extend_from_slice(&client_guid.to_be_bytes());
    packet
}

/// Decoded unconnected pong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pong {
    /// Echo of the ping timestamp
    pub time_ms: i64,

    /// Server GUID
    pub server_guid: i64,

    /// Raw `;`-separated server id string
    pub server_id: String,
}

fn read_i64(buf: &[u8], offset: usize) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    i64::from_be_bytes(bytes)
}

/// Decode an unconnected pong
///
/// # Errors
///
/// Returns `ProbeError::Decode` on a wrong packet id, a bad magic, a
/// truncated payload or a server id that is not UTF-8.
pub fn decode_pong(buf: &[u8]) -> ProbeResult<Pong> {
    if buf.len() < PONG_HEADER_LEN {
        return Err(ProbeError::decode(format!(
            "pong too short: {} bytes",
            buf.len()
        )));
    }

    if buf[0] != UNCONNECTED_PONG {
        return Err(ProbeError::decode(format!(
            "unexpected packet id 0x{:02x}",
            buf[0]
        )));
    }

    let time_ms = read_i64(buf, 1);
    let server_guid = read_i64(buf, 9);

    if buf[17..33] != OFFLINE_MAGIC {
        return Err(ProbeError::decode("offline magic mismatch"));
    }

    let len = u16::from_be_bytes([buf[33], buf[34]]) as usize;
    let payload = buf
        .get(PONG_HEADER_LEN..PONG_HEADER_LEN + len)
        .ok_or_else(|| ProbeError::decode(format!("server id truncated, expected {len} bytes")))?;

    let server_id = std::str::from_utf8(payload)
        .map_err(|e| ProbeError::decode(format!("server id is not UTF-8: {e}")))?
        .to_string();

    Ok(Pong {
        time_ms,
        server_guid,
        server_id,
    })
}

/// Map a server id string to a snapshot
///
/// A pong is proof of life, so the result is always reachable; missing or
/// unparseable fields fall back to the placeholder labels.
pub fn snapshot_from_server_id(server_id: &str) -> StatusSnapshot {
    let fields: Vec<&str> = server_id.split(';').collect();

    let version_label = fields
        .get(3)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| StatusSnapshot::NO_VERSION.to_string());

    let online = fields.get(4).and_then(|v| v.trim().parse::<u64>().ok());
    let max = fields.get(5).and_then(|v| v.trim().parse::<u64>().ok());

    let player_summary = match (online, max) {
        (Some(online), Some(max)) => format!("{online}/{max}"),
        _ => StatusSnapshot::NO_PLAYERS.to_string(),
    };

    StatusSnapshot::online(player_summary, version_label)
}

/// UDP status client for Bedrock edition servers
#[derive(Debug, Clone)]
pub struct BedrockProbe {
    /// Time allowed for name resolution plus the ping round trip
    timeout: Duration,

    /// Random GUID identifying this client in pings
    client_guid: i64,
}

impl BedrockProbe {
    /// Create a new probe
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client_guid: rand::random(),
        }
    }

    /// Ping one server
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Timeout` when no pong arrives in time,
    /// `ProbeError::Io` on socket errors (including ICMP port unreachable)
    /// and `ProbeError::Decode` on a malformed pong.
    pub async fn query(&self, spec: &ServerSpec) -> ProbeResult<StatusSnapshot> {
        match tokio::time::timeout(self.timeout, self.ping(spec)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    async fn ping(&self, spec: &ServerSpec) -> ProbeResult<StatusSnapshot> {
        let endpoint = spec.endpoint();
        let target: SocketAddr = tokio::net::lookup_host(&endpoint)
            .await?
            .next()
            .ok_or_else(|| ProbeError::Unresolved(endpoint.clone()))?;

        let bind_addr = if target.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(target).await?;

        let time_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        let sent = Instant::now();
        socket.send(&encode_ping(time_ms, self.client_guid)).await?;

        let mut buf = vec![0u8; MAX_DATAGRAM];
        let received = socket.recv(&mut buf).await?;
        let pong = decode_pong(&buf[..received])?;

        tracing::trace!(
            server = %spec.name,
            server_guid = pong.server_guid,
            rtt_ms = sent.elapsed().as_millis() as u64,
            "Bedrock pong received"
        );

        Ok(snapshot_from_server_id(&pong.server_id))
    }
}
