use gsping::{RageResponse, SampResponse};
use serde::Serialize;

const OFFLINE_HOSTNAME: &str = "Server Offline";
const NOT_AVAILABLE: &str = "N/A";

/// The status of one game server, as handed to the frontend.
///
/// `address` and `port` are always what the caller asked for, never the
/// resolved address or the derived HTTP port.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub hostname: String,
    pub address: String,
    pub port: u16,
    pub players: u32,
    pub max_players: u32,
    pub gamemode: String,
    pub language: String,
    pub version: String,
    pub password: bool,
    #[serde(rename = "ping")]
    pub ping_ms: u32,
    pub online: bool,
}

impl ServerStatus {
    /// The record for a server that could not be queried. Every
    /// informational field takes its sentinel value.
    #[must_use]
    pub fn offline(address: &str, port: u16) -> Self {
        Self {
            hostname: OFFLINE_HOSTNAME.to_string(),
            address: address.to_string(),
            port,
            players: 0,
            max_players: 0,
            gamemode: NOT_AVAILABLE.to_string(),
            language: NOT_AVAILABLE.to_string(),
            version: NOT_AVAILABLE.to_string(),
            password: false,
            ping_ms: 0,
            online: false,
        }
    }

    #[must_use]
    pub fn from_samp(address: &str, port: u16, latency: u64, response: SampResponse) -> Self {
        Self {
            hostname: response.hostname,
            address: address.to_string(),
            port,
            players: response.players.into(),
            max_players: response.max_players.into(),
            gamemode: response.gamemode,
            language: response.language,
            version: response.version,
            password: response.password,
            ping_ms: u32::try_from(latency).unwrap_or(u32::MAX),
            online: true,
        }
    }

    /// RAGE servers are not timed, so `ping` stays 0.
    #[must_use]
    pub fn from_rage(address: &str, port: u16, response: RageResponse) -> Self {
        Self {
            hostname: response.hostname,
            address: address.to_string(),
            port,
            players: response.players,
            max_players: response.max_players,
            gamemode: response.gamemode,
            language: response.language,
            version: response.version,
            password: response.password,
            ping_ms: 0,
            online: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_sentinel() {
        let status = ServerStatus::offline("play.example.com", 7777);
        assert_eq!(status.hostname, "Server Offline");
        assert_eq!(status.address, "play.example.com");
        assert_eq!(status.port, 7777);
        assert_eq!((status.players, status.max_players, status.ping_ms), (0, 0, 0));
        assert_eq!(status.gamemode, "N/A");
        assert_eq!(status.language, "N/A");
        assert_eq!(status.version, "N/A");
        assert!(!status.password);
        assert!(!status.online);
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(ServerStatus::offline("1.2.3.4", 22005)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "hostname": "Server Offline",
                "address": "1.2.3.4",
                "port": 22005,
                "players": 0,
                "maxPlayers": 0,
                "gamemode": "N/A",
                "language": "N/A",
                "version": "N/A",
                "password": false,
                "ping": 0,
                "online": false,
            })
        );
    }

    #[test]
    fn test_from_rage_zero_ping() {
        let response = RageResponse {
            hostname: "Freeroam".to_string(),
            players: 3,
            max_players: 100,
            gamemode: "freeroam".to_string(),
            language: "N/A".to_string(),
            version: "1.1".to_string(),
            password: false,
        };
        let status = ServerStatus::from_rage("rage.example.com", 22005, response);
        assert!(status.online);
        assert_eq!(status.ping_ms, 0);
        assert_eq!(status.port, 22005);
        assert_eq!(status.address, "rage.example.com");
    }
}
